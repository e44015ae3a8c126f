use log::debug;
use crate::config::Config;
use crate::llm::LlmClient;
use crate::llm::openai::OpenAiClient;

/// Build the LLM client from config, or `None` when no credential is available.
pub fn build_llm_client(cfg: &Config) -> Option<Box<dyn LlmClient>> {
    let Some(key) = cfg.api_key.clone() else {
        debug!("No API key configured; drafting with heuristics only");
        return None;
    };

    debug!("Using OpenAiClient with model: {}", cfg.model);

    Some(Box::new(OpenAiClient::new(
        key,
        cfg.model.clone(),
        cfg.api_base_url.clone(),
    )))
}
