pub mod openai;
pub mod prompt_builder;
mod prompts;

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::time::Duration;

use crate::error::GenerationError;
use prompt_builder::PromptPair;

/// USD per 1000 prompt tokens.
pub const INPUT_RATE_PER_1K: f64 = 0.0015;
/// USD per 1000 completion tokens.
pub const OUTPUT_RATE_PER_1K: f64 = 0.002;

/// Trait for talking to a text-generation service.
pub trait LlmClient: Send + Sync {
    /// Send one prompt. Exactly one attempt is made; there are no retries.
    fn complete(
        &self,
        prompt: &PromptPair,
        params: &CallParams,
    ) -> Result<Completion, GenerationError>;
}

/// Per-call generation knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl CallParams {
    pub fn diff_summary(timeout: Duration) -> Self {
        CallParams {
            max_tokens: 128,
            temperature: 0.2,
            timeout,
        }
    }

    pub fn title(timeout: Duration) -> Self {
        CallParams {
            max_tokens: 32,
            temperature: 0.2,
            timeout,
        }
    }

    pub fn description(timeout: Duration) -> Self {
        CallParams {
            max_tokens: 512,
            temperature: 0.2,
            timeout,
        }
    }

    pub fn vibe_check() -> Self {
        CallParams {
            max_tokens: 256,
            temperature: 0.5,
            timeout: Duration::from_secs(6),
        }
    }
}

/// Token counts reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Usage {
    pub fn cost(&self) -> Cost {
        Cost::usd(
            f64::from(self.prompt_tokens) / 1000.0 * INPUT_RATE_PER_1K
                + f64::from(self.completion_tokens) / 1000.0 * OUTPUT_RATE_PER_1K,
        )
    }
}

/// A successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
}

impl Completion {
    pub fn cost(&self) -> Cost {
        self.usage.cost()
    }
}

/// Estimated spend in USD. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Cost(f64);

impl Cost {
    pub const ZERO: Cost = Cost(0.0);

    pub fn usd(amount: f64) -> Self {
        Cost(amount.max(0.0))
    }

    pub fn as_usd(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        Cost(self.0 + rhs.0)
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        self.0 += rhs.0;
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, Add::add)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.6}", self.0)
    }
}
