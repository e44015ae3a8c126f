pub mod heuristic;
pub mod orchestrator;
pub mod resources;
pub mod sections;
pub mod template;
