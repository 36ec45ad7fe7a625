pub mod dataset;
pub mod orchestrator;
pub mod theme;
