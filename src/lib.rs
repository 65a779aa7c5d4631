pub mod api;
pub mod cli;
pub mod core;
pub mod llm;
pub mod pipeline;
pub mod store;
