pub mod commands;
pub mod config;
pub mod error;
pub mod form;
pub mod llm;
pub mod logging;
pub mod prompt;
pub mod session;
pub mod tui;
pub mod utils;
