pub mod cli;
pub mod config;
pub mod copilot;
pub mod gateway;
pub mod logging;
