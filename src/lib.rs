pub mod backends;
pub mod cli;
pub mod color;
pub mod config;
pub mod pipeline;
pub mod preview;
pub mod report;
