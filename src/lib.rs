//! Resume anonymizer library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod pipeline;
pub mod processing;

pub use config::Config;
pub use error::{AnonymizerError, Result};
pub use pipeline::Pipeline;
