//! Contract differ library

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod history;
pub mod input;
pub mod pipeline;
pub mod present;

pub use config::Config;
pub use error::{ContractDifferError, Result, Side};
pub use pipeline::{Comparer, Comparison};
