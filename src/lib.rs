pub mod cli;
pub mod commands;
pub mod config;
pub mod contamination;
pub mod haplogroup;
pub mod utils;
pub mod variants;
mod error;

pub use error::{HaploError, Result};
