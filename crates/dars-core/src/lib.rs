//! `dars-core` — configuration and error types shared by every dars crate.

pub mod config;
pub mod error;

pub use config::DarsConfig;
pub use error::{DarsError, Result};
