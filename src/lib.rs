//! Rental listing client: browse locations kept in a hosted record API,
//! administer them, and keep on-device favorites.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod favorites;
pub mod forms;
pub mod logging;
pub mod models;
pub mod views;

pub use config::Config;
pub use error::{Error, Result};
