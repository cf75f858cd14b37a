pub mod args;
mod backup;
pub mod commands;
mod config;
pub mod controller;
mod error;
pub mod keypad;
pub mod ledger;
pub mod model;
pub mod sections;
mod utils;


pub use backup::Backup;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use model::Amount;
