use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::ledger::Ledger;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its subdirectories and:
/// - Creates an initial `config.json` file with default settings
/// - Creates `ledger.json` with the default account and categories
///
/// # Arguments
/// - `daybook_home` - The directory that will be the root of data directory, e.g. `$HOME/daybook`
///
/// # Errors
/// - Returns an error if any file operations fail, or if the directory already holds a config.
pub async fn init(daybook_home: &Path) -> Result<Out<()>> {
    let config = Config::create(daybook_home)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    let ledger = Ledger::create(&config)
        .await
        .pub_result(ErrorType::Storage)?;
    Ok(format!(
        "Created the daybook directory at {} with {} categories",
        config.root().display(),
        ledger.categories().len()
    )
    .into())
}
