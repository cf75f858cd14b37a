use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure that is surfaced to the user by a command handler.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or `config.json` is missing or invalid.
    Config,
    /// Reading or writing the ledger snapshot failed, or the store refused a change.
    Storage,
    /// The user's input could not be turned into a valid entry.
    Input,
}

serde_plain::derive_display_from_serialize!(ErrorType);

/// Converts an internal error into the public form returned by command handlers.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let e: Error = e.into();
            anyhow::anyhow!("{error_type} error: {e:#}")
        })
    }
}
