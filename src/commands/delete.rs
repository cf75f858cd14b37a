//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::{plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::ledger::Ledger;
use crate::{Config, Result};

/// Deletes one or more entries by ID atomically.
///
/// This operation is all-or-nothing: either all specified entries are deleted, or none are.
/// If any entry ID is not found, nothing is written.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<Vec<String>>> {
    let mut ledger = Ledger::load(&config).await.pub_result(ErrorType::Storage)?;
    let deleted: Vec<String> = ledger
        .remove_entries(args.ids())
        .pub_result(ErrorType::Input)?
        .into_iter()
        .map(|entry| entry.id().to_string())
        .collect();
    ledger.save().await.pub_result(ErrorType::Storage)?;

    let message = format!("Deleted {}", plural(deleted.len(), "entry", "entries"));
    Ok(Out::new(message, deleted))
}
