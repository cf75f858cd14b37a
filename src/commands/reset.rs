use crate::args::ResetArgs;
use crate::commands::{plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::ledger::Ledger;
use crate::{Config, Result};
use anyhow::anyhow;

/// Deletes every entry and/or restores the default categories. At least one of the two must be
/// requested.
pub async fn reset(config: Config, args: ResetArgs) -> Result<Out<()>> {
    if !args.entries() && !args.categories() {
        return Err::<Out<()>, _>(anyhow!(
            "Nothing to reset, pass --entries and/or --categories"
        ))
        .pub_result(ErrorType::Input);
    }
    let mut ledger = Ledger::load(&config).await.pub_result(ErrorType::Storage)?;

    let mut done = Vec::new();
    if args.entries() {
        let count = ledger.clear_entries();
        done.push(format!("deleted {}", plural(count, "entry", "entries")));
    }
    if args.categories() {
        ledger.reset_categories();
        done.push("restored the default categories".to_string());
    }
    ledger.save().await.pub_result(ErrorType::Storage)?;

    Ok(format!("Reset the ledger: {}", done.join(", ")).into())
}
