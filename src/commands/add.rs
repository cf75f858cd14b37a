//! The `add` command: runs a keystroke script through the keypad and records the result.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::controller::{EntryController, EntryDraft, Outcome};
use crate::error::{ErrorType, IntoResult};
use crate::keypad::Key;
use crate::ledger::Ledger;
use crate::model::{
    Categories, CategoryKind, EntryKind, EntryStatus, LedgerEntry, UNCATEGORIZED_ID,
};
use crate::{Config, Result};
use anyhow::{anyhow, bail, ensure};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// Complete is pressed at most this many times after the script: once to evaluate, once to
/// finalize.
const MAX_TRAILING_COMPLETES: usize = 2;

/// Adds an entry whose amount is typed with the keystrokes in `args`.
///
/// After the script runs, complete is pressed until the entry is finalized. A script that keeps
/// going after the entry was finalized, or an amount that is not positive, is an input error and
/// nothing is saved.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<LedgerEntry>> {
    let keys = Key::parse_script(args.keys()).pub_result(ErrorType::Input)?;
    let mut ledger = Ledger::load(&config).await.pub_result(ErrorType::Storage)?;

    let draft = draft(&config, &ledger, &args).pub_result(ErrorType::Input)?;
    let entry = run(EntryController::new(draft), keys).pub_result(ErrorType::Input)?;

    ledger
        .add_entry(entry.clone())
        .pub_result(ErrorType::Storage)?;
    ledger.save().await.pub_result(ErrorType::Storage)?;

    let message = format!("Added {} {} ({})", entry.kind(), entry.amount(), entry.id());
    Ok(Out::new(message, entry))
}

fn draft(config: &Config, ledger: &Ledger, args: &AddArgs) -> Result<EntryDraft> {
    let kind = args.kind();
    ensure!(
        kind != EntryKind::Transfer || args.to_account().is_some(),
        "A transfer needs --to-account"
    );

    let category_id = match args.category() {
        Some(id) => id.to_string(),
        None => default_category(ledger.categories(), kind),
    };
    let root_category_id = root_category(ledger.categories(), &category_id);
    let mut draft = EntryDraft::new(kind, category_id, config.currency());
    draft.root_category_id = root_category_id;
    draft.exclude_from_stats = args.exclude_from_stats();
    draft.account_id = args.account().to_string();
    draft.to_account_id = args.to_account().map(str::to_string);
    draft.note = args.note().to_string();
    draft.tags = args.tags().to_vec();
    if args.pending() {
        draft.status = EntryStatus::Pending;
    }
    if let Some(at) = args.at() {
        draft.occurred_at = Some(local_to_utc(config, at)?);
    }
    Ok(draft)
}

fn run(mut controller: EntryController, keys: Vec<Key>) -> Result<LedgerEntry> {
    let mut keys = keys.into_iter();
    while let Some(key) = keys.next() {
        match controller.press(key) {
            Outcome::Editing => {}
            // The keypad leaves the state alone on a rejected commit, typing may carry on.
            Outcome::Rejected(reason) => debug!("Complete was rejected mid-script: {reason}"),
            Outcome::Created(entry) => {
                let rest = keys.len();
                ensure!(
                    rest == 0,
                    "The entry was finalized with {rest} keystroke(s) left over"
                );
                return Ok(*entry);
            }
        }
    }

    for _ in 0..MAX_TRAILING_COMPLETES {
        match controller.press(Key::Complete) {
            Outcome::Editing => {}
            Outcome::Created(entry) => return Ok(*entry),
            Outcome::Rejected(reason) => bail!(
                "The amount '{}' cannot be saved: {reason}",
                controller.state().display()
            ),
        }
    }
    Err(anyhow!("The keypad did not finalize the amount"))
}

/// The first active category of the matching kind, or the placeholder for transfers.
fn default_category(categories: &Categories, kind: EntryKind) -> String {
    let wanted = match kind {
        EntryKind::Expense => CategoryKind::Expense,
        EntryKind::Income => CategoryKind::Income,
        EntryKind::Transfer => return UNCATEGORIZED_ID.to_string(),
    };
    categories
        .iter()
        .filter(|c| c.is_active() && c.kind() == wanted && c.parent_id().is_none())
        .min_by_key(|c| c.sort_order())
        .map(|c| c.id().to_string())
        .unwrap_or_else(|| UNCATEGORIZED_ID.to_string())
}

/// The top-level category `id` is filed under. `None` when the category is unknown.
fn root_category(categories: &Categories, id: &str) -> Option<String> {
    let category = categories.get(id)?;
    Some(category.parent_id().unwrap_or(category.id()).to_string())
}

fn local_to_utc(config: &Config, at: NaiveDateTime) -> Result<DateTime<Utc>> {
    let local = match config.utc_offset() {
        Some(offset) => offset
            .from_local_datetime(&at)
            .single()
            .map(|t| t.with_timezone(&Utc)),
        None => Local
            .from_local_datetime(&at)
            .earliest()
            .map(|t| t.with_timezone(&Utc)),
    };
    local.ok_or_else(|| anyhow!("The time {at} does not exist in the local time zone"))
}
