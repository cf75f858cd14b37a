//! The ledger store: entries, categories and accounts, persisted together in `ledger.json`.

use crate::model::{
    default_accounts, default_categories, Accounts, Categories, Entries, EntryKind, LedgerEntry,
};
use crate::{utils, Config, Result};
use anyhow::{bail, ensure, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const SNAPSHOT_VERSION: u32 = 1;

/// Everything that is persisted. Keypad state and collapsed sections are never part of it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    version: u32,
    #[serde(default)]
    entries: Entries,
    #[serde(default)]
    categories: Categories,
    #[serde(default)]
    accounts: Accounts,
}

impl Snapshot {
    /// A snapshot for a new ledger: no entries, the default categories and the default account.
    pub fn seeded(currency: &str) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            entries: Entries::default(),
            categories: default_categories(),
            accounts: default_accounts(currency),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.version == SNAPSHOT_VERSION,
            "Unsupported ledger version {}, expected {SNAPSHOT_VERSION}",
            self.version
        );
        if let Some(id) = self.entries.first_duplicate() {
            bail!("Duplicate entry id '{id}' in ledger");
        }
        if let Some(id) = self.categories.first_duplicate() {
            bail!("Duplicate category id '{id}' in ledger");
        }
        if let Some(id) = self.accounts.first_duplicate() {
            bail!("Duplicate account id '{id}' in ledger");
        }
        Ok(())
    }
}

/// The in-memory ledger bound to the files of a home directory. Changes are held in memory until
/// `save` is called.
#[derive(Debug, Clone)]
pub struct Ledger {
    config: Config,
    snapshot: Snapshot,
}

impl Ledger {
    /// Writes a seeded `ledger.json`. Fails if one already exists.
    pub async fn create(config: &Config) -> Result<Self> {
        let path = config.ledger_path();
        if path.is_file() {
            bail!("A ledger already exists at '{}'", path.display());
        }
        let ledger = Self {
            config: config.clone(),
            snapshot: Snapshot::seeded(config.currency()),
        };
        ledger.write().await?;
        info!("Created a new ledger at {}", path.display());
        Ok(ledger)
    }

    /// Reads and validates `ledger.json`.
    pub async fn load(config: &Config) -> Result<Self> {
        let path = config.ledger_path();
        let snapshot: Snapshot = utils::deserialize(path)
            .await
            .with_context(|| format!("Unable to load the ledger at {}", path.display()))?;
        snapshot.validate()?;
        debug!(
            "Loaded {} entries, {} categories and {} accounts",
            snapshot.entries.len(),
            snapshot.categories.len(),
            snapshot.accounts.len()
        );
        Ok(Self {
            config: config.clone(),
            snapshot,
        })
    }

    /// Backs up the current `ledger.json`, then overwrites it with the in-memory snapshot.
    pub async fn save(&self) -> Result<()> {
        if let Some(backup) = self.config.backup().copy_ledger().await? {
            debug!("Backed up the ledger to {}", backup.display());
        }
        self.write().await
    }

    async fn write(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot)
            .context("Unable to serialize the ledger")?;
        utils::write(self.config.ledger_path(), json).await
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn entries(&self) -> &Entries {
        &self.snapshot.entries
    }

    pub fn categories(&self) -> &Categories {
        &self.snapshot.categories
    }

    pub fn accounts(&self) -> &Accounts {
        &self.snapshot.accounts
    }

    /// Adds a new entry. The entry's accounts must exist; its category need not, since a missing
    /// category is shown as uncategorized.
    pub fn add_entry(&mut self, entry: LedgerEntry) -> Result<()> {
        ensure!(
            self.accounts().contains(entry.account_id()),
            "Unknown account '{}'",
            entry.account_id()
        );
        if entry.kind() == EntryKind::Transfer {
            let Some(to) = entry.to_account_id() else {
                bail!("A transfer needs a destination account");
            };
            ensure!(self.accounts().contains(to), "Unknown account '{to}'");
        }
        debug!("Adding entry {}", entry.id());
        self.snapshot.entries.insert(entry)
    }

    /// Applies `change` to the entry with `id` and stamps its `updated_at` with `now`. Returns
    /// `false` if there is no such entry.
    pub fn update_entry(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        change: impl FnOnce(&mut LedgerEntry),
    ) -> bool {
        self.snapshot.entries.update(id, |entry| {
            change(entry);
            entry.updated_at = now;
        })
    }

    /// Removes the entries with the given ids. If any id is unknown nothing is removed.
    pub fn remove_entries<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<Vec<LedgerEntry>> {
        let missing: Vec<&str> = ids
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| !self.entries().contains(id))
            .collect();
        if !missing.is_empty() {
            bail!("No entry found with id: {}", missing.join(", "));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.snapshot.entries.remove(id.as_ref()))
            .collect())
    }

    /// Removes all entries, returning how many there were.
    pub fn clear_entries(&mut self) -> usize {
        let count = self.entries().len();
        self.snapshot.entries.clear();
        count
    }

    /// Replaces the categories with the default set.
    pub fn reset_categories(&mut self) {
        self.snapshot.categories = default_categories();
    }
}
