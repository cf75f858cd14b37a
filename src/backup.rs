//! Rotating backups of the ledger snapshot, taken before `ledger.json` is overwritten.

use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::Local;
use std::path::PathBuf;

/// Prefix for copies of `ledger.json` taken before a save.
pub const LEDGER: &str = "ledger";

const JSON: &str = "json";

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
    ledger_path: PathBuf,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
            ledger_path: config.ledger_path().to_path_buf(),
        }
    }

    /// Copies the current `ledger.json` into the backups directory.
    ///
    /// The filename format is `ledger.YYYY-MM-DD-NNN.json` where NNN is a sequence number.
    /// Automatically rotates old backups, keeping only `backup_copies` files.
    ///
    /// Returns `None` when there is no ledger file yet, otherwise the path of the copy.
    pub async fn copy_ledger(&self) -> Result<Option<PathBuf>> {
        if !self.ledger_path.is_file() {
            return Ok(None);
        }
        let path = self.next_path(LEDGER).await?;
        utils::copy(&self.ledger_path, &path).await?;
        self.rotate(LEDGER).await?;
        Ok(Some(path))
    }

    async fn next_path(&self, prefix: &str) -> Result<PathBuf> {
        let date = today();
        let seq = self.next_sequence_number(prefix, &date).await?;
        Ok(self
            .backups_dir
            .join(format!("{prefix}.{date}-{seq:03}.{JSON}")))
    }

    /// Scans the backups directory for existing files with the given prefix and date,
    /// and returns the next sequence number.
    async fn next_sequence_number(&self, prefix: &str, date: &str) -> Result<u32> {
        let mut max_seq: u32 = 0;
        for name in self.file_names().await? {
            if let Some(seq) = parse_sequence_number(&name, prefix, date) {
                max_seq = max_seq.max(seq);
            }
        }
        Ok(max_seq + 1)
    }

    /// Rotates old backup files, keeping only `backup_copies` files with the given prefix.
    async fn rotate(&self, prefix: &str) -> Result<()> {
        let mut files: Vec<String> = self
            .file_names()
            .await?
            .into_iter()
            .filter(|name| is_backup_file(name, prefix))
            .collect();

        // Names sort by date, then sequence number
        files.sort();

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for name in files.into_iter().take(to_delete) {
            utils::remove(self.backups_dir.join(name)).await?;
        }
        Ok(())
    }

    async fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from a backup filename of the form `{prefix}.{date}-{NNN}.json`.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    filename
        .strip_prefix(&format!("{prefix}.{date}-"))?
        .strip_suffix(&format!(".{JSON}"))?
        .parse()
        .ok()
}

fn is_backup_file(filename: &str, prefix: &str) -> bool {
    filename.starts_with(&format!("{prefix}.")) && filename.ends_with(&format!(".{JSON}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(
            parse_sequence_number("ledger.2026-02-26-001.json", "ledger", "2026-02-26"),
            Some(1)
        );
        assert_eq!(
            parse_sequence_number("ledger.2026-02-26-042.json", "ledger", "2026-02-26"),
            Some(42)
        );
        // Wrong prefix
        assert_eq!(
            parse_sequence_number("other.2026-02-26-001.json", "ledger", "2026-02-26"),
            None
        );
        // Wrong date
        assert_eq!(
            parse_sequence_number("ledger.2026-02-25-001.json", "ledger", "2026-02-26"),
            None
        );
        assert_eq!(
            parse_sequence_number("ledger.2026-02-26-abc.json", "ledger", "2026-02-26"),
            None
        );
    }

    #[test]
    fn test_is_backup_file() {
        assert!(is_backup_file("ledger.2026-02-26-001.json", "ledger"));
        assert!(!is_backup_file("ledger.2026-02-26-001.txt", "ledger"));
        assert!(!is_backup_file("other.2026-02-26-001.json", "ledger"));
    }

    #[tokio::test]
    async fn test_copy_ledger_without_ledger_file() {
        let env = TestEnv::empty().await;
        let backup = env.config().backup();
        assert_eq!(backup.copy_ledger().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_copy_ledger_rotates() {
        let env = TestEnv::new().await;
        let backup = env.config().backup();
        let copies = env.config().backup_copies() as usize;

        let mut paths = Vec::new();
        for _ in 0..copies + 2 {
            paths.push(backup.copy_ledger().await.unwrap().unwrap());
        }

        let remaining = backup.file_names().await.unwrap();
        assert_eq!(remaining.len(), copies);
        assert!(!paths[0].exists());
        assert!(!paths[1].exists());
        assert!(paths.last().unwrap().exists());
    }

    #[tokio::test]
    async fn test_copy_ledger_copies_current_file() {
        let env = TestEnv::new().await;
        let backup = env.config().backup();
        let path = backup.copy_ledger().await.unwrap().unwrap();
        let original = utils::read(env.config().ledger_path()).await.unwrap();
        let copied = utils::read(&path).await.unwrap();
        assert_eq!(original, copied);
    }
}
