//! These structs provide the CLI interface for the daybook CLI.

use crate::model::{EntryKind, DEFAULT_ACCOUNT_ID};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// daybook: A command-line tool for keeping a personal ledger.
///
/// Amounts are entered with a calculator keypad: each `add` takes a script of keystrokes such as
/// `12.5+30=` which is evaluated exactly as the keypad would evaluate it. Entries are kept in a
/// JSON file in the daybook home directory and listed grouped by day.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and a new ledger.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/daybook, pass --daybook-home or set DAYBOOK_HOME to put it somewhere else.
    Init,
    /// Add an entry by typing its amount on the keypad.
    Add(AddArgs),
    /// List entries grouped by day, newest first.
    List(ListArgs),
    /// Delete entries by id. Either all of them are deleted or none are.
    Delete(DeleteArgs),
    /// Remove all entries and/or restore the default categories.
    Reset(ResetArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where daybook data and configuration is held. Defaults to ~/daybook
    #[arg(long, env = "DAYBOOK_HOME", default_value_t = default_daybook_home())]
    daybook_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, daybook_home: PathBuf) -> Self {
        Self {
            log_level,
            daybook_home: daybook_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn daybook_home(&self) -> &DisplayPath {
        &self.daybook_home
    }
}

/// (Not shown): Args for the `daybook add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The keystrokes that enter the amount:
    ///
    ///   0-9  digits
    ///   .    decimal point
    ///   +    the plus/times key, press twice for times
    ///   -    the minus/divide key, press twice for divide
    ///   <    delete the last character
    ///   C    clear everything
    ///   =    equals, or done when there is nothing left to evaluate
    ///
    /// Done is pressed automatically at the end of the script.
    #[arg(long)]
    keys: String,

    /// The kind of entry.
    #[arg(long, value_enum, default_value_t = EntryKind::Expense)]
    kind: EntryKind,

    /// The category id. Defaults to the first category of the matching kind.
    #[arg(long)]
    category: Option<String>,

    /// The account id the money comes from (or goes to, for income).
    #[arg(long, default_value = DEFAULT_ACCOUNT_ID)]
    account: String,

    /// The destination account id. Required for transfers.
    #[arg(long)]
    to_account: Option<String>,

    /// A free-form note.
    #[arg(long, default_value = "")]
    note: String,

    /// A tag, may be given more than once.
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Mark the entry as pending rather than completed.
    #[arg(long)]
    pending: bool,

    /// Leave the entry out of income and expense statistics.
    #[arg(long)]
    exclude_from_stats: bool,

    /// When the money moved, as local time YYYY-MM-DDTHH:MM. Defaults to now.
    #[arg(long, value_parser = parse_local_time)]
    at: Option<NaiveDateTime>,
}

impl AddArgs {
    pub fn new(keys: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            keys: keys.into(),
            kind,
            category: None,
            account: DEFAULT_ACCOUNT_ID.to_string(),
            to_account: None,
            note: String::new(),
            tags: Vec::new(),
            pending: false,
            exclude_from_stats: false,
            at: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    pub fn with_to_account(mut self, to_account: impl Into<String>) -> Self {
        self.to_account = Some(to_account.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_exclude_from_stats(mut self) -> Self {
        self.exclude_from_stats = true;
        self
    }

    pub fn with_at(mut self, at: NaiveDateTime) -> Self {
        self.at = Some(at);
        self
    }

    pub fn keys(&self) -> &str {
        &self.keys
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn to_account(&self) -> Option<&str> {
        self.to_account.as_deref()
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn exclude_from_stats(&self) -> bool {
        self.exclude_from_stats
    }

    pub fn at(&self) -> Option<NaiveDateTime> {
        self.at
    }
}

/// (Not shown): Args for the `daybook list` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ListArgs {
    /// Show only the heading and total of this day (YYYY-MM-DD). May be given more than once.
    #[arg(long)]
    collapse: Vec<NaiveDate>,
}

impl ListArgs {
    pub fn new(collapse: Vec<NaiveDate>) -> Self {
        Self { collapse }
    }

    pub fn collapse(&self) -> &[NaiveDate] {
        &self.collapse
    }
}

/// (Not shown): Args for the `daybook delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ids of the entries to delete.
    #[arg(required = true)]
    ids: Vec<String>,
}

impl DeleteArgs {
    pub fn new<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// (Not shown): Args for the `daybook reset` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ResetArgs {
    /// Delete every entry.
    #[arg(long)]
    entries: bool,

    /// Replace the categories with the default set.
    #[arg(long)]
    categories: bool,
}

impl ResetArgs {
    pub fn new(entries: bool, categories: bool) -> Self {
        Self {
            entries,
            categories,
        }
    }

    pub fn entries(&self) -> bool {
        self.entries
    }

    pub fn categories(&self) -> bool {
        self.categories
    }
}

fn parse_local_time(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM, {e}"))
}

fn default_daybook_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("daybook"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --daybook-home or DAYBOOK_HOME instead of relying on the \
                default daybook home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("daybook")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "daybook",
            "--daybook-home",
            "/tmp/db",
            "add",
            "--keys",
            "12+3=",
            "--kind",
            "income",
            "--tag",
            "a",
            "--tag",
            "b",
            "--at",
            "2026-02-26T09:15",
        ])
        .unwrap();
        assert_eq!(args.common().daybook_home().path(), Path::new("/tmp/db"));
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.keys(), "12+3=");
        assert_eq!(add.kind(), EntryKind::Income);
        assert_eq!(add.account(), DEFAULT_ACCOUNT_ID);
        assert_eq!(add.tags(), ["a".to_string(), "b".to_string()]);
        assert_eq!(
            add.at(),
            NaiveDate::from_ymd_opt(2026, 2, 26).unwrap().and_hms_opt(9, 15, 0)
        );
    }

    #[test]
    fn test_parse_list_collapse() {
        let args =
            Args::try_parse_from(["daybook", "list", "--collapse", "2026-02-26"]).unwrap();
        let Command::List(list) = args.command() else {
            panic!("expected list");
        };
        assert_eq!(list.collapse(), [NaiveDate::from_ymd_opt(2026, 2, 26).unwrap()]);
    }

    #[test]
    fn test_parse_rejects_bad_time() {
        let result = Args::try_parse_from(["daybook", "add", "--keys", "1", "--at", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Args::try_parse_from(["daybook", "delete"]).is_err());
    }
}
