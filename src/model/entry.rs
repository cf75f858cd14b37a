use crate::model::collection::{Collection, Keyed};
use crate::model::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The direction of money in an entry.
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    #[default]
    Expense,
    Income,
    /// Money moved between two of the user's own accounts.
    Transfer,
}

serde_plain::derive_display_from_serialize!(EntryKind);
serde_plain::derive_fromstr_from_deserialize!(EntryKind);

#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    #[default]
    Completed,
    /// Not yet settled, e.g. a card pre-authorization.
    Pending,
}

serde_plain::derive_display_from_serialize!(EntryStatus);
serde_plain::derive_fromstr_from_deserialize!(EntryStatus);

/// How much of an expense has been refunded.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    #[default]
    None,
    Partial,
    Full,
}

serde_plain::derive_display_from_serialize!(RefundStatus);
serde_plain::derive_fromstr_from_deserialize!(RefundStatus);

/// A single income, expense or transfer record.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LedgerEntry {
    pub(crate) id: String,
    pub(crate) kind: EntryKind,
    /// Always positive; `kind` carries the direction.
    pub(crate) amount: Amount,
    pub(crate) currency: String,
    pub(crate) category_id: String,
    /// The top-level ancestor of `category_id`, when it was known at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) root_category_id: Option<String>,
    pub(crate) account_id: String,
    /// The receiving account of a transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) to_account_id: Option<String>,
    #[serde(default)]
    pub(crate) status: EntryStatus,
    /// When the money moved.
    pub(crate) occurred_at: DateTime<Utc>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) note: String,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    /// Paths or URLs of attached images.
    #[serde(default)]
    pub(crate) images: Vec<String>,
    #[serde(default)]
    pub(crate) exclude_from_stats: bool,
    #[serde(default)]
    pub(crate) refund_status: RefundStatus,
    /// The entry this one refunds or reverses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) related_entry_id: Option<String>,
}

impl Keyed for LedgerEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl LedgerEntry {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn root_category_id(&self) -> Option<&str> {
        self.root_category_id.as_deref()
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn to_account_id(&self) -> Option<&str> {
        self.to_account_id.as_deref()
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn exclude_from_stats(&self) -> bool {
        self.exclude_from_stats
    }

    pub fn refund_status(&self) -> RefundStatus {
        self.refund_status
    }

    pub fn related_entry_id(&self) -> Option<&str> {
        self.related_entry_id.as_deref()
    }
}

/// The collection of ledger entries.
pub type Entries = Collection<LedgerEntry>;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Builds an expense-style entry at the given UTC wall time.
    pub(crate) fn entry(
        id: &str,
        kind: EntryKind,
        minor: i64,
        category_id: &str,
        (y, m, d, hh, mm): (i32, u32, u32, u32, u32),
    ) -> LedgerEntry {
        let at = Utc.with_ymd_and_hms(y, m, d, hh, mm, 0).unwrap();
        LedgerEntry {
            id: id.to_string(),
            kind,
            amount: Amount::from_minor(minor),
            currency: "CNY".to_string(),
            category_id: category_id.to_string(),
            root_category_id: None,
            account_id: crate::model::DEFAULT_ACCOUNT_ID.to_string(),
            to_account_id: None,
            status: EntryStatus::Completed,
            occurred_at: at,
            created_at: at,
            updated_at: at,
            note: String::new(),
            tags: Vec::new(),
            images: Vec::new(),
            exclude_from_stats: false,
            refund_status: RefundStatus::None,
            related_entry_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::entry;
    use super::*;

    #[test]
    fn test_json_round_trip_keeps_minor_units() {
        let e = entry("tx_1", EntryKind::Expense, 663400, "cat_food", (2026, 2, 26, 13, 50));
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["amount"], 663400);
        assert_eq!(json["kind"], "expense");
        assert!(json.get("to_account_id").is_none());
        let back: LedgerEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "id": "tx_9",
            "kind": "income",
            "amount": 100,
            "currency": "CNY",
            "category_id": "cat_salary",
            "account_id": "acc_default",
            "occurred_at": "2026-02-27T10:37:00Z",
            "created_at": "2026-02-27T10:37:00Z",
            "updated_at": "2026-02-27T10:37:00Z"
        }"#;
        let e: LedgerEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.status(), EntryStatus::Completed);
        assert!(e.tags().is_empty());
        assert_eq!(e.note(), "");
        assert_eq!(e.to_account_id(), None);
        assert_eq!(e.root_category_id(), None);
        assert!(!e.exclude_from_stats());
        assert_eq!(e.refund_status(), RefundStatus::None);
        assert_eq!(e.related_entry_id(), None);
    }

    #[test]
    fn test_refund_fields_serialize() {
        let mut e = entry("tx_2", EntryKind::Income, 2000, "cat_refund", (2026, 2, 27, 9, 0));
        e.refund_status = RefundStatus::Partial;
        e.related_entry_id = Some("tx_1".to_string());
        e.exclude_from_stats = true;
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["refund_status"], "partial");
        assert_eq!(json["related_entry_id"], "tx_1");
        assert_eq!(json["exclude_from_stats"], true);
        assert!(json.get("root_category_id").is_none());
        assert_eq!("full".parse::<RefundStatus>().unwrap(), RefundStatus::Full);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("transfer".parse::<EntryKind>().unwrap(), EntryKind::Transfer);
        assert_eq!(EntryKind::Income.to_string(), "income");
    }
}
