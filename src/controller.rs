//! The entry controller: the keypad state plus the details of the entry being composed.
//!
//! Keystrokes go through [`EntryController::press`]. When the keypad finalizes an amount the
//! controller builds a complete [`LedgerEntry`] and starts over with a fresh keypad.

use crate::keypad::{CommitRejection, EntryState, Key, Press};
use crate::model::{
    Amount, EntryKind, EntryStatus, LedgerEntry, RefundStatus, DEFAULT_ACCOUNT_ID,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Everything about the entry being composed except its amount.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub category_id: String,
    pub root_category_id: Option<String>,
    pub account_id: String,
    pub to_account_id: Option<String>,
    pub currency: String,
    pub status: EntryStatus,
    /// When the money moved. `None` means the moment the entry is committed.
    pub occurred_at: Option<DateTime<Utc>>,
    pub note: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub exclude_from_stats: bool,
}

impl EntryDraft {
    pub fn new(
        kind: EntryKind,
        category_id: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category_id: category_id.into(),
            root_category_id: None,
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            to_account_id: None,
            currency: currency.into(),
            status: EntryStatus::Completed,
            occurred_at: None,
            note: String::new(),
            tags: Vec::new(),
            images: Vec::new(),
            exclude_from_stats: false,
        }
    }
}

/// What a keystroke did at the controller level.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    /// The keypad changed, or ignored the key.
    Editing,
    /// A new entry is ready to be handed to the ledger.
    Created(Box<LedgerEntry>),
    /// Complete was pressed but the amount cannot be saved. Nothing changed.
    Rejected(CommitRejection),
}

/// Drives the keypad and turns committed amounts into ledger entries.
#[derive(Debug, Clone)]
pub struct EntryController {
    state: EntryState,
    draft: EntryDraft,
}

impl EntryController {
    pub fn new(draft: EntryDraft) -> Self {
        Self {
            state: EntryState::new(),
            draft,
        }
    }

    pub fn state(&self) -> &EntryState {
        &self.state
    }

    pub fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut EntryDraft {
        &mut self.draft
    }

    /// Handles a key, using the current time for committed entries.
    pub fn press(&mut self, key: Key) -> Outcome {
        self.press_at(key, Utc::now())
    }

    /// Handles a key. `now` stamps the creation time of a committed entry, and its occurrence time
    /// if the draft does not set one.
    pub fn press_at(&mut self, key: Key, now: DateTime<Utc>) -> Outcome {
        match self.state.press(key) {
            Press::Edited(next) => {
                self.state = next;
                Outcome::Editing
            }
            Press::Rejected(reason) => {
                debug!("Commit rejected: {reason}");
                Outcome::Rejected(reason)
            }
            Press::Committed(amount) => {
                let entry = self.build_entry(amount, now);
                info!("Created {} entry {} for {}", entry.kind, entry.id, entry.amount);
                self.state = EntryState::new();
                Outcome::Created(Box::new(entry))
            }
        }
    }

    fn build_entry(&self, amount: Amount, now: DateTime<Utc>) -> LedgerEntry {
        let draft = &self.draft;
        let to_account_id = match draft.kind {
            EntryKind::Transfer => draft.to_account_id.clone(),
            EntryKind::Expense | EntryKind::Income => None,
        };
        LedgerEntry {
            id: Uuid::new_v4().to_string(),
            kind: draft.kind,
            amount,
            currency: draft.currency.clone(),
            category_id: draft.category_id.clone(),
            root_category_id: draft.root_category_id.clone(),
            account_id: draft.account_id.clone(),
            to_account_id,
            status: draft.status,
            occurred_at: draft.occurred_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
            note: draft.note.clone(),
            tags: draft.tags.clone(),
            images: draft.images.clone(),
            exclude_from_stats: draft.exclude_from_stats,
            refund_status: RefundStatus::None,
            related_entry_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypad::OperatorKey;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 26, 13, 50, 0).unwrap()
    }

    fn new_controller(kind: EntryKind, category_id: &str) -> EntryController {
        EntryController::new(EntryDraft::new(kind, category_id, "CNY"))
    }

    fn feed(controller: &mut EntryController, script: &str) -> Vec<Outcome> {
        Key::parse_script(script)
            .unwrap()
            .into_iter()
            .map(|key| controller.press_at(key, now()))
            .collect()
    }

    #[test]
    fn test_commit_creates_entry() {
        let mut controller = new_controller(EntryKind::Expense, "cat_food");
        let outcomes = feed(&mut controller, "66.34=");
        let Outcome::Created(entry) = outcomes.last().unwrap() else {
            panic!("expected an entry, got {outcomes:?}");
        };
        assert_eq!(entry.amount(), Amount::from_minor(6634));
        assert_eq!(entry.kind(), EntryKind::Expense);
        assert_eq!(entry.category_id(), "cat_food");
        assert_eq!(entry.account_id(), DEFAULT_ACCOUNT_ID);
        assert_eq!(entry.currency(), "CNY");
        assert_eq!(entry.occurred_at(), now());
        assert_eq!(entry.created_at(), now());
        assert_eq!(entry.updated_at(), now());
        assert!(!entry.id().is_empty());
        assert_eq!(controller.state(), &EntryState::new());
    }

    #[test]
    fn test_commit_rejects_zero() {
        let mut controller = new_controller(EntryKind::Expense, "cat_food");
        let outcome = controller.press_at(Key::Complete, now());
        assert_eq!(outcome, Outcome::Rejected(CommitRejection::NotPositive));
        assert_eq!(controller.state(), &EntryState::new());
    }

    #[test]
    fn test_equals_then_done() {
        let mut controller = new_controller(EntryKind::Income, "cat_salary");
        let outcomes = feed(&mut controller, "100+50++2");
        assert!(outcomes.iter().all(|o| *o == Outcome::Editing));
        assert_eq!(controller.state().left(), "150");

        assert_eq!(controller.press_at(Key::Complete, now()), Outcome::Editing);
        assert_eq!(controller.state().left(), "300");

        match controller.press_at(Key::Complete, now()) {
            Outcome::Created(entry) => assert_eq!(entry.amount(), Amount::from_minor(30000)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_transfer_keeps_destination_only_for_transfers() {
        let mut draft = EntryDraft::new(EntryKind::Transfer, "cat_food", "CNY");
        draft.to_account_id = Some("acc_savings".to_string());
        let mut controller = EntryController::new(draft);
        let Outcome::Created(entry) = feed(&mut controller, "5=").pop().unwrap() else {
            panic!("expected an entry");
        };
        assert_eq!(entry.to_account_id(), Some("acc_savings"));

        controller.draft_mut().kind = EntryKind::Expense;
        let Outcome::Created(entry) = feed(&mut controller, "5=").pop().unwrap() else {
            panic!("expected an entry");
        };
        assert_eq!(entry.to_account_id(), None);
    }

    #[test]
    fn test_explicit_occurrence_time() {
        let mut draft = EntryDraft::new(EntryKind::Expense, "cat_food", "CNY");
        let when = Utc.with_ymd_and_hms(2026, 2, 20, 8, 0, 0).unwrap();
        draft.occurred_at = Some(when);
        draft.note = "breakfast".to_string();
        draft.tags = vec!["work".to_string()];
        let mut controller = EntryController::new(draft);
        let Outcome::Created(entry) = feed(&mut controller, "12=").pop().unwrap() else {
            panic!("expected an entry");
        };
        assert_eq!(entry.occurred_at(), when);
        assert_eq!(entry.created_at(), now());
        assert_eq!(entry.note(), "breakfast");
        assert_eq!(entry.tags(), &["work".to_string()]);
    }

    #[test]
    fn test_operator_keys_pass_through() {
        let mut controller = new_controller(EntryKind::Expense, "cat_food");
        feed(&mut controller, "9");
        controller.press_at(Key::Operator(OperatorKey::MinusDivide), now());
        controller.press_at(Key::Operator(OperatorKey::MinusDivide), now());
        assert_eq!(
            controller.state().operator(),
            Some(crate::keypad::Operator::Divide)
        );
        controller.press_at(Key::Clear, now());
        assert_eq!(controller.state(), &EntryState::new());
    }
}
