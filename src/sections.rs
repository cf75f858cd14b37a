//! Groups ledger entries into day sections for the ledger list.
//!
//! Sections are derived data: they are rebuilt from the entries and categories whenever either
//! changes. Which sections are collapsed is tracked separately in [`CollapsedSections`], keyed by
//! calendar day, so rebuilding never loses it and collapsing never touches the totals.

use crate::model::{Amount, CategoryLookup, EntryKind, LedgerEntry};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;
use tracing::trace;

/// One entry as shown in a section.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RowView {
    pub entry_id: String,
    pub kind: EntryKind,
    pub amount: Amount,
    pub category_id: String,
    pub category_name: String,
    pub category_icon: String,
    pub category_color: String,
    pub note: String,
    pub occurred_at: DateTime<Utc>,
    /// Local time of day, `HH:MM`.
    pub time_label: String,
}

/// All entries of one local calendar day.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub key: NaiveDate,
    /// `YYYY-MM-DD`
    pub date_label: String,
    /// Abbreviated weekday, e.g. `Thu`.
    pub weekday_label: String,
    /// Sum of the day's expense amounts. Income and transfers are not counted.
    pub expense_total: Amount,
    /// Newest first.
    pub rows: Vec<RowView>,
}

/// Builds the day sections for `entries`, newest day first.
///
/// Entries are ordered newest first by `occurred_at`; entries at the same instant keep their
/// relative order from `entries`. Days are taken in the time zone `tz`.
pub fn build_sections<Tz>(
    entries: &[LedgerEntry],
    categories: &impl CategoryLookup,
    tz: &Tz,
) -> Vec<Section>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut sorted: Vec<&LedgerEntry> = entries.iter().collect();
    // Stable: same-instant entries do not swap places between renders.
    sorted.sort_by(|a, b| b.occurred_at().cmp(&a.occurred_at()));

    let mut sections: Vec<Section> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for entry in sorted {
        let local = entry.occurred_at().with_timezone(tz);
        let day = local.date_naive();
        let ix = *index.entry(day).or_insert_with(|| {
            sections.push(Section {
                key: day,
                date_label: day.format("%Y-%m-%d").to_string(),
                weekday_label: day.format("%a").to_string(),
                expense_total: Amount::ZERO,
                rows: Vec::new(),
            });
            sections.len() - 1
        });

        let category = categories.resolve(entry.category_id());
        let section = &mut sections[ix];
        if entry.kind() == EntryKind::Expense {
            section.expense_total += entry.amount().abs();
        }
        section.rows.push(RowView {
            entry_id: entry.id().to_string(),
            kind: entry.kind(),
            amount: entry.amount(),
            category_id: category.id().to_string(),
            category_name: category.name().to_string(),
            category_icon: category.icon().to_string(),
            category_color: category.color().to_string(),
            note: entry.note().to_string(),
            occurred_at: entry.occurred_at(),
            time_label: local.format("%H:%M").to_string(),
        });
    }

    trace!(
        "Built {} sections from {} entries",
        sections.len(),
        entries.len()
    );
    sections
}

/// The set of days whose sections are collapsed in the list.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CollapsedSections(BTreeSet<NaiveDate>);

impl CollapsedSections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, key: NaiveDate) -> bool {
        self.0.contains(&key)
    }

    pub fn collapse(&mut self, key: NaiveDate) {
        self.0.insert(key);
    }

    pub fn expand(&mut self, key: NaiveDate) {
        self.0.remove(&key);
    }

    /// Flips the collapsed state of `key` and returns the new state.
    pub fn toggle(&mut self, key: NaiveDate) -> bool {
        if self.0.remove(&key) {
            false
        } else {
            self.0.insert(key);
            true
        }
    }

    /// Views `sections` with the rows of collapsed days hidden. `sections` is not modified.
    pub fn apply<'a>(&self, sections: &'a [Section]) -> Vec<SectionView<'a>> {
        sections
            .iter()
            .map(|section| SectionView {
                section,
                collapsed: self.is_collapsed(section.key),
            })
            .collect()
    }
}

impl FromIterator<NaiveDate> for CollapsedSections {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A section as displayed, with its rows hidden when collapsed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SectionView<'a> {
    section: &'a Section,
    collapsed: bool,
}

impl<'a> SectionView<'a> {
    pub fn section(&self) -> &'a Section {
        self.section
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// The visible rows: none when collapsed.
    pub fn rows(&self) -> &'a [RowView] {
        if self.collapsed {
            &[]
        } else {
            &self.section.rows
        }
    }

    /// An owned copy of the section carrying only the visible rows.
    pub fn to_section(&self) -> Section {
        Section {
            key: self.section.key,
            date_label: self.section.date_label.clone(),
            weekday_label: self.section.weekday_label.clone(),
            expense_total: self.section.expense_total,
            rows: self.rows().to_vec(),
        }
    }
}
