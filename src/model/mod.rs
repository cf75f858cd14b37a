//! Types that represent the core data model, such as `LedgerEntry`, `Category` and `Account`.
mod account;
mod amount;
mod category;
mod collection;
mod entry;

pub use account::{default_accounts, Account, AccountType, Accounts, DEFAULT_ACCOUNT_ID};
pub use amount::{Amount, AmountError, MINOR_PER_MAJOR};
pub(crate) use amount::group_thousands;
pub use category::{
    default_categories, Categories, Category, CategoryKind, CategoryLookup, UNCATEGORIZED_ID,
};
pub use collection::{Collection, Keyed};
pub use entry::{Entries, EntryKind, EntryStatus, LedgerEntry, RefundStatus};

#[cfg(test)]
pub(crate) use entry::fixtures;
