use crate::model::collection::{Collection, Keyed};
use crate::model::Amount;
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Cash,
    #[default]
    Debit,
    Credit,
    Investment,
}

serde_plain::derive_display_from_serialize!(AccountType);
serde_plain::derive_fromstr_from_deserialize!(AccountType);

/// A place money is held, such as a wallet or a bank card.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Account {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) icon: String,
    pub(crate) color: String,
    /// Currency code, e.g. `CNY` or `USD`.
    pub(crate) currency: String,
    pub(crate) balance: Amount,
    pub(crate) initial_balance: Amount,
    pub(crate) account_type: AccountType,
    /// Leave this account out of the total assets figure.
    pub(crate) exclude_from_total: bool,
    pub(crate) is_active: bool,
}

impl Keyed for Account {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Account {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        currency: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: String::from("wallet-outline"),
            color: String::from("#3E94FD"),
            currency: currency.into(),
            balance: Amount::ZERO,
            initial_balance: Amount::ZERO,
            account_type,
            exclude_from_total: false,
            is_active: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

pub const DEFAULT_ACCOUNT_ID: &str = "acc_default";

/// The collection of accounts.
pub type Accounts = Collection<Account>;

/// The accounts a new ledger starts with: a single default debit account in `currency`.
pub fn default_accounts(currency: &str) -> Accounts {
    let mut accounts = Accounts::default();
    accounts.upsert(Account::new(
        DEFAULT_ACCOUNT_ID,
        "Default",
        currency,
        AccountType::Debit,
    ));
    accounts
}
