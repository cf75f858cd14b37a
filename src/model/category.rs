use crate::model::collection::{Collection, Keyed};
use serde::{Deserialize, Serialize};

/// Whether a category files spending or earnings.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    #[default]
    Expense,
    Income,
}

serde_plain::derive_display_from_serialize!(CategoryKind);
serde_plain::derive_fromstr_from_deserialize!(CategoryKind);

/// A category that entries are filed under. Categories may nest one level via `parent_id`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Category {
    pub(crate) id: String,
    pub(crate) parent_id: Option<String>,
    pub(crate) name: String,
    /// Icon name from the icon set used by the front end.
    pub(crate) icon: String,
    /// Hex color, e.g. `#E36F58`.
    pub(crate) color: String,
    pub(crate) kind: CategoryKind,
    /// Lower numbers sort first.
    pub(crate) sort_order: u32,
    /// Deleting a category deactivates it rather than removing it.
    pub(crate) is_active: bool,
}

impl Keyed for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        kind: CategoryKind,
        sort_order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            kind,
            sort_order,
            is_active: true,
        }
    }

    /// Sets the parent category.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// The placeholder shown for entries whose category is missing or inactive.
    pub fn uncategorized() -> Self {
        Self::new(
            UNCATEGORIZED_ID,
            "Uncategorized",
            "help-circle-outline",
            "#A9A9B0",
            CategoryKind::Expense,
            u32::MAX,
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    pub fn sort_order(&self) -> u32 {
        self.sort_order
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }
}

pub const UNCATEGORIZED_ID: &str = "cat_uncategorized";

/// The collection of categories.
pub type Categories = Collection<Category>;

const EXPENSE_COLOR: &str = "#E36F58";
const INCOME_COLOR: &str = "#60C170";

/// The category set a new ledger starts with.
pub fn default_categories() -> Categories {
    use CategoryKind::{Expense, Income};
    let e = |id: &str, name: &str, icon: &str, order: u32| {
        Category::new(id, name, icon, EXPENSE_COLOR, Expense, order)
    };
    let i = |id: &str, name: &str, icon: &str, order: u32| {
        Category::new(id, name, icon, INCOME_COLOR, Income, order)
    };

    let categories = vec![
        e("cat_food", "Dining", "food-drumstick-outline", 1),
        e("cat_shopping", "Shopping", "cart-outline", 2),
        e("cat_cloth", "Clothing", "tshirt-crew-outline", 3).with_parent("cat_shopping"),
        e("cat_daily", "Household", "bottle-tonic-outline", 4).with_parent("cat_shopping"),
        e("cat_digital", "Electronics", "cellphone", 5).with_parent("cat_shopping"),
        e("cat_beauty_root", "Appearance", "face-woman-shimmer-outline", 6),
        e("cat_beauty", "Makeup", "lipstick", 7).with_parent("cat_beauty_root"),
        e("cat_skin", "Skincare", "bottle-tonic-plus-outline", 8).with_parent("cat_beauty_root"),
        e("cat_house", "Housing", "home-city-outline", 9),
        e("cat_traffic", "Transport", "bus", 10),
        e("cat_car", "Car", "car-outline", 11).with_parent("cat_traffic"),
        e("cat_game", "Entertainment", "gamepad-variant-outline", 12),
        e("cat_travel_root", "Travel", "bag-suitcase-outline", 13).with_parent("cat_game"),
        e("cat_vacation", "Vacation", "palm-tree", 14).with_parent("cat_game"),
        e("cat_social", "Social", "account-group-outline", 15),
        e("cat_favor", "Gifts", "hand-heart-outline", 16).with_parent("cat_social"),
        e("cat_medical", "Medical", "medical-bag", 17),
        e("cat_baby", "Childcare", "baby-face-outline", 18),
        e("cat_pet", "Pets", "paw-outline", 19),
        e("cat_study", "Education", "book-open-page-variant-outline", 20),
        e("cat_office", "Office", "printer-outline", 21),
        e("cat_smoke", "Tobacco & Alcohol", "glass-cocktail", 22),
        e("cat_lottery", "Lottery", "ticket-outline", 23),
        i("cat_salary", "Salary", "cash-multiple", 101),
        i("cat_bonus", "Bonus", "gift-outline", 102),
        i("cat_investment", "Investments", "chart-line", 103),
        i("cat_refund_income", "Refunds", "keyboard-return", 104),
    ];

    let mut collection = Categories::default();
    for category in categories {
        collection.upsert(category);
    }
    collection
}

/// Resolves category ids for display.
pub trait CategoryLookup {
    /// Returns the category with `id`, or `None` if it does not exist.
    fn category(&self, id: &str) -> Option<&Category>;

    /// Returns the active category with `id`, falling back to the uncategorized placeholder.
    fn resolve(&self, id: &str) -> Category {
        match self.category(id) {
            Some(category) if category.is_active() => category.clone(),
            _ => Category::uncategorized(),
        }
    }
}

impl CategoryLookup for Categories {
    fn category(&self, id: &str) -> Option<&Category> {
        self.get(id)
    }
}

impl CategoryLookup for std::collections::HashMap<String, Category> {
    fn category(&self, id: &str) -> Option<&Category> {
        self.get(id)
    }
}
