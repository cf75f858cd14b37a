use crate::Result;
use anyhow::bail;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A record that is identified by a unique, stable id string.
pub trait Keyed {
    fn id(&self) -> &str;
}

/// An ordered collection of records keyed by id. Ids are unique within a collection.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Collection<T>
where
    T: Debug + Clone + Serialize + DeserializeOwned + Keyed,
{
    items: Vec<T>,
}

impl<T> Default for Collection<T>
where
    T: Debug + Clone + Serialize + DeserializeOwned + Keyed,
{
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collection<T>
where
    T: Debug + Clone + Serialize + DeserializeOwned + Keyed,
{
    /// Creates a collection from `items`, failing if any id appears twice.
    pub fn new(items: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut collection = Self { items: Vec::new() };
        for item in items {
            collection.insert(item)?;
        }
        Ok(collection)
    }

    /// Returns the first id that appears more than once, if any.
    pub fn first_duplicate(&self) -> Option<&str> {
        self.items.iter().enumerate().find_map(|(ix, item)| {
            self.items[..ix]
                .iter()
                .any(|earlier| earlier.id() == item.id())
                .then(|| item.id())
        })
    }

    /// Appends `item`. Fails if an item with the same id already exists.
    pub fn insert(&mut self, item: T) -> Result<()> {
        if self.contains(item.id()) {
            bail!("An item with id '{}' already exists", item.id());
        }
        self.items.push(item);
        Ok(())
    }

    /// Replaces the item with the same id, or appends `item` if there is none.
    pub fn upsert(&mut self, item: T) {
        match self.position(item.id()) {
            Some(ix) => self.items[ix] = item,
            None => self.items.push(item),
        }
    }

    /// Applies `change` to the item with `id`. Returns false if there is no such item.
    ///
    /// The id is restored after `change` runs, so an update can never re-key an item.
    pub fn update(&mut self, id: &str, change: impl FnOnce(&mut T)) -> bool {
        let Some(ix) = self.position(id) else {
            return false;
        };
        let original = self.items[ix].clone();
        change(&mut self.items[ix]);
        if self.items[ix].id() != original.id() {
            self.items[ix] = original;
            return false;
        }
        true
    }

    /// Removes and returns the item with `id`.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let ix = self.position(id)?;
        Some(self.items.remove(ix))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}
