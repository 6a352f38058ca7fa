//! Items and per-category item collections
//!
//! An item is a single chosen term (an activity, a pressure, a control,
//! a consequence). Collections keep insertion order, reject empty and
//! duplicate names, and hand out stable identifiers.

use crate::{Category, WorkflowError, WorkflowResult};
use serde::{Deserialize, Serialize};

// ── Provenance ───────────────────────────────────────────────────────

/// Where an item came from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemSource {
    /// Picked from the controlled vocabulary
    #[default]
    Vocabulary,
    /// Typed in by the user
    Custom,
}

impl ItemSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemSource::Vocabulary => "vocabulary",
            ItemSource::Custom => "custom",
        }
    }
}

/// Older snapshots store hierarchical level labels here ("Level 2", ...);
/// anything that is not "custom" came from the vocabulary.
impl From<String> for ItemSource {
    fn from(level: String) -> Self {
        if level.trim().eq_ignore_ascii_case("custom") {
            ItemSource::Custom
        } else {
            ItemSource::Vocabulary
        }
    }
}

impl From<ItemSource> for String {
    fn from(source: ItemSource) -> Self {
        source.as_str().to_string()
    }
}

impl std::fmt::Display for ItemSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Item ─────────────────────────────────────────────────────────────

/// A single collected bowtie element
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Display name, trimmed and unique within its category
    pub name: String,
    /// Provenance, persisted under the snapshot's `level` key
    #[serde(rename = "level", default)]
    pub source: ItemSource,
    /// Stable identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, source: ItemSource) -> Self {
        Self {
            name: name.into(),
            source,
            id: None,
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(name, ItemSource::Custom)
    }

    pub fn from_vocabulary(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(name, ItemSource::Vocabulary).with_id(id)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_custom(&self) -> bool {
        self.source == ItemSource::Custom
    }
}

// ── Collection ───────────────────────────────────────────────────────

/// Ordered, duplicate-free items of one category
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemCollection {
    category: Category,
    items: Vec<Item>,
}

impl ItemCollection {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            items: Vec::new(),
        }
    }

    /// Build a collection from stored items.
    ///
    /// Names are trimmed; empty and duplicate names are skipped and missing
    /// identifiers are assigned. Compare `len()` against the input to detect
    /// skipped entries.
    pub fn from_items(category: Category, items: impl IntoIterator<Item = Item>) -> Self {
        let mut collection = Self::new(category);
        for item in items {
            let _ = collection.add(item);
        }
        collection
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Add an item at the end of the collection.
    ///
    /// The name is trimmed. Empty names and exact (case-sensitive)
    /// duplicates are rejected.
    pub fn add(&mut self, item: Item) -> WorkflowResult<&Item> {
        let name = self.checked_name(&item.name, None)?;
        let id = match item.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => self.next_id(),
        };
        self.items.push(Item {
            name,
            source: item.source,
            id: Some(id),
        });
        Ok(&self.items[self.items.len() - 1])
    }

    /// Rename the item at `index`
    pub fn edit(&mut self, index: usize, new_name: &str) -> WorkflowResult<&Item> {
        self.check_index(index)?;
        let name = self.checked_name(new_name, Some(index))?;
        let item = &mut self.items[index];
        item.name = name;
        Ok(item)
    }

    /// Remove and return the item at `index`
    pub fn remove(&mut self, index: usize) -> WorkflowResult<Item> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    // ── Query methods ────────────────────────────────────────────────

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|i| i.name == name)
    }

    // ── Internal helpers ─────────────────────────────────────────────

    fn check_index(&self, index: usize) -> WorkflowResult<()> {
        if index >= self.items.len() {
            return Err(WorkflowError::IndexOutOfRange {
                category: self.category,
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Trim and check a candidate name, ignoring the item at `skip` (the one being renamed)
    fn checked_name(&self, raw: &str, skip: Option<usize>) -> WorkflowResult<String> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(WorkflowError::EmptyName {
                category: self.category,
            });
        }
        if let Some(existing) = self.position(name) {
            if Some(existing) != skip {
                return Err(WorkflowError::DuplicateItem {
                    category: self.category,
                    name: name.to_string(),
                });
            }
        }
        Ok(name.to_string())
    }

    /// `{PREFIX}_{n}` with the smallest n >= len + 1 not already taken
    fn next_id(&self) -> String {
        let mut n = self.items.len() + 1;
        loop {
            let candidate = format!("{}_{}", self.category.prefix(), n);
            if !self.items.iter().any(|i| i.id.as_deref() == Some(&candidate)) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl<'a> IntoIterator for &'a ItemCollection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ── All categories ───────────────────────────────────────────────────

/// The five item collections of a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedItems {
    pub activities: ItemCollection,
    pub pressures: ItemCollection,
    pub preventive_controls: ItemCollection,
    pub consequences: ItemCollection,
    pub protective_controls: ItemCollection,
}

impl SelectedItems {
    pub fn new() -> Self {
        Self {
            activities: ItemCollection::new(Category::Activities),
            pressures: ItemCollection::new(Category::Pressures),
            preventive_controls: ItemCollection::new(Category::PreventiveControls),
            consequences: ItemCollection::new(Category::Consequences),
            protective_controls: ItemCollection::new(Category::ProtectiveControls),
        }
    }

    pub fn get(&self, category: Category) -> &ItemCollection {
        match category {
            Category::Activities => &self.activities,
            Category::Pressures => &self.pressures,
            Category::PreventiveControls => &self.preventive_controls,
            Category::Consequences => &self.consequences,
            Category::ProtectiveControls => &self.protective_controls,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut ItemCollection {
        match category {
            Category::Activities => &mut self.activities,
            Category::Pressures => &mut self.pressures,
            Category::PreventiveControls => &mut self.preventive_controls,
            Category::Consequences => &mut self.consequences,
            Category::ProtectiveControls => &mut self.protective_controls,
        }
    }

    /// Item count per category, in bowtie order
    pub fn counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.get(*c).len()))
            .collect()
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Default for SelectedItems {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activities() -> ItemCollection {
        ItemCollection::new(Category::Activities)
    }

    #[test]
    fn test_add_trims_and_assigns_id() {
        let mut c = activities();
        let item = c.add(Item::custom("  Shipping  ")).unwrap();
        assert_eq!(item.name, "Shipping");
        assert_eq!(item.id.as_deref(), Some("ACT_1"));
        assert!(item.is_custom());
    }

    #[test]
    fn test_add_keeps_supplied_id() {
        let mut c = activities();
        c.add(Item::from_vocabulary("Fishing", "A1.2")).unwrap();
        assert_eq!(c.get(0).unwrap().id.as_deref(), Some("A1.2"));
        assert_eq!(c.get(0).unwrap().source, ItemSource::Vocabulary);
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let mut c = activities();
        let err = c.add(Item::custom("   ")).unwrap_err();
        assert!(matches!(err, WorkflowError::EmptyName { .. }));
        assert!(c.is_empty());
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let mut c = activities();
        c.add(Item::custom("Shipping")).unwrap();
        let err = c.add(Item::custom("Shipping ")).unwrap_err();
        assert!(matches!(err, WorkflowError::DuplicateItem { ref name, .. } if name == "Shipping"));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let mut c = activities();
        c.add(Item::custom("Shipping")).unwrap();
        c.add(Item::custom("shipping")).unwrap();
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_edit_renames_in_place() {
        let mut c = activities();
        c.add(Item::custom("Shipping")).unwrap();
        c.add(Item::custom("Dredging")).unwrap();
        let item = c.edit(1, " Trawling ").unwrap();
        assert_eq!(item.name, "Trawling");
        assert_eq!(item.id.as_deref(), Some("ACT_2"));
        assert_eq!(c.names(), vec!["Shipping", "Trawling"]);
    }

    #[test]
    fn test_edit_errors() {
        let mut c = activities();
        c.add(Item::custom("Shipping")).unwrap();
        c.add(Item::custom("Dredging")).unwrap();

        assert!(matches!(
            c.edit(5, "x").unwrap_err(),
            WorkflowError::IndexOutOfRange { index: 5, len: 2, .. }
        ));
        assert!(matches!(
            c.edit(0, "").unwrap_err(),
            WorkflowError::EmptyName { .. }
        ));
        assert!(matches!(
            c.edit(0, "Dredging").unwrap_err(),
            WorkflowError::DuplicateItem { .. }
        ));
        // Renaming to its own name is fine
        assert!(c.edit(0, "Shipping").is_ok());
    }

    #[test]
    fn test_remove() {
        let mut c = activities();
        c.add(Item::custom("Shipping")).unwrap();
        let removed = c.remove(0).unwrap();
        assert_eq!(removed.name, "Shipping");
        assert!(c.is_empty());
        assert!(matches!(
            c.remove(0).unwrap_err(),
            WorkflowError::IndexOutOfRange { .. }
        ));
    }

    #[test]
    fn test_generated_ids_avoid_collisions() {
        let mut c = activities();
        c.add(Item::custom("A")).unwrap();
        c.add(Item::custom("B")).unwrap();
        c.remove(0).unwrap();
        let id = c.add(Item::custom("C")).unwrap().id.clone();
        assert_eq!(id.as_deref(), Some("ACT_3"));
    }

    #[test]
    fn test_from_items_skips_invalid() {
        let c = ItemCollection::from_items(
            Category::Pressures,
            vec![
                Item::custom("Oil spill"),
                Item::custom(""),
                Item::custom("Oil spill"),
                Item::custom("Noise"),
            ],
        );
        assert_eq!(c.names(), vec!["Oil spill", "Noise"]);
        assert_eq!(c.get(1).unwrap().id.as_deref(), Some("PRS_2"));
    }

    #[test]
    fn test_source_parsing_is_lenient() {
        assert_eq!(ItemSource::from("Custom".to_string()), ItemSource::Custom);
        assert_eq!(ItemSource::from("Level 2".to_string()), ItemSource::Vocabulary);

        let item: Item = serde_json::from_str(r#"{"name":"Noise","level":"CUSTOM"}"#).unwrap();
        assert_eq!(item.source, ItemSource::Custom);
        assert!(item.id.is_none());
    }

    #[test]
    fn test_selected_items_counts() {
        let mut items = SelectedItems::new();
        items
            .get_mut(Category::Consequences)
            .add(Item::custom("Habitat loss"))
            .unwrap();
        assert_eq!(items.total(), 1);
        assert!(items
            .counts()
            .contains(&(Category::Consequences, 1)));
        assert_eq!(items.get(Category::Consequences).category(), Category::Consequences);
    }
}
