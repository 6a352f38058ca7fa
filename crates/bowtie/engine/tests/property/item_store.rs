//! Property tests: item collections stay ordered, unique and reversible.

use bowtie_types::*;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Za-z]{1,12}", 0..max).prop_map(|set| set.into_iter().collect())
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn collection_of(category: Category, names: &[String]) -> ItemCollection {
    let mut collection = ItemCollection::new(category);
    for name in names {
        collection.add(Item::custom(name.clone())).unwrap();
    }
    collection
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Adding a new item and removing it again restores the collection.
    #[test]
    fn add_then_remove_restores_collection(
        category in arb_category(),
        names in arb_names(10),
        extra in "[0-9]{1,6}",
    ) {
        let mut collection = collection_of(category, &names);
        let before = collection.clone();

        collection.add(Item::custom(extra.clone())).unwrap();
        prop_assert_eq!(collection.len(), before.len() + 1);

        let removed = collection.remove(collection.len() - 1).unwrap();
        prop_assert_eq!(removed.name, extra);
        prop_assert_eq!(collection, before);
    }

    /// Re-adding any existing name is rejected and changes nothing.
    #[test]
    fn duplicates_are_rejected(
        category in arb_category(),
        names in arb_names(10).prop_filter("non-empty", |n| !n.is_empty()),
        pick in any::<prop::sample::Index>(),
        padding in " {0,3}",
    ) {
        let mut collection = collection_of(category, &names);
        let before = collection.clone();
        let existing = pick.get(&names);

        let result = collection.add(Item::custom(format!("{}{}{}", padding, existing, padding)));
        let is_duplicate = matches!(result, Err(WorkflowError::DuplicateItem { .. }));
        prop_assert!(is_duplicate);
        prop_assert_eq!(collection, before);
    }

    /// Identifiers are unique within a collection, whatever the history.
    #[test]
    fn ids_stay_unique(
        category in arb_category(),
        names in arb_names(12),
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
        more in arb_names(6),
    ) {
        let mut collection = collection_of(category, &names);
        for index in removals {
            if !collection.is_empty() {
                let i = index.index(collection.len());
                collection.remove(i).unwrap();
            }
        }
        for name in more {
            let _ = collection.add(Item::custom(format!("{}x", name)));
        }

        let ids: std::collections::BTreeSet<_> =
            collection.iter().filter_map(|item| item.id.clone()).collect();
        prop_assert_eq!(ids.len(), collection.len());
        for id in &ids {
            prop_assert!(id.starts_with(category.prefix()));
        }
    }
}
