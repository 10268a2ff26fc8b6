//! Category name resolution

use std::collections::HashMap;

use crate::models::{Category, CategoryRef, EntityId, Transaction};

/// Shown for a transaction whose category cannot be resolved
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Shown for a category id with no known category, in chips and charts
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";

/// Display name for the category of `tx`.
///
/// An embedded category with a non-blank name wins. Otherwise the id is
/// looked up in `categories`. Ids are compared as integers, so `"5"` and `5`
/// match since both decode to the same [`EntityId`].
pub fn resolve_category_name(tx: &Transaction, categories: &[Category]) -> String {
    if let Some(name) = embedded_name(&tx.category) {
        return name.to_string();
    }
    tx.category
        .id()
        .and_then(|id| {
            categories
                .iter()
                .find(|c| c.id == Some(id) && !c.name.trim().is_empty())
        })
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string())
}

fn embedded_name(reference: &CategoryRef) -> Option<&str> {
    match reference {
        CategoryRef::Embedded(category) if !category.name.trim().is_empty() => {
            Some(category.name.as_str())
        }
        _ => None,
    }
}

/// Id to name map for rendering many rows against one category list
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    names: HashMap<EntityId, String>,
}

impl CategoryIndex {
    pub fn new(categories: &[Category]) -> Self {
        let names = categories
            .iter()
            .filter(|c| !c.name.trim().is_empty())
            .filter_map(|c| c.id.map(|id| (id, c.name.clone())))
            .collect();
        Self { names }
    }

    pub fn name_of(&self, id: EntityId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Name for `id`, or [`UNKNOWN_CATEGORY_LABEL`]
    pub fn label_for(&self, id: EntityId) -> String {
        self.name_of(id)
            .unwrap_or(UNKNOWN_CATEGORY_LABEL)
            .to_string()
    }

    /// Same resolution order as [`resolve_category_name`]
    pub fn resolve(&self, tx: &Transaction) -> String {
        if let Some(name) = embedded_name(&tx.category) {
            return name.to_string();
        }
        tx.category
            .id()
            .and_then(|id| self.name_of(id))
            .unwrap_or(UNCATEGORIZED_LABEL)
            .to_string()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(json: &str) -> Transaction {
        serde_json::from_str(json).unwrap()
    }

    fn categories() -> Vec<Category> {
        serde_json::from_str(r#"[{"id": "5", "name": "Food"}, {"id": 6, "name": "  "}]"#).unwrap()
    }

    #[test]
    fn test_id_lookup_coerces_string_ids() {
        let t = tx(r#"{"amount": 1, "date": "2024-01-01", "type": "EXPENSE", "categoryId": 5}"#);
        assert_eq!(resolve_category_name(&t, &categories()), "Food");
    }

    #[test]
    fn test_missing_id_is_uncategorized() {
        let t = tx(r#"{"amount": 1, "date": "2024-01-01", "type": "EXPENSE", "categoryId": 99}"#);
        assert_eq!(resolve_category_name(&t, &categories()), UNCATEGORIZED_LABEL);

        let none = tx(r#"{"amount": 1, "date": "2024-01-01", "type": "EXPENSE"}"#);
        assert_eq!(resolve_category_name(&none, &[]), UNCATEGORIZED_LABEL);
    }

    #[test]
    fn test_embedded_name_wins() {
        let t = tx(r#"{"amount": 1, "date": "2024-01-01", "type": "INCOME",
            "category": {"id": 5, "name": "Salary"}}"#);
        assert_eq!(resolve_category_name(&t, &categories()), "Salary");
    }

    #[test]
    fn test_blank_embedded_name_falls_back_to_lookup() {
        let t = tx(r#"{"amount": 1, "date": "2024-01-01", "type": "INCOME",
            "category": {"id": "5", "name": ""}}"#);
        assert_eq!(resolve_category_name(&t, &categories()), "Food");

        let blank = tx(r#"{"amount": 1, "date": "2024-01-01", "type": "INCOME", "categoryId": 6}"#);
        assert_eq!(resolve_category_name(&blank, &categories()), UNCATEGORIZED_LABEL);
    }

    #[test]
    fn test_index_matches_function() {
        let list = categories();
        let index = CategoryIndex::new(&list);
        assert_eq!(index.len(), 1);
        for json in [
            r#"{"amount": 1, "date": "2024-01-01", "type": "EXPENSE", "categoryId": "5"}"#,
            r#"{"amount": 1, "date": "2024-01-01", "type": "EXPENSE", "categoryId": 42}"#,
            r#"{"amount": 1, "date": "2024-01-01", "type": "EXPENSE", "category": {"name": "Gym"}}"#,
        ] {
            let t = tx(json);
            assert_eq!(index.resolve(&t), resolve_category_name(&t, &list));
        }
        assert_eq!(index.label_for(42), UNKNOWN_CATEGORY_LABEL);
    }
}
