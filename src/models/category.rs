//! Trivia category model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A read-only trivia category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Categories keyed by id, serialized as `{"1": "Science", ...}`.
pub fn category_map(categories: &[Category]) -> BTreeMap<i64, String> {
    categories
        .iter()
        .map(|c| (c.id, c.kind.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_map_serializes_with_string_keys() {
        let categories = vec![
            Category {
                id: 2,
                kind: "Art".to_string(),
            },
            Category {
                id: 1,
                kind: "Science".to_string(),
            },
        ];
        let value = serde_json::to_value(category_map(&categories)).unwrap();
        assert_eq!(value["1"], "Science");
        assert_eq!(value["2"], "Art");
    }
}
