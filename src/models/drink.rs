//! Drink model with its short and long recipe projections.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A drink and its recipe as stored.
///
/// The recipe is whatever JSON the frontend sent; it is kept opaque and only
/// projected on the way out.
#[derive(Debug, Clone, PartialEq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Value,
}

/// Public representation: ingredient colors and parts only.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Value>,
}

/// Full representation including ingredient names.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LongDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Value,
}

impl Drink {
    /// Recipe entries; a single ingredient object counts as a one-item recipe.
    fn ingredients(&self) -> Vec<&Value> {
        match &self.recipe {
            Value::Array(items) => items.iter().collect(),
            Value::Null => Vec::new(),
            other => vec![other],
        }
    }

    pub fn short(&self) -> ShortDrink {
        let recipe = self
            .ingredients()
            .into_iter()
            .map(|item| {
                serde_json::json!({
                    "color": item.get("color").cloned().unwrap_or(Value::Null),
                    "parts": item.get("parts").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();

        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe,
        }
    }

    pub fn long(&self) -> LongDrink {
        LongDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}

/// Request body for creating a drink.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Value>,
}

/// Request body for patching a drink.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Value>,
}
