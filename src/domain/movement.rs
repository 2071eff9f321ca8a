use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::amount::deserialize_movement_amount;
use crate::domain::category::{Category, CategoryDisplay, CategoryKind};
use crate::domain::common::LedgerRow;

/// A dated income, expense or saving entry. `amount` is non-negative (negative
/// stored values read as zero); direction comes from `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MovementType,
    #[serde(default, deserialize_with = "deserialize_movement_amount")]
    pub amount: f64,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// Joined by the ledger reader; `None` when the category is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryDisplay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub origin: Origin,
}

impl Movement {
    pub fn new(kind: MovementType, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            category_id: None,
            category: None,
            concept: None,
            date,
            origin: Origin::Manual,
        }
    }

    /// Links the movement to `category`, copying its display fields.
    pub fn with_category(mut self, category: &Category) -> Self {
        self.category_id = Some(category.id);
        self.category = Some(category.display());
        self
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    /// Soft invariant: a linked category should share the movement's type.
    pub fn category_kind_matches(&self, category: &Category) -> bool {
        CategoryKind::from(self.kind) == category.kind
    }
}

impl LedgerRow for Movement {
    fn ledger_date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Income,
    Expense,
    Saving,
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MovementType::Income => "income",
            MovementType::Expense => "expense",
            MovementType::Saving => "saving",
        };
        f.write_str(label)
    }
}

/// How a movement entered the ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Manual,
    Voice,
    Import,
}
