//! Domain types representing movement categories.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::movement::MovementType;

pub const UNCATEGORIZED_NAME: &str = "Sin categoría";
pub const DEFAULT_ICON: &str = "circle";
pub const DEFAULT_COLOR: &str = "#6B7280";

/// Display fields used when a movement has no (or a dangling) category.
pub static UNCATEGORIZED: Lazy<CategoryDisplay> = Lazy::new(|| CategoryDisplay {
    name: UNCATEGORIZED_NAME.into(),
    icon: DEFAULT_ICON.into(),
    color: DEFAULT_COLOR.into(),
});

/// Groups movements of a single type for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            icon: default_icon(),
            color: default_color(),
            is_default: false,
        }
    }

    pub fn with_style(mut self, icon: impl Into<String>, color: impl Into<String>) -> Self {
        self.icon = icon.into();
        self.color = color.into();
        self
    }

    /// The denormalised view joined onto movements at read time.
    pub fn display(&self) -> CategoryDisplay {
        CategoryDisplay {
            name: self.name.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
        }
    }
}

/// Category fields copied onto a movement by the ledger reader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDisplay {
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl Default for CategoryDisplay {
    fn default() -> Self {
        UNCATEGORIZED.clone()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
    Saving,
}

impl From<MovementType> for CategoryKind {
    fn from(kind: MovementType) -> Self {
        match kind {
            MovementType::Income => CategoryKind::Income,
            MovementType::Expense => CategoryKind::Expense,
            MovementType::Saving => CategoryKind::Saving,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
            CategoryKind::Saving => "saving",
        };
        f.write_str(label)
    }
}

fn default_icon() -> String {
    DEFAULT_ICON.into()
}

fn default_color() -> String {
    DEFAULT_COLOR.into()
}
