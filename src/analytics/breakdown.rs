use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CategoryDisplay, Movement, MovementType, UNCATEGORIZED};

/// Grouping key of a breakdown row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    Category(Uuid),
    Uncategorized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub key: CategoryKey,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total: f64,
    /// Share of the filtered total, 0-100.
    pub percentage: f64,
    pub count: usize,
}

/// Groups movements of `kind` by category, largest total first.
///
/// Movements without a category, or whose category was not joined by the
/// reader (deleted or foreign), land in the uncategorized bucket. Equal totals
/// keep first-seen order.
pub fn breakdown_by_category(movements: &[Movement], kind: MovementType) -> Vec<CategoryBreakdown> {
    let mut rows: Vec<CategoryBreakdown> = Vec::new();
    let mut index: HashMap<CategoryKey, usize> = HashMap::new();
    let mut grand_total = 0.0;

    for movement in movements.iter().filter(|movement| movement.kind == kind) {
        let (key, display) = match (movement.category_id, movement.category.as_ref()) {
            (Some(id), Some(display)) => (CategoryKey::Category(id), display),
            _ => (CategoryKey::Uncategorized, &*UNCATEGORIZED),
        };
        let slot = *index.entry(key).or_insert_with(|| {
            rows.push(empty_row(key, display));
            rows.len() - 1
        });
        rows[slot].total += movement.amount;
        rows[slot].count += 1;
        grand_total += movement.amount;
    }

    for row in &mut rows {
        row.percentage = if grand_total > 0.0 {
            row.total / grand_total * 100.0
        } else {
            0.0
        };
    }
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));
    rows
}

fn empty_row(key: CategoryKey, display: &CategoryDisplay) -> CategoryBreakdown {
    CategoryBreakdown {
        key,
        name: display.name.clone(),
        icon: display.icon.clone(),
        color: display.color.clone(),
        total: 0.0,
        percentage: 0.0,
        count: 0,
    }
}
