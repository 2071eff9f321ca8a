pub mod amount;
pub mod category;
pub mod common;
pub mod contribution;
pub mod movement;
pub mod window;

pub use category::{Category, CategoryDisplay, CategoryKind, UNCATEGORIZED};
pub use common::LedgerRow;
pub use contribution::{GoalContribution, InvestmentContribution};
pub use movement::{Movement, MovementType, Origin};
pub use window::DateWindow;

/// Owner of a ledger; rows are always fetched for exactly one user.
pub type UserId = uuid::Uuid;
