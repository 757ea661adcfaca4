// ==========================================
// Lot Cost Engine - domain layer
// ==========================================
// Entities and enumerations only: no data access, no engine logic
// ==========================================

pub mod expense;
pub mod feed;
pub mod lot;
pub mod pen;
pub mod period;
pub mod production;
pub mod types;

pub use expense::{DirectExpense, SharedMonthlyExpense};
pub use feed::FeedConsumption;
pub use lot::Lot;
pub use pen::{Pen, PenAssignment, PenOccupancy};
pub use period::YearMonth;
pub use production::{HarvestRecord, MortalityRecord};
pub use types::{AreaBasis, DirectExpenseCategory, FeedCategory, LotStatus, SharedExpenseCategory};
