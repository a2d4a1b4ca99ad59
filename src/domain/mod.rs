//! Domain types for the futures dashboard.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Primitives: TimeMs, Symbol, Side, PositionSide
//! - Exchange records: Fill, IncomeRecord, AccountInfo, PositionRisk, Order
//! - Stable time ordering for fills

pub mod account;
pub mod decimal;
pub mod fill;
pub mod income;
pub mod ordering;
pub mod primitives;

pub use account::{AccountInfo, Direction, Order, PositionRisk};
pub use decimal::Decimal;
pub use fill::Fill;
pub use income::{IncomeRecord, IncomeType};
pub use ordering::{is_time_sorted, sort_fills_by_time};
pub use primitives::{PositionSide, Side, Symbol, TimeMs};
