//! Account, position and order snapshots passed through to the dashboard.

use crate::domain::{Decimal, PositionSide, Side, Symbol, TimeMs};
use serde::{Deserialize, Serialize};

/// Balance summary from `GET /fapi/v2/account`. Per-asset and per-position
/// arrays are not carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub total_wallet_balance: Decimal,
    pub available_balance: Decimal,
    pub total_unrealized_profit: Decimal,
    #[serde(default)]
    pub total_margin_balance: Decimal,
    #[serde(default)]
    pub total_initial_margin: Decimal,
    #[serde(default)]
    pub total_maint_margin: Decimal,
    #[serde(default)]
    pub max_withdraw_amount: Decimal,
}

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

/// Row of `GET /fapi/v2/positionRisk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRisk {
    pub symbol: Symbol,
    pub position_amt: Decimal,
    pub entry_price: Decimal,
    pub mark_price: Decimal,
    #[serde(rename = "unRealizedProfit")]
    pub unrealized_profit: Decimal,
    #[serde(default)]
    pub liquidation_price: Decimal,
    #[serde(default)]
    pub leverage: Decimal,
    #[serde(default)]
    pub margin_type: String,
    #[serde(default)]
    pub isolated_margin: Decimal,
    #[serde(default)]
    pub position_side: PositionSide,
    #[serde(default)]
    pub update_time: TimeMs,
}

impl PositionRisk {
    pub fn is_open(&self) -> bool {
        !self.position_amt.is_zero()
    }

    pub fn direction(&self) -> Direction {
        if self.position_amt.is_positive() {
            Direction::Long
        } else {
            Direction::Short
        }
    }
}

/// Row of `GET /fapi/v1/allOrders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub symbol: Symbol,
    pub status: String,
    #[serde(default)]
    pub client_order_id: String,
    pub price: Decimal,
    #[serde(default)]
    pub avg_price: Decimal,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    #[serde(default)]
    pub cum_quote: Decimal,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: Side,
    #[serde(default)]
    pub position_side: PositionSide,
    #[serde(default)]
    pub reduce_only: bool,
    pub time: TimeMs,
    #[serde(default)]
    pub update_time: TimeMs,
}
