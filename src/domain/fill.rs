//! Fill type representing one executed trade leg.

use crate::domain::{Decimal, PositionSide, Side, Symbol, TimeMs};
use serde::{Deserialize, Serialize};

/// A single account trade as returned by `GET /fapi/v1/userTrades`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub symbol: Symbol,
    /// Exchange trade id.
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub order_id: i64,
    pub side: Side,
    #[serde(default)]
    pub position_side: PositionSide,
    pub price: Decimal,
    /// Quantity as reported by the exchange. Aggregation always uses `|qty|`.
    pub qty: Decimal,
    #[serde(default)]
    pub quote_qty: Decimal,
    /// Realized P&L booked by this fill. Non-zero marks a closing fill.
    pub realized_pnl: Decimal,
    /// Commission magnitude, summed as reported.
    pub commission: Decimal,
    #[serde(default)]
    pub commission_asset: String,
    pub time: TimeMs,
    #[serde(default)]
    pub buyer: bool,
    #[serde(default)]
    pub maker: bool,
}

impl Fill {
    pub fn new(
        symbol: Symbol,
        side: Side,
        qty: Decimal,
        price: Decimal,
        realized_pnl: Decimal,
        commission: Decimal,
        time: TimeMs,
    ) -> Self {
        Fill {
            symbol,
            id: 0,
            order_id: 0,
            side,
            position_side: PositionSide::Both,
            price,
            qty,
            quote_qty: price * qty.abs(),
            realized_pnl,
            commission,
            commission_asset: String::new(),
            time,
            buyer: side == Side::Buy,
            maker: false,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Whether this fill reduced or closed a position.
    ///
    /// The exchange does not flag closing fills. Any fill that booked realized
    /// P&L is taken as closing and every zero-P&L fill as opening. A close at
    /// exactly break-even is therefore counted as an opening fill.
    pub fn is_closing(&self) -> bool {
        !self.realized_pnl.is_zero()
    }

    /// Unsigned quantity.
    pub fn abs_qty(&self) -> Decimal {
        self.qty.abs()
    }

    /// `price × |qty|`, the weight this fill carries in an average price.
    pub fn notional(&self) -> Decimal {
        self.price * self.abs_qty()
    }
}
