//! Domain primitives: TimeMs, Symbol, Side, PositionSide.

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch, as reported by the exchange.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        TimeMs(chrono::Utc::now().timestamp_millis())
    }

    pub fn as_ms(&self) -> i64 {
        self.0
    }

    pub fn saturating_sub_ms(&self, ms: i64) -> Self {
        TimeMs(self.0.saturating_sub(ms))
    }

    /// Milliseconds elapsed from `earlier` to `self`.
    pub fn since(&self, earlier: TimeMs) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Instrument identifier, e.g. `BTCUSDT`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Symbol(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order/fill direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hedge-mode position leg. One-way accounts report `BOTH`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    #[default]
    Both,
    Long,
    Short,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_uses_exchange_spelling() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"BUY\"");
        let sell: Side = serde_json::from_str("\"SELL\"").unwrap();
        assert_eq!(sell, Side::Sell);
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn position_side_defaults_to_both() {
        assert_eq!(PositionSide::default(), PositionSide::Both);
        let long: PositionSide = serde_json::from_str("\"LONG\"").unwrap();
        assert_eq!(long, PositionSide::Long);
    }

    #[test]
    fn time_arithmetic_saturates() {
        let t = TimeMs::new(i64::MIN + 5);
        assert_eq!(t.saturating_sub_ms(10), TimeMs::new(i64::MIN));
        assert_eq!(TimeMs::new(3000).since(TimeMs::new(1000)), 2000);
    }

    #[test]
    fn symbol_is_a_plain_json_string() {
        let s = Symbol::new("BTCUSDT");
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"BTCUSDT\"");
        assert_eq!(s.to_string(), "BTCUSDT");
    }
}
