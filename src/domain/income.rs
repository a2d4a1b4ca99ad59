//! Income ledger event.

use crate::domain::{Decimal, Symbol, TimeMs};
use serde::{Deserialize, Serialize};

/// Income category as tagged by `GET /fapi/v1/income`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomeType {
    Transfer,
    WelcomeBonus,
    RealizedPnl,
    FundingFee,
    Commission,
    InsuranceClear,
    ReferralKickback,
    CommissionRebate,
    ApiRebate,
    ContestReward,
    CrossCollateralTransfer,
    OptionsPremiumFee,
    OptionsSettleProfit,
    InternalTransfer,
    AutoExchange,
    // Exchange spelling.
    #[serde(rename = "DELIVERED_SETTELMENT")]
    DeliveredSettlement,
    CoinSwapDeposit,
    CoinSwapWithdraw,
    PositionLimitIncreaseFee,
    #[serde(other)]
    Other,
}

/// One row of the account income ledger.
///
/// Unlike [`crate::domain::Fill::commission`], `income` is signed: commission
/// and funding payments appear as negative amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeRecord {
    /// Empty for account-level entries such as transfers.
    #[serde(default, deserialize_with = "empty_symbol_as_none")]
    pub symbol: Option<Symbol>,
    pub income_type: IncomeType,
    pub income: Decimal,
    pub asset: String,
    pub time: TimeMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tran_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "trade_id_from_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub trade_id: Option<String>,
}

impl IncomeRecord {
    pub fn new(income_type: IncomeType, income: Decimal, time: TimeMs) -> Self {
        IncomeRecord {
            symbol: None,
            income_type,
            income,
            asset: "USDT".to_string(),
            time,
            info: None,
            tran_id: None,
            trade_id: None,
        }
    }

    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = Some(symbol);
        self
    }
}

fn empty_symbol_as_none<'de, D>(deserializer: D) -> Result<Option<Symbol>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(Symbol::new))
}

// tradeId is "" for non-trade rows and a string or number otherwise.
fn trade_id_from_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
