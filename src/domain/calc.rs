//! Risk-management and valuation calculators.
//!
//! Every function here is pure and deterministic. Monetary and percentage
//! outputs are rounded to 2 decimal places, ounce/share quantities to 4,
//! pip distances to the nearest integer (half away from zero).

use crate::domain::alert::AlertCondition;
use crate::domain::error::GoldwatchError;

/// Grams per troy ounce, the conversion factor for gram-denominated positions.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// Direction of the trade an ATR stop protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    Long,
    Short,
}

/// Unit a position quantity is denominated in. Valuation normalizes grams
/// to troy ounces; ounces and shares pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QuantityUnit {
    #[serde(rename = "oz")]
    TroyOunce,
    #[serde(rename = "gram")]
    Gram,
    #[serde(rename = "shares")]
    Share,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtrStopLoss {
    pub stop_loss: f64,
    pub stop_distance: f64,
    pub stop_distance_pips: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSize {
    pub risk_amount: f64,
    pub position_size_currency: f64,
    pub position_size_units: f64,
    pub potential_loss: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotPoints {
    pub pp: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

/// Per-position valuation against a live price. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ValuationResult {
    pub total_value: f64,
    pub unrealized_pl: f64,
    pub unrealized_pl_percent: f64,
    pub cost_basis: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn require_finite(field: &str, value: f64) -> Result<(), GoldwatchError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GoldwatchError::invalid_input(field, "must be finite"))
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), GoldwatchError> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(GoldwatchError::invalid_input(field, "must be positive"))
    }
}

/// ATR-based stop loss: the stop sits `atr * multiplier` away from the
/// current price, below for longs and above for shorts.
pub fn atr_stop_loss(
    current_price: f64,
    atr: f64,
    multiplier: f64,
    direction: TradeDirection,
) -> Result<AtrStopLoss, GoldwatchError> {
    require_positive("current_price", current_price)?;
    require_positive("atr", atr)?;
    require_positive("multiplier", multiplier)?;

    let stop_distance = atr * multiplier;
    let stop_distance_pips = (stop_distance / current_price * 10_000.0).round() as i64;
    let stop_loss = match direction {
        TradeDirection::Long => current_price - stop_distance,
        TradeDirection::Short => current_price + stop_distance,
    };

    Ok(AtrStopLoss {
        stop_loss: round2(stop_loss),
        stop_distance: round2(stop_distance),
        stop_distance_pips,
    })
}

/// Fixed-fractional position sizing from account balance and stop distance.
pub fn position_size(
    account_balance: f64,
    risk_percent: f64,
    entry_price: f64,
    stop_loss_price: f64,
) -> Result<PositionSize, GoldwatchError> {
    require_positive("account_balance", account_balance)?;
    require_positive("risk_percent", risk_percent)?;
    require_positive("entry_price", entry_price)?;
    require_positive("stop_loss_price", stop_loss_price)?;

    let stop_distance = (entry_price - stop_loss_price).abs();
    if stop_distance == 0.0 {
        return Err(GoldwatchError::DivisionByZero {
            context: "entry price equals stop loss price".into(),
        });
    }

    let risk_amount = account_balance * (risk_percent / 100.0);
    let position_size_currency = risk_amount / stop_distance;
    let position_size_units = position_size_currency / entry_price;
    let potential_loss = position_size_units * stop_distance;

    Ok(PositionSize {
        risk_amount: round2(risk_amount),
        position_size_currency: round2(position_size_currency),
        position_size_units: round4(position_size_units),
        potential_loss: round2(potential_loss),
    })
}

/// Classical floor-trader pivot levels from the prior session's high, low,
/// and close. The caller is responsible for `high >= low`.
pub fn pivot_points(high: f64, low: f64, close: f64) -> Result<PivotPoints, GoldwatchError> {
    require_finite("high", high)?;
    require_finite("low", low)?;
    require_finite("close", close)?;

    let pp = (high + low + close) / 3.0;
    let r1 = 2.0 * pp - low;
    let r2 = pp + (high - low);
    let r3 = high + 2.0 * (pp - low);
    let s1 = 2.0 * pp - high;
    let s2 = pp - (high - low);
    let s3 = low - 2.0 * (high - pp);

    Ok(PivotPoints {
        pp: round2(pp),
        r1: round2(r1),
        r2: round2(r2),
        r3: round2(r3),
        s1: round2(s1),
        s2: round2(s2),
        s3: round2(s3),
    })
}

/// Unrealized profit/loss for a holding valued at `current_price`.
/// Gram quantities are converted to troy ounces first. The percentage is
/// defined as 0 when the cost basis is 0.
pub fn position_pl(
    quantity: f64,
    avg_cost: f64,
    current_price: f64,
    unit: QuantityUnit,
) -> Result<ValuationResult, GoldwatchError> {
    require_positive("quantity", quantity)?;
    require_finite("avg_cost", avg_cost)?;
    require_positive("current_price", current_price)?;
    if avg_cost < 0.0 {
        return Err(GoldwatchError::invalid_input("avg_cost", "must not be negative"));
    }

    let oz_quantity = match unit {
        QuantityUnit::Gram => quantity / GRAMS_PER_TROY_OUNCE,
        QuantityUnit::TroyOunce | QuantityUnit::Share => quantity,
    };

    let cost_basis = oz_quantity * avg_cost;
    let total_value = oz_quantity * current_price;
    let unrealized_pl = total_value - cost_basis;
    let unrealized_pl_percent = if cost_basis == 0.0 {
        0.0
    } else {
        unrealized_pl / cost_basis * 100.0
    };

    Ok(ValuationResult {
        total_value: round2(total_value),
        unrealized_pl: round2(unrealized_pl),
        unrealized_pl_percent: round2(unrealized_pl_percent),
        cost_basis: round2(cost_basis),
    })
}

/// Strict threshold comparison for alert evaluation. No tolerance band.
pub fn should_trigger_alert(
    current_price: f64,
    target_value: f64,
    condition: AlertCondition,
) -> bool {
    match condition {
        AlertCondition::Above => current_price > target_value,
        AlertCondition::Below => current_price < target_value,
    }
}
