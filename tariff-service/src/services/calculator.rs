//! Collection fee calculator.
//!
//! A fee is built in three steps: a base fee from the tariff's rate
//! structure, the tariff's fixed fee on top, then the minimum and maximum
//! clamps. The clamps are checked one after the other, so a maximum below
//! the minimum always wins.
//!
//! Tiers are matched by an ordered scan. The first tier containing the
//! amount applies its rate to the whole amount; later tiers are never
//! consulted, even when they overlap.

use crate::models::{Tariff, TariffType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by fee arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    #[error("Fee arithmetic overflowed for amount {amount}")]
    Overflow { amount: Decimal },
}

/// How the fixed fee of a `Fixed` tariff is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedFeeMode {
    /// The fixed fee is added after the type branch for every tariff type,
    /// so a `Fixed` tariff carries it twice before clamping.
    #[default]
    Cumulative,
    /// A `Fixed` tariff carries its fixed fee once.
    Single,
}

impl FixedFeeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixedFeeMode::Cumulative => "cumulative",
            FixedFeeMode::Single => "single",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "cumulative" => Some(FixedFeeMode::Cumulative),
            "single" => Some(FixedFeeMode::Single),
            _ => None,
        }
    }
}

/// Which bound replaced the raw fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeClamp {
    Minimum,
    Maximum,
}

impl FeeClamp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeClamp::Minimum => "minimum",
            FeeClamp::Maximum => "maximum",
        }
    }
}

/// Intermediate values of a fee calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Fee from the rate structure alone.
    pub base_fee: Decimal,
    /// Fixed fee added on top of the base fee.
    pub fixed_fee_applied: Decimal,
    /// `base_fee + fixed_fee_applied`, before clamping.
    pub raw_fee: Decimal,
    /// Final fee.
    pub fee: Decimal,
    /// Index of the tier that matched, for tiered tariffs.
    pub matched_tier: Option<usize>,
    /// Last clamp that changed the fee.
    pub clamp: Option<FeeClamp>,
}

/// Stateless fee calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeCalculator {
    fixed_fee_mode: FixedFeeMode,
}

impl FeeCalculator {
    pub fn new(fixed_fee_mode: FixedFeeMode) -> Self {
        Self { fixed_fee_mode }
    }

    pub fn fixed_fee_mode(&self) -> FixedFeeMode {
        self.fixed_fee_mode
    }

    /// Compute the fee owed on `amount` under `tariff`.
    ///
    /// Inputs are not validated; see [`crate::services::TariffPolicy`].
    pub fn calculate_fee(&self, amount: Decimal, tariff: &Tariff) -> Result<Decimal, FeeError> {
        Ok(self.breakdown(amount, tariff)?.fee)
    }

    /// Compute the fee and keep every intermediate value.
    pub fn breakdown(&self, amount: Decimal, tariff: &Tariff) -> Result<FeeBreakdown, FeeError> {
        let overflow = || FeeError::Overflow { amount };

        let mut matched_tier = None;
        let base_fee = match tariff.tariff_type {
            TariffType::Fixed => tariff.fixed_fee,
            TariffType::Percentage => {
                let rate = tariff.percentage.unwrap_or(Decimal::ZERO);
                apply_rate(amount, rate).ok_or_else(overflow)?
            }
            TariffType::Tiered => {
                match tariff.tiers.iter().position(|tier| tier.contains(amount)) {
                    Some(index) => {
                        matched_tier = Some(index);
                        apply_rate(amount, tariff.tiers[index].percentage).ok_or_else(overflow)?
                    }
                    None => Decimal::ZERO,
                }
            }
        };

        let fixed_fee_applied = match (tariff.tariff_type, self.fixed_fee_mode) {
            (TariffType::Fixed, FixedFeeMode::Single) => Decimal::ZERO,
            _ => tariff.fixed_fee,
        };

        let raw_fee = base_fee
            .checked_add(fixed_fee_applied)
            .ok_or_else(overflow)?;

        let (fee, clamp) = clamp_fee(raw_fee, tariff.minimum_fee, tariff.maximum_fee);

        Ok(FeeBreakdown {
            base_fee,
            fixed_fee_applied,
            raw_fee,
            fee,
            matched_tier,
            clamp,
        })
    }
}

/// Compute a fee with the default (cumulative) fixed-fee behaviour.
pub fn calculate_fee(amount: Decimal, tariff: &Tariff) -> Result<Decimal, FeeError> {
    FeeCalculator::default().calculate_fee(amount, tariff)
}

/// `amount * percentage / 100`.
///
/// Falls back to dividing first when the product does not fit, which keeps
/// amounts near `Decimal::MAX` computable at a small cost in precision.
fn apply_rate(amount: Decimal, percentage: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(percentage)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .or_else(|| {
            amount
                .checked_div(Decimal::ONE_HUNDRED)?
                .checked_mul(percentage)
        })
}

fn clamp_fee(
    raw_fee: Decimal,
    minimum: Option<Decimal>,
    maximum: Option<Decimal>,
) -> (Decimal, Option<FeeClamp>) {
    let mut fee = raw_fee;
    let mut clamp = None;

    if let Some(min) = minimum.filter(|min| fee < *min) {
        fee = min;
        clamp = Some(FeeClamp::Minimum);
    }

    // Checked against the possibly raised value.
    if let Some(max) = maximum.filter(|max| fee > *max) {
        fee = max;
        clamp = Some(FeeClamp::Maximum);
    }

    (fee, clamp)
}
