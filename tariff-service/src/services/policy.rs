//! Tariff policy validation service.
//!
//! The calculator accepts any tariff. These rules are what the catalog
//! enforces before a tariff is stored, and what callers check before quoting.

use crate::models::{Tariff, TariffTier, TariffType};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors related to tariff policy validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TariffRuleError {
    #[error("Currency must be a 3-letter uppercase code (got '{0}')")]
    InvalidCurrency(String),

    #[error("{field} must not be negative (got {value})")]
    NegativeFee { field: &'static str, value: Decimal },

    #[error("Minimum fee {minimum} exceeds maximum fee {maximum}")]
    MinimumExceedsMaximum { minimum: Decimal, maximum: Decimal },

    #[error("Percentage tariffs require a percentage")]
    MissingPercentage,

    #[error("Percentage must be between 0 and 100 (got {0})")]
    PercentageOutOfRange(Decimal),

    #[error("Tiered tariffs require at least one tier")]
    MissingTiers,

    #[error("First tier must start at 0 (got {0})")]
    FirstTierNotAtZero(Decimal),

    #[error("Tier {index} has an empty or inverted range")]
    InvertedTierRange { index: usize },

    #[error("Tier {index} percentage must be between 0 and 100 (got {percentage})")]
    TierPercentageOutOfRange { index: usize, percentage: Decimal },

    #[error("Tier {index} is unbounded but is not the last tier")]
    UnboundedTierNotLast { index: usize },

    #[error("Tier {index} leaves a gap after the previous tier")]
    TierGap { index: usize },

    #[error("Tier {index} overlaps the previous tier")]
    TierOverlap { index: usize },

    #[error("Amount must not be negative (got {0})")]
    NegativeAmount(Decimal),
}

/// Tariff policy validation service.
#[derive(Debug, Clone)]
pub struct TariffPolicy;

impl TariffPolicy {
    /// Validate a tariff, returning the first violation found.
    pub fn validate_tariff(tariff: &Tariff) -> Result<(), TariffRuleError> {
        match Self::validate_tariff_all(tariff).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Validate a tariff and return all violations.
    pub fn validate_tariff_all(tariff: &Tariff) -> Vec<TariffRuleError> {
        let mut errors = Vec::new();

        if !is_currency_code(&tariff.currency) {
            errors.push(TariffRuleError::InvalidCurrency(tariff.currency.clone()));
        }

        let fees = [
            ("Fixed fee", Some(tariff.fixed_fee)),
            ("Minimum fee", tariff.minimum_fee),
            ("Maximum fee", tariff.maximum_fee),
        ];
        for (field, value) in fees {
            if let Some(value) = value.filter(|v| v.is_sign_negative() && !v.is_zero()) {
                errors.push(TariffRuleError::NegativeFee { field, value });
            }
        }

        if let (Some(minimum), Some(maximum)) = (tariff.minimum_fee, tariff.maximum_fee) {
            if minimum > maximum {
                errors.push(TariffRuleError::MinimumExceedsMaximum { minimum, maximum });
            }
        }

        match tariff.tariff_type {
            TariffType::Percentage => match tariff.percentage {
                None => errors.push(TariffRuleError::MissingPercentage),
                Some(p) if !is_rate(p) => errors.push(TariffRuleError::PercentageOutOfRange(p)),
                Some(_) => {}
            },
            TariffType::Tiered => errors.extend(Self::validate_tiers(&tariff.tiers)),
            TariffType::Fixed => {}
        }

        errors
    }

    /// Check that tiers partition the amount axis from 0 upward.
    ///
    /// Adjacent tiers share their boundary value; the boundary amount belongs
    /// to the earlier tier because matching stops at the first hit.
    pub fn validate_tiers(tiers: &[TariffTier]) -> Vec<TariffRuleError> {
        let mut errors = Vec::new();

        let Some(first) = tiers.first() else {
            errors.push(TariffRuleError::MissingTiers);
            return errors;
        };

        if !first.min_amount.is_zero() {
            errors.push(TariffRuleError::FirstTierNotAtZero(first.min_amount));
        }

        let last = tiers.len() - 1;
        for (index, tier) in tiers.iter().enumerate() {
            if tier.max_amount.is_some_and(|max| max <= tier.min_amount) {
                errors.push(TariffRuleError::InvertedTierRange { index });
            }

            if !is_rate(tier.percentage) {
                errors.push(TariffRuleError::TierPercentageOutOfRange {
                    index,
                    percentage: tier.percentage,
                });
            }

            if tier.max_amount.is_none() && index != last {
                errors.push(TariffRuleError::UnboundedTierNotLast { index });
            }
        }

        for (index, pair) in tiers.windows(2).enumerate() {
            // An unbounded predecessor is already reported above.
            let Some(prev_max) = pair[0].max_amount else {
                continue;
            };
            let next_min = pair[1].min_amount;
            if next_min > prev_max {
                errors.push(TariffRuleError::TierGap { index: index + 1 });
            } else if next_min < prev_max {
                errors.push(TariffRuleError::TierOverlap { index: index + 1 });
            }
        }

        errors
    }

    /// Reject negative amounts.
    pub fn validate_amount(amount: Decimal) -> Result<(), TariffRuleError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(TariffRuleError::NegativeAmount(amount));
        }
        Ok(())
    }
}

fn is_rate(p: Decimal) -> bool {
    p >= Decimal::ZERO && p <= Decimal::ONE_HUNDRED
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}
