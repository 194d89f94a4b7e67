//! Fee quoting service.
//!
//! Wraps the catalog and the calculator: validates the amount, resolves the
//! tariff, computes the fee and rounds it for display.

use crate::models::{ListTariffsFilter, Tariff, TariffType};
use crate::services::calculator::{FeeBreakdown, FeeCalculator, FeeError};
use crate::services::catalog::TariffCatalog;
use crate::services::metrics::{record_error, record_fee_amount, record_fee_calculation};
use crate::services::policy::{TariffPolicy, TariffRuleError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

impl From<FeeError> for AppError {
    fn from(err: FeeError) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<TariffRuleError> for AppError {
    fn from(err: TariffRuleError) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

/// A fee quoted for one amount under one tariff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub tariff_id: Uuid,
    pub tariff_name: String,
    pub tariff_type: TariffType,
    pub currency: String,
    pub amount: Decimal,
    /// Final fee rounded to the configured scale.
    pub fee: Decimal,
    /// Unrounded intermediate values.
    pub breakdown: FeeBreakdown,
}

/// Quotes fees against the tariffs in a catalog.
#[derive(Debug, Clone)]
pub struct FeeService {
    catalog: TariffCatalog,
    calculator: FeeCalculator,
    rounding_scale: u32,
}

impl FeeService {
    pub fn new(catalog: TariffCatalog, calculator: FeeCalculator, rounding_scale: u32) -> Self {
        Self {
            catalog,
            calculator,
            rounding_scale,
        }
    }

    pub fn catalog(&self) -> &TariffCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut TariffCatalog {
        &mut self.catalog
    }

    pub fn calculator(&self) -> FeeCalculator {
        self.calculator
    }

    pub fn rounding_scale(&self) -> u32 {
        self.rounding_scale
    }

    /// Quote the fee on `amount` under the given tariff, active or not.
    #[instrument(skip(self), fields(tariff_id = %tariff_id, amount = %amount))]
    pub fn quote(&self, tariff_id: Uuid, amount: Decimal) -> Result<FeeQuote, AppError> {
        TariffPolicy::validate_amount(amount).inspect_err(|_| {
            record_error("negative_amount", "quote");
        })?;

        let tariff = self.catalog.get(tariff_id).ok_or_else(|| {
            record_error("not_found", "quote");
            AppError::NotFound(anyhow::anyhow!("Tariff {} not found", tariff_id))
        })?;

        self.quote_tariff(tariff, amount, "quote")
    }

    /// Quote the fee on `amount` under every active tariff.
    #[instrument(skip(self), fields(amount = %amount))]
    pub fn quote_all(&self, amount: Decimal) -> Result<Vec<FeeQuote>, AppError> {
        TariffPolicy::validate_amount(amount).inspect_err(|_| {
            record_error("negative_amount", "quote_all");
        })?;

        self.catalog
            .list(&ListTariffsFilter::default())
            .into_iter()
            .map(|tariff| self.quote_tariff(tariff, amount, "quote_all"))
            .collect()
    }

    fn quote_tariff(
        &self,
        tariff: &Tariff,
        amount: Decimal,
        operation: &str,
    ) -> Result<FeeQuote, AppError> {
        let breakdown = self.calculator.breakdown(amount, tariff).inspect_err(|e| {
            warn!(tariff_id = %tariff.tariff_id, error = %e, "Fee calculation failed");
            record_error("overflow", operation);
        })?;

        let fee = breakdown
            .fee
            .round_dp_with_strategy(self.rounding_scale, RoundingStrategy::MidpointAwayFromZero);

        record_fee_calculation(
            tariff.tariff_type.as_str(),
            breakdown.clamp.map_or("none", |c| c.as_str()),
        );
        record_fee_amount(&tariff.currency, fee.to_f64().unwrap_or_default());
        debug!(
            tariff_id = %tariff.tariff_id,
            raw_fee = %breakdown.raw_fee,
            fee = %fee,
            matched_tier = ?breakdown.matched_tier,
            clamp = ?breakdown.clamp,
            "Fee quoted"
        );

        Ok(FeeQuote {
            tariff_id: tariff.tariff_id,
            tariff_name: tariff.name.clone(),
            tariff_type: tariff.tariff_type,
            currency: tariff.currency.clone(),
            amount,
            fee,
            breakdown,
        })
    }
}
