//! Application startup for tariff-service.

use crate::config::TariffConfig;
use crate::services::{FeeCalculator, FeeService, TariffCatalog};
use service_core::error::AppError;
use tracing::info;

/// Application wiring: the configured fee service.
pub struct Application {
    config: TariffConfig,
    fee_service: FeeService,
}

impl Application {
    /// Build the application from configuration.
    pub fn build(config: TariffConfig) -> Result<Self, AppError> {
        let catalog = if config.catalog.seed_sample_tariffs {
            TariffCatalog::with_sample_tariffs(&config.catalog.default_currency)?
        } else {
            TariffCatalog::new()
        };

        info!(
            tariffs = catalog.len(),
            fixed_fee_mode = config.fees.fixed_fee_mode.as_str(),
            rounding_scale = config.fees.rounding_scale,
            "Tariff catalog ready"
        );

        let calculator = FeeCalculator::new(config.fees.fixed_fee_mode);
        let fee_service = FeeService::new(catalog, calculator, config.fees.rounding_scale);

        Ok(Self {
            config,
            fee_service,
        })
    }

    pub fn config(&self) -> &TariffConfig {
        &self.config
    }

    pub fn fee_service(&self) -> &FeeService {
        &self.fee_service
    }

    pub fn fee_service_mut(&mut self) -> &mut FeeService {
        &mut self.fee_service
    }
}
