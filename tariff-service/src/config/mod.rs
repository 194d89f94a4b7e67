//! Configuration module for tariff-service.

use crate::services::FixedFeeMode;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Largest scale `rust_decimal` can represent.
const MAX_ROUNDING_SCALE: u32 = 28;

#[derive(Debug, Clone)]
pub struct TariffConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub fees: FeeConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone)]
pub struct FeeConfig {
    pub fixed_fee_mode: FixedFeeMode,
    pub rounding_scale: u32,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub default_currency: String,
    pub seed_sample_tariffs: bool,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            fixed_fee_mode: FixedFeeMode::default(),
            rounding_scale: 2,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_currency: "EUR".to_string(),
            seed_sample_tariffs: true,
        }
    }
}

impl TariffConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let fixed_fee_mode = match env::var("FIXED_FEE_MODE") {
            Ok(value) => FixedFeeMode::from_string(&value.to_lowercase()).ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "FIXED_FEE_MODE must be 'cumulative' or 'single' (got '{}')",
                    value
                ))
            })?,
            Err(_) => FixedFeeMode::default(),
        };

        let rounding_scale = match env::var("FEE_ROUNDING_SCALE") {
            Ok(value) => parse_rounding_scale(&value)?,
            Err(_) => FeeConfig::default().rounding_scale,
        };

        let seed_sample_tariffs = match env::var("SEED_SAMPLE_TARIFFS") {
            Ok(value) => value.parse::<bool>().map_err(|_| {
                AppError::ConfigError(anyhow::anyhow!(
                    "SEED_SAMPLE_TARIFFS must be 'true' or 'false' (got '{}')",
                    value
                ))
            })?,
            Err(_) => CatalogConfig::default().seed_sample_tariffs,
        };

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "tariff-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            fees: FeeConfig {
                fixed_fee_mode,
                rounding_scale,
            },
            catalog: CatalogConfig {
                default_currency: env::var("DEFAULT_CURRENCY")
                    .map(|c| c.to_uppercase())
                    .unwrap_or_else(|_| CatalogConfig::default().default_currency),
                seed_sample_tariffs,
            },
        })
    }
}

fn parse_rounding_scale(value: &str) -> Result<u32, AppError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|scale| *scale <= MAX_ROUNDING_SCALE)
        .ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!(
                "FEE_ROUNDING_SCALE must be an integer between 0 and {} (got '{}')",
                MAX_ROUNDING_SCALE,
                value
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_scale_bounds() {
        assert_eq!(parse_rounding_scale("2").unwrap(), 2);
        assert_eq!(parse_rounding_scale("28").unwrap(), 28);
        assert!(matches!(
            parse_rounding_scale("29"),
            Err(AppError::ConfigError(_))
        ));
        assert!(parse_rounding_scale("-1").is_err());
        assert!(parse_rounding_scale("two").is_err());
    }
}
