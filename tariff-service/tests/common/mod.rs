//! Common test utilities for tariff-service integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use service_core::config::Config as CoreConfig;
use std::sync::Once;
use tariff_service::config::{CatalogConfig, FeeConfig, TariffConfig};
use tariff_service::models::{CreateTariff, ListTariffsFilter, Tariff, TariffTier, TariffType};
use tariff_service::services::{init_metrics, FixedFeeMode, TariffCatalog};
use tariff_service::startup::Application;
use uuid::Uuid;

pub const TEST_CURRENCY: &str = "EUR";

static INIT: Once = Once::new();

/// Initialize tracing and metrics for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,tariff_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
        init_metrics();
    });
}

/// Test configuration with the sample tariffs seeded.
pub fn test_config(fixed_fee_mode: FixedFeeMode) -> TariffConfig {
    TariffConfig {
        common: CoreConfig::default(),
        service_name: "tariff-service-test".to_string(),
        service_version: "test".to_string(),
        fees: FeeConfig {
            fixed_fee_mode,
            rounding_scale: 2,
        },
        catalog: CatalogConfig {
            default_currency: TEST_CURRENCY.to_string(),
            seed_sample_tariffs: true,
        },
    }
}

/// Build an application with the sample tariffs.
pub fn spawn_app(fixed_fee_mode: FixedFeeMode) -> Application {
    init_tracing();
    Application::build(test_config(fixed_fee_mode)).expect("Failed to build application")
}

/// Find a tariff by name, including inactive tariffs.
pub fn tariff_id_by_name(catalog: &TariffCatalog, name: &str) -> Uuid {
    catalog
        .list(&ListTariffsFilter {
            include_inactive: true,
            tariff_type: None,
        })
        .into_iter()
        .find(|t| t.name == name)
        .map(|t| t.tariff_id)
        .unwrap_or_else(|| panic!("tariff '{}' not found", name))
}

pub fn percentage_input(name: &str, percentage: Decimal) -> CreateTariff {
    CreateTariff {
        name: name.to_string(),
        description: None,
        tariff_type: TariffType::Percentage,
        percentage: Some(percentage),
        tiers: vec![],
        fixed_fee: Decimal::ZERO,
        minimum_fee: None,
        maximum_fee: None,
        currency: TEST_CURRENCY.to_string(),
    }
}

pub fn tiered_input(name: &str, tiers: Vec<TariffTier>) -> CreateTariff {
    CreateTariff {
        name: name.to_string(),
        description: Some("Tiered test tariff".to_string()),
        tariff_type: TariffType::Tiered,
        percentage: None,
        tiers,
        fixed_fee: dec!(0),
        minimum_fee: Some(dec!(0)),
        maximum_fee: Some(dec!(100000)),
        currency: TEST_CURRENCY.to_string(),
    }
}

pub fn names(tariffs: &[&Tariff]) -> Vec<String> {
    tariffs.iter().map(|t| t.name.clone()).collect()
}
