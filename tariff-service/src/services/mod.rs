//! Services module for tariff-service.

pub mod calculator;
pub mod catalog;
pub mod fee_service;
pub mod metrics;
pub mod policy;

pub use calculator::{calculate_fee, FeeBreakdown, FeeCalculator, FeeClamp, FeeError, FixedFeeMode};
pub use catalog::{sample_tariffs, TariffCatalog};
pub use fee_service::{FeeQuote, FeeService};
pub use metrics::{
    get_metrics, init_metrics, record_catalog_operation, record_error, record_fee_amount,
    record_fee_calculation,
};
pub use policy::{TariffPolicy, TariffRuleError};
