//! Domain models for tariff-service.

mod tariff;

pub use tariff::{CreateTariff, ListTariffsFilter, Tariff, TariffTier, TariffType, UpdateTariff};
