//! In-memory tariff catalog.
//!
//! Stands in for a persistent tariff store. Every write is validated against
//! [`TariffPolicy`] so stored tariffs are always well-formed.

use crate::models::{CreateTariff, ListTariffsFilter, Tariff, TariffTier, TariffType, UpdateTariff};
use crate::services::metrics::{record_catalog_operation, CATALOG_OPERATION_DURATION};
use crate::services::policy::TariffPolicy;
use chrono::Utc;
use rust_decimal::Decimal;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Longest tariff name accepted by `CreateTariff` and `UpdateTariff`.
const MAX_NAME_CHARS: usize = 100;

/// Tariff catalog owned by a single caller.
#[derive(Debug, Clone, Default)]
pub struct TariffCatalog {
    tariffs: Vec<Tariff>,
}

impl TariffCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with the standard sample tariffs.
    pub fn with_sample_tariffs(currency: &str) -> Result<Self, AppError> {
        let mut catalog = Self::new();
        for input in sample_tariffs(currency) {
            catalog.create(input)?;
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.tariffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tariffs.is_empty()
    }

    /// Create a new tariff.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn create(&mut self, input: CreateTariff) -> Result<Tariff, AppError> {
        let timer = CATALOG_OPERATION_DURATION
            .with_label_values(&["create"])
            .start_timer();

        input.validate()?;
        self.ensure_unique_name(&input.name, None)?;

        let tariff = Tariff::from_input(input);
        check_policy(&tariff)?;
        self.tariffs.push(tariff.clone());

        timer.observe_duration();
        record_catalog_operation("create");
        info!(tariff_id = %tariff.tariff_id, tariff_type = %tariff.tariff_type, "Tariff created");

        Ok(tariff)
    }

    /// Get a tariff by ID.
    pub fn get(&self, tariff_id: Uuid) -> Option<&Tariff> {
        self.tariffs.iter().find(|t| t.tariff_id == tariff_id)
    }

    /// List tariffs ordered by name, then creation time.
    pub fn list(&self, filter: &ListTariffsFilter) -> Vec<&Tariff> {
        let mut tariffs: Vec<&Tariff> = self
            .tariffs
            .iter()
            .filter(|t| filter.include_inactive || t.is_active)
            .filter(|t| filter.tariff_type.is_none_or(|ty| t.tariff_type == ty))
            .collect();

        tariffs.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.created_utc.cmp(&b.created_utc))
        });

        tariffs
    }

    /// Update a tariff. Returns `Ok(None)` when the tariff does not exist.
    #[instrument(skip(self, input), fields(tariff_id = %tariff_id))]
    pub fn update(
        &mut self,
        tariff_id: Uuid,
        input: UpdateTariff,
    ) -> Result<Option<Tariff>, AppError> {
        let timer = CATALOG_OPERATION_DURATION
            .with_label_values(&["update"])
            .start_timer();

        input.validate()?;

        let Some(index) = self.position(tariff_id) else {
            return Ok(None);
        };

        if let Some(name) = &input.name {
            self.ensure_unique_name(name, Some(tariff_id))?;
        }

        let mut updated = self.tariffs[index].clone();
        updated.apply(input);
        check_policy(&updated)?;
        updated.updated_utc = Utc::now();
        self.tariffs[index] = updated.clone();

        timer.observe_duration();
        record_catalog_operation("update");
        info!(tariff_id = %tariff_id, "Tariff updated");

        Ok(Some(updated))
    }

    /// Copy a tariff under a new ID. The copy starts inactive.
    #[instrument(skip(self), fields(tariff_id = %tariff_id))]
    pub fn duplicate(&mut self, tariff_id: Uuid) -> Result<Option<Tariff>, AppError> {
        let timer = CATALOG_OPERATION_DURATION
            .with_label_values(&["duplicate"])
            .start_timer();

        let Some(source) = self.get(tariff_id) else {
            return Ok(None);
        };

        let name = self.copy_name(&source.name);
        let now = Utc::now();
        let copy = Tariff {
            tariff_id: Uuid::new_v4(),
            name,
            is_active: false,
            created_utc: now,
            updated_utc: now,
            ..source.clone()
        };

        self.tariffs.push(copy.clone());

        timer.observe_duration();
        record_catalog_operation("duplicate");
        info!(source_id = %tariff_id, tariff_id = %copy.tariff_id, "Tariff duplicated");

        Ok(Some(copy))
    }

    /// Activate or deactivate a tariff.
    #[instrument(skip(self), fields(tariff_id = %tariff_id))]
    pub fn set_active(&mut self, tariff_id: Uuid, is_active: bool) -> Option<Tariff> {
        let timer = CATALOG_OPERATION_DURATION
            .with_label_values(&["set_active"])
            .start_timer();

        let index = self.position(tariff_id)?;
        let tariff = &mut self.tariffs[index];
        if tariff.is_active != is_active {
            tariff.is_active = is_active;
            tariff.updated_utc = Utc::now();
        }

        timer.observe_duration();
        record_catalog_operation(if is_active { "activate" } else { "deactivate" });
        info!(is_active, "Tariff activation changed");

        Some(tariff.clone())
    }

    /// Delete a tariff. Returns whether it existed.
    #[instrument(skip(self), fields(tariff_id = %tariff_id))]
    pub fn delete(&mut self, tariff_id: Uuid) -> bool {
        let timer = CATALOG_OPERATION_DURATION
            .with_label_values(&["delete"])
            .start_timer();

        let Some(index) = self.position(tariff_id) else {
            return false;
        };
        self.tariffs.remove(index);

        timer.observe_duration();
        record_catalog_operation("delete");
        info!("Tariff deleted");

        true
    }

    fn position(&self, tariff_id: Uuid) -> Option<usize> {
        self.tariffs.iter().position(|t| t.tariff_id == tariff_id)
    }

    fn name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        let name = name.to_lowercase();
        self.tariffs
            .iter()
            .any(|t| Some(t.tariff_id) != except && t.name.to_lowercase() == name)
    }

    fn ensure_unique_name(&self, name: &str, except: Option<Uuid>) -> Result<(), AppError> {
        if self.name_taken(name, except) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "A tariff named '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    /// First free `"<name> (Copy)"` / `"<name> (Copy N)"`, shortening the
    /// source name so the result stays within the name length limit.
    fn copy_name(&self, name: &str) -> String {
        let base = with_suffix(name, " (Copy)");
        if !self.name_taken(&base, None) {
            return base;
        }
        (2..)
            .map(|n| with_suffix(name, &format!(" (Copy {})", n)))
            .find(|candidate| !self.name_taken(candidate, None))
            .unwrap_or(base)
    }
}

fn with_suffix(name: &str, suffix: &str) -> String {
    let keep = MAX_NAME_CHARS.saturating_sub(suffix.chars().count());
    let mut result: String = name.chars().take(keep).collect();
    result.push_str(suffix);
    result
}

fn check_policy(tariff: &Tariff) -> Result<(), AppError> {
    let errors = TariffPolicy::validate_tariff_all(tariff);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(AppError::BadRequest(anyhow::anyhow!(message)))
}

/// The three reference tariffs shown on a fresh installation.
pub fn sample_tariffs(currency: &str) -> Vec<CreateTariff> {
    vec![
        CreateTariff {
            name: "Standard Percentage".to_string(),
            description: Some("25% of the outstanding amount".to_string()),
            tariff_type: TariffType::Percentage,
            percentage: Some(Decimal::new(25, 0)),
            tiers: vec![],
            fixed_fee: Decimal::ZERO,
            minimum_fee: Some(Decimal::new(50, 0)),
            maximum_fee: Some(Decimal::new(5000, 0)),
            currency: currency.to_string(),
        },
        CreateTariff {
            name: "Tiered Volume".to_string(),
            description: Some("Lower rates for larger claims plus a base fee".to_string()),
            tariff_type: TariffType::Tiered,
            percentage: None,
            tiers: vec![
                TariffTier::new(Decimal::ZERO, Some(Decimal::new(1000, 0)), Decimal::new(30, 0)),
                TariffTier::new(
                    Decimal::new(1000, 0),
                    Some(Decimal::new(5000, 0)),
                    Decimal::new(25, 0),
                ),
                TariffTier::new(Decimal::new(5000, 0), None, Decimal::new(20, 0)),
            ],
            fixed_fee: Decimal::new(100, 0),
            minimum_fee: Some(Decimal::new(150, 0)),
            maximum_fee: Some(Decimal::new(10000, 0)),
            currency: currency.to_string(),
        },
        CreateTariff {
            name: "Fixed Fee".to_string(),
            description: Some("Flat fee per case".to_string()),
            tariff_type: TariffType::Fixed,
            percentage: None,
            tiers: vec![],
            fixed_fee: Decimal::new(500, 0),
            minimum_fee: Some(Decimal::new(500, 0)),
            maximum_fee: Some(Decimal::new(500, 0)),
            currency: currency.to_string(),
        },
    ]
}
