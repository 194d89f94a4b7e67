//! Tariff model: a named fee policy for collection cases.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Rate structure of a tariff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffType {
    Percentage,
    Fixed,
    Tiered,
}

impl TariffType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TariffType::Percentage => "percentage",
            TariffType::Fixed => "fixed",
            TariffType::Tiered => "tiered",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(TariffType::Percentage),
            "fixed" => Some(TariffType::Fixed),
            "tiered" => Some(TariffType::Tiered),
            _ => None,
        }
    }
}

impl std::fmt::Display for TariffType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One amount band of a tiered tariff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffTier {
    /// Inclusive lower bound.
    pub min_amount: Decimal,
    /// Inclusive upper bound; `None` means unbounded.
    pub max_amount: Option<Decimal>,
    /// Rate applied to the whole amount when this tier matches.
    pub percentage: Decimal,
}

impl TariffTier {
    pub fn new(min_amount: Decimal, max_amount: Option<Decimal>, percentage: Decimal) -> Self {
        Self {
            min_amount,
            max_amount,
            percentage,
        }
    }

    /// Whether `amount` falls inside this band.
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min_amount && self.max_amount.is_none_or(|max| amount <= max)
    }
}

/// Tariff record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub tariff_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub tariff_type: TariffType,
    pub percentage: Option<Decimal>,
    #[serde(default)]
    pub tiers: Vec<TariffTier>,
    pub fixed_fee: Decimal,
    pub minimum_fee: Option<Decimal>,
    pub maximum_fee: Option<Decimal>,
    pub currency: String,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Tariff {
    /// Build a new active tariff from creation input.
    pub fn from_input(input: CreateTariff) -> Self {
        let now = Utc::now();
        Self {
            tariff_id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            tariff_type: input.tariff_type,
            percentage: input.percentage,
            tiers: input.tiers,
            fixed_fee: input.fixed_fee,
            minimum_fee: input.minimum_fee,
            maximum_fee: input.maximum_fee,
            currency: input.currency,
            is_active: true,
            created_utc: now,
            updated_utc: now,
        }
    }

    /// Apply a partial update in place. Does not touch `updated_utc`.
    pub fn apply(&mut self, update: UpdateTariff) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(tariff_type) = update.tariff_type {
            self.tariff_type = tariff_type;
        }
        if let Some(percentage) = update.percentage {
            self.percentage = Some(percentage);
        }
        if let Some(tiers) = update.tiers {
            self.tiers = tiers;
        }
        if let Some(fixed_fee) = update.fixed_fee {
            self.fixed_fee = fixed_fee;
        }
        if let Some(minimum_fee) = update.minimum_fee {
            self.minimum_fee = minimum_fee;
        }
        if let Some(maximum_fee) = update.maximum_fee {
            self.maximum_fee = maximum_fee;
        }
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
    }
}

/// Input for creating a tariff.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTariff {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub tariff_type: TariffType,
    pub percentage: Option<Decimal>,
    #[serde(default)]
    pub tiers: Vec<TariffTier>,
    #[serde(default)]
    pub fixed_fee: Decimal,
    pub minimum_fee: Option<Decimal>,
    pub maximum_fee: Option<Decimal>,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
}

/// Input for updating a tariff. `None` leaves a field untouched.
///
/// The fee bounds are doubly optional so a bound can be cleared with
/// `Some(None)`.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateTariff {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub tariff_type: Option<TariffType>,
    pub percentage: Option<Decimal>,
    pub tiers: Option<Vec<TariffTier>>,
    pub fixed_fee: Option<Decimal>,
    pub minimum_fee: Option<Option<Decimal>>,
    pub maximum_fee: Option<Option<Decimal>>,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
    pub is_active: Option<bool>,
}

/// Filter parameters for listing tariffs.
#[derive(Debug, Clone, Default)]
pub struct ListTariffsFilter {
    pub include_inactive: bool,
    pub tariff_type: Option<TariffType>,
}
