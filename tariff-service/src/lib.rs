//! Tariff Service - Collection fee calculation over an in-memory tariff catalog.

pub mod cli;
pub mod config;
pub mod models;
pub mod services;
pub mod startup;
