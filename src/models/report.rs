use serde::{Deserialize, Serialize};

use super::appliance::Recommendation;

/// Rounds to 2 decimal places. Applied only when a report is emitted.
///
/// Works on the exact binary value through the decimal formatter, so a stored
/// 2.675 (really 2.67499...) gives 2.67 and an exact tie like 0.125 gives 0.12.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceReport {
    pub name: String,
    pub count: u32,
    pub daily_energy_consumption: f64,
    pub annual_energy_consumption: f64,
    pub gap: f64,
    pub gap_percentage: f64,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<ApplianceReport>,
    /// kWh per day over every valid appliance
    pub total_energy: f64,
    /// Yearly cost of the wasted energy at the requested tariff
    pub total_savings: f64,
}
