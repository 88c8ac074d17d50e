use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::coerce;
use super::report::{round2, ApplianceReport};

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Gap percentage at or above which an appliance is flagged for replacement.
pub const REPLACEMENT_THRESHOLD_PERCENT: f64 = 20.0;

/// Why a submitted appliance record was left out of a batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordRejection {
    #[error("record is not an object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` has the wrong type or is not numeric")]
    NotNumeric(&'static str),
    #[error("name must be non-empty text")]
    InvalidName,
    #[error("power_kw must be greater than 0, got {0}")]
    NonPositivePower(f64),
    #[error("hours_per_day must be greater than 0, got {0}")]
    NonPositiveHours(f64),
    #[error("efficiency_ratio must be in (0, 1], got {0}")]
    EfficiencyOutOfRange(f64),
    #[error("count must be at least 1, got {0}")]
    NonPositiveCount(i64),
    #[error("energy figures exceed the representable range")]
    EnergyOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "consider replacing")]
    ConsiderReplacing,
    #[serde(rename = "efficient")]
    Efficient,
}

impl Recommendation {
    pub fn for_gap_percentage(gap_percentage: f64) -> Self {
        if gap_percentage >= REPLACEMENT_THRESHOLD_PERCENT {
            Recommendation::ConsiderReplacing
        } else {
            Recommendation::Efficient
        }
    }
}

/// One or more identical devices with a known draw, daily usage and efficiency.
///
/// Fields are private so that every instance has passed [`Appliance::new`]:
/// `power_kw > 0`, `hours_per_day > 0`, `0 < efficiency_ratio <= 1`, `count >= 1`,
/// and a finite annual consumption.
#[derive(Debug, Clone, PartialEq)]
pub struct Appliance {
    name: String,
    power_kw: f64,
    hours_per_day: f64,
    efficiency_ratio: f64,
    count: u32,
}

impl Appliance {
    pub fn new(
        name: impl Into<String>,
        power_kw: f64,
        hours_per_day: f64,
        efficiency_ratio: f64,
        count: i64,
    ) -> Result<Self, RecordRejection> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecordRejection::InvalidName);
        }
        if !power_kw.is_finite() || power_kw <= 0.0 {
            return Err(RecordRejection::NonPositivePower(power_kw));
        }
        if !hours_per_day.is_finite() || hours_per_day <= 0.0 {
            return Err(RecordRejection::NonPositiveHours(hours_per_day));
        }
        if efficiency_ratio.is_nan() || efficiency_ratio <= 0.0 || efficiency_ratio > 1.0 {
            return Err(RecordRejection::EfficiencyOutOfRange(efficiency_ratio));
        }
        let count = match u32::try_from(count) {
            Ok(count) if count > 0 => count,
            _ => return Err(RecordRejection::NonPositiveCount(count)),
        };

        let appliance = Self {
            name,
            power_kw,
            hours_per_day,
            efficiency_ratio,
            count,
        };
        if !appliance.annual_energy_consumption().is_finite() {
            return Err(RecordRejection::EnergyOutOfRange);
        }

        Ok(appliance)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// kWh per day across all units.
    pub fn daily_energy_consumption(&self) -> f64 {
        self.power_kw * self.hours_per_day * f64::from(self.count)
    }

    pub fn annual_energy_consumption(&self) -> f64 {
        self.daily_energy_consumption() * DAYS_PER_YEAR
    }

    /// Daily energy that ends up usefully applied.
    pub fn ideal_energy_consumption(&self) -> f64 {
        self.daily_energy_consumption() * self.efficiency_ratio
    }

    /// Daily energy wasted relative to the ideal, in kWh.
    pub fn efficiency_gap(&self) -> f64 {
        self.daily_energy_consumption() - self.ideal_energy_consumption()
    }

    pub fn gap_percentage(&self) -> f64 {
        let daily = self.daily_energy_consumption();
        if daily == 0.0 {
            return 0.0;
        }
        (self.efficiency_gap() / daily) * 100.0
    }

    /// Judged on the percentage as it is reported, so a reported 20.00 is always flagged.
    pub fn recommendation(&self) -> Recommendation {
        Recommendation::for_gap_percentage(round2(self.gap_percentage()))
    }

    /// Yearly cost of the wasted energy at the given tariff.
    pub fn annual_savings(&self, cost_per_kwh: f64) -> f64 {
        self.efficiency_gap() * DAYS_PER_YEAR * cost_per_kwh
    }

    pub fn report(&self) -> ApplianceReport {
        ApplianceReport {
            name: self.name.clone(),
            count: self.count,
            daily_energy_consumption: round2(self.daily_energy_consumption()),
            annual_energy_consumption: round2(self.annual_energy_consumption()),
            gap: round2(self.efficiency_gap()),
            gap_percentage: round2(self.gap_percentage()),
            recommendation: self.recommendation(),
        }
    }
}

impl TryFrom<&Value> for Appliance {
    type Error = RecordRejection;

    fn try_from(record: &Value) -> Result<Self, Self::Error> {
        let fields = record.as_object().ok_or(RecordRejection::NotAnObject)?;

        let real_field = |key: &'static str| -> Result<f64, RecordRejection> {
            let value = fields.get(key).ok_or(RecordRejection::MissingField(key))?;
            coerce::real(value).ok_or(RecordRejection::NotNumeric(key))
        };

        let power_kw = real_field("power_kw")?;
        let hours_per_day = real_field("hours_per_day")?;
        let efficiency_ratio = real_field("efficiency_ratio")?;

        let count = match fields.get("count") {
            None => 1,
            Some(value) => coerce::integer(value).ok_or(RecordRejection::NotNumeric("count"))?,
        };

        let name = match fields.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(_) => return Err(RecordRejection::InvalidName),
            None => return Err(RecordRejection::MissingField("name")),
        };

        Appliance::new(name, power_kw, hours_per_day, efficiency_ratio, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn heater(count: i64) -> Appliance {
        Appliance::new("Heater", 1.5, 4.0, 0.5, count).unwrap()
    }

    #[test]
    fn test_heater_metrics() {
        let appliance = heater(1);
        assert_eq!(appliance.daily_energy_consumption(), 6.0);
        assert_eq!(appliance.annual_energy_consumption(), 2190.0);
        assert_eq!(appliance.ideal_energy_consumption(), 3.0);
        assert_eq!(appliance.efficiency_gap(), 3.0);
        assert_eq!(appliance.gap_percentage(), 50.0);
        assert_eq!(appliance.recommendation(), Recommendation::ConsiderReplacing);
    }

    #[test]
    fn test_count_multiplies_consumption() {
        let appliance = heater(3);
        assert_eq!(appliance.daily_energy_consumption(), 18.0);
        assert_eq!(appliance.annual_energy_consumption(), 6570.0);
        assert_eq!(appliance.efficiency_gap(), 9.0);
    }

    #[test]
    fn test_annual_is_daily_times_365() {
        let appliance = Appliance::new("Fridge", 0.15, 24.0, 0.85, 2).unwrap();
        assert_eq!(
            appliance.annual_energy_consumption(),
            appliance.daily_energy_consumption() * 365.0
        );
    }

    #[test]
    fn test_gap_bounds_hold_across_ratios() {
        for ratio in [0.01, 0.1, 0.33, 0.5, 0.79, 0.8, 0.95, 0.999, 1.0] {
            for (power, hours) in [(0.001, 0.1), (1.5, 4.0), (3.2, 24.0), (12.0, 30.0)] {
                let appliance = Appliance::new("Unit", power, hours, ratio, 1).unwrap();
                assert!(appliance.efficiency_gap() >= 0.0);
                assert!(
                    appliance.daily_energy_consumption() >= appliance.ideal_energy_consumption()
                );
                let pct = appliance.gap_percentage();
                assert!((0.0..=100.0).contains(&pct), "gap percentage {pct} out of range");
            }
        }
    }

    #[test]
    fn test_fully_efficient_appliance() {
        let appliance = Appliance::new("LED", 0.01, 5.0, 1.0, 10).unwrap();
        assert_eq!(appliance.efficiency_gap(), 0.0);
        assert_eq!(appliance.gap_percentage(), 0.0);
        assert_eq!(appliance.recommendation(), Recommendation::Efficient);
    }

    #[test]
    fn test_recommendation_threshold_is_inclusive() {
        assert_eq!(
            Recommendation::for_gap_percentage(20.0),
            Recommendation::ConsiderReplacing
        );
        assert_eq!(
            Recommendation::for_gap_percentage(19.99),
            Recommendation::Efficient
        );

        // daily = 5.0, ideal = 4.0, gap = 20%
        let appliance = Appliance::new("Dryer", 2.5, 2.0, 0.8, 1).unwrap();
        assert_eq!(appliance.report().gap_percentage, 20.0);
        assert_eq!(appliance.recommendation(), Recommendation::ConsiderReplacing);
    }

    #[test]
    fn test_reported_twenty_percent_is_flagged() {
        // 6.0 * 0.8 is inexact, so the unrounded gap is not exactly 20%
        let appliance = Appliance::new("Kettle", 1.5, 4.0, 0.8, 1).unwrap();
        let report = appliance.report();
        assert_eq!(report.gap_percentage, 20.0);
        assert_eq!(report.recommendation, Recommendation::ConsiderReplacing);
    }

    #[test]
    fn test_hours_above_24_are_accepted() {
        assert!(Appliance::new("Server rack", 0.5, 30.0, 0.9, 1).is_ok());
    }

    #[test]
    fn test_invariants_enforced() {
        assert_eq!(
            Appliance::new("x", 0.0, 1.0, 0.5, 1),
            Err(RecordRejection::NonPositivePower(0.0))
        );
        assert_eq!(
            Appliance::new("x", 1.0, -1.0, 0.5, 1),
            Err(RecordRejection::NonPositiveHours(-1.0))
        );
        assert_eq!(
            Appliance::new("x", 1.0, 1.0, 0.0, 1),
            Err(RecordRejection::EfficiencyOutOfRange(0.0))
        );
        assert_eq!(
            Appliance::new("x", 1.0, 1.0, 1.5, 1),
            Err(RecordRejection::EfficiencyOutOfRange(1.5))
        );
        assert_eq!(
            Appliance::new("x", 1.0, 1.0, 0.5, 0),
            Err(RecordRejection::NonPositiveCount(0))
        );
        assert_eq!(
            Appliance::new("   ", 1.0, 1.0, 0.5, 1),
            Err(RecordRejection::InvalidName)
        );
        assert!(Appliance::new("x", f64::NAN, 1.0, 0.5, 1).is_err());
        assert!(Appliance::new("x", 1.0, 1.0, f64::NAN, 1).is_err());
        assert!(Appliance::new("x", 1.0, 1.0, 0.5, i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_from_record() {
        let record = json!({
            "name": "Heater",
            "power_kw": 1.5,
            "hours_per_day": "4",
            "efficiency_ratio": 0.5,
        });

        let appliance = Appliance::try_from(&record).unwrap();
        assert_eq!(appliance.name(), "Heater");
        assert_eq!(appliance.daily_energy_consumption(), 6.0);
        assert_eq!(appliance.count(), 1);
    }

    #[test]
    fn test_from_record_rejections() {
        assert_eq!(
            Appliance::try_from(&json!("Heater")),
            Err(RecordRejection::NotAnObject)
        );
        assert_eq!(
            Appliance::try_from(&json!({"name": "a", "hours_per_day": 1, "efficiency_ratio": 0.5})),
            Err(RecordRejection::MissingField("power_kw"))
        );
        assert_eq!(
            Appliance::try_from(&json!({
                "name": "a", "power_kw": "lots", "hours_per_day": 1, "efficiency_ratio": 0.5
            })),
            Err(RecordRejection::NotNumeric("power_kw"))
        );
        assert_eq!(
            Appliance::try_from(&json!({
                "name": "a", "power_kw": 1, "hours_per_day": 1, "efficiency_ratio": 0.5,
                "count": "many"
            })),
            Err(RecordRejection::NotNumeric("count"))
        );
        assert_eq!(
            Appliance::try_from(&json!({"power_kw": 1, "hours_per_day": 1, "efficiency_ratio": 0.5})),
            Err(RecordRejection::MissingField("name"))
        );
        assert_eq!(
            Appliance::try_from(&json!({
                "name": 42, "power_kw": 1, "hours_per_day": 1, "efficiency_ratio": 0.5
            })),
            Err(RecordRejection::InvalidName)
        );
    }

    #[test]
    fn test_null_count_is_rejected() {
        let record = json!({
            "name": "Fan", "power_kw": 0.05, "hours_per_day": 8, "efficiency_ratio": 0.9,
            "count": null
        });
        assert_eq!(
            Appliance::try_from(&record),
            Err(RecordRejection::NotNumeric("count"))
        );
    }

    #[test]
    fn test_overflowing_consumption_is_rejected() {
        assert_eq!(
            Appliance::new("Huge", 1e300, 1e300, 0.5, 1),
            Err(RecordRejection::EnergyOutOfRange)
        );
        // Finite daily figure whose yearly total overflows
        assert_eq!(
            Appliance::new("Almost huge", 1e306, 1.0, 0.5, 1),
            Err(RecordRejection::EnergyOutOfRange)
        );

        let record = json!({
            "name": "Huge", "power_kw": 1e300, "hours_per_day": 1e300, "efficiency_ratio": 0.5
        });
        assert_eq!(
            Appliance::try_from(&record),
            Err(RecordRejection::EnergyOutOfRange)
        );
    }

    #[test]
    fn test_large_but_finite_consumption_stays_bounded() {
        let appliance = Appliance::new("Plant", 1e150, 1e150, 0.5, 1).unwrap();
        assert!(appliance.efficiency_gap().is_finite());
        assert!(appliance.efficiency_gap() >= 0.0);
        assert_eq!(appliance.gap_percentage(), 50.0);
        assert_eq!(appliance.recommendation(), Recommendation::ConsiderReplacing);
    }

    #[test]
    fn test_underflowing_consumption_guards_percentage() {
        let appliance = Appliance::new("Tiny", 1e-200, 1e-200, 0.5, 1).unwrap();
        assert_eq!(appliance.daily_energy_consumption(), 0.0);
        assert_eq!(appliance.gap_percentage(), 0.0);
        assert_eq!(appliance.recommendation(), Recommendation::Efficient);

        let report = appliance.report();
        assert_eq!(report.daily_energy_consumption, 0.0);
        assert_eq!(report.gap, 0.0);
        assert_eq!(report.gap_percentage, 0.0);
    }

    #[test]
    fn test_annual_savings() {
        assert_eq!(heater(1).annual_savings(0.0), 0.0);
        assert_eq!(heater(2).annual_savings(1.0), 2190.0);
    }

    #[test]
    fn test_recommendation_serializes_as_label() {
        assert_eq!(
            serde_json::to_value(Recommendation::ConsiderReplacing).unwrap(),
            json!("consider replacing")
        );
        assert_eq!(
            serde_json::to_value(Recommendation::Efficient).unwrap(),
            json!("efficient")
        );
    }
}
