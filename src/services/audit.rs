use serde_json::Value;

use crate::config::AuditConfig;
use crate::error::{AppError, Result};
use crate::models::{
    coerce, report::round2, Appliance, BatchReport, CalculateRequest, RecordRejection,
};

/// Turns a calculate request into a [`BatchReport`]. Holds no per-request state.
#[derive(Debug, Clone)]
pub struct AuditService {
    default_cost_per_kwh: f64,
}

impl AuditService {
    pub fn new(default_cost_per_kwh: f64) -> Self {
        Self {
            default_cost_per_kwh,
        }
    }

    pub fn default_cost_per_kwh(&self) -> f64 {
        self.default_cost_per_kwh
    }

    pub fn calculate(&self, request: &CalculateRequest) -> Result<BatchReport> {
        let cost_per_kwh = self.resolve_cost(request.cost_per_kwh.as_ref())?;

        // Anything other than a list holds no usable records
        let records: &[Value] = match &request.appliances {
            Some(Value::Array(records)) => records.as_slice(),
            _ => &[],
        };
        let appliances = valid_appliances(records, cost_per_kwh);
        if appliances.is_empty() {
            return Err(AppError::NoValidAppliances);
        }

        let report = aggregate(&appliances, cost_per_kwh);
        tracing::info!(
            submitted = records.len(),
            accepted = report.results.len(),
            total_energy = report.total_energy,
            total_savings = report.total_savings,
            "Energy audit calculated"
        );

        Ok(report)
    }

    fn resolve_cost(&self, raw: Option<&Value>) -> Result<f64> {
        let cost = match raw {
            None => self.default_cost_per_kwh,
            Some(value) => coerce::real(value).ok_or(AppError::InvalidCost)?,
        };

        if cost <= 0.0 {
            return Err(AppError::InvalidCost);
        }

        Ok(cost)
    }
}

impl From<&AuditConfig> for AuditService {
    fn from(config: &AuditConfig) -> Self {
        Self::new(config.default_cost_per_kwh)
    }
}

/// Keeps the records that form a valid [`Appliance`], in submission order.
fn valid_appliances(records: &[Value], cost_per_kwh: f64) -> Vec<Appliance> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let checked = Appliance::try_from(record).and_then(|appliance| {
                if (appliance.annual_energy_consumption() * cost_per_kwh).is_finite() {
                    Ok(appliance)
                } else {
                    Err(RecordRejection::EnergyOutOfRange)
                }
            });

            match checked {
                Ok(appliance) => Some(appliance),
                Err(reason) => {
                    tracing::debug!(index, %reason, "Skipping appliance record");
                    None
                }
            }
        })
        .collect()
}

fn aggregate(appliances: &[Appliance], cost_per_kwh: f64) -> BatchReport {
    let mut total_energy = 0.0;
    let mut total_savings = 0.0;
    let mut results = Vec::with_capacity(appliances.len());

    for appliance in appliances {
        let energy = total_energy + appliance.daily_energy_consumption();
        let savings = total_savings + appliance.annual_savings(cost_per_kwh);
        if !energy.is_finite() || !savings.is_finite() {
            tracing::debug!(
                appliance = appliance.name(),
                count = appliance.count(),
                "Skipping appliance, batch totals would overflow"
            );
            continue;
        }

        total_energy = energy;
        total_savings = savings;
        results.push(appliance.report());
    }

    BatchReport {
        results,
        total_energy: round2(total_energy),
        total_savings: round2(total_savings),
    }
}
