use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Body of a calculate request. Fields stay as raw JSON so that each appliance
/// record can be validated on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub cost_per_kwh: Option<Value>,
    #[serde(default)]
    pub appliances: Option<Value>,
}

impl TryFrom<Value> for CalculateRequest {
    type Error = AppError;

    /// Only a JSON object is a request; `null` members read as absent.
    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = body else {
            return Err(AppError::InvalidRequest(
                "request body must be a JSON object".to_string(),
            ));
        };

        let mut take = |key: &str| fields.remove(key).filter(|value| !value.is_null());
        Ok(Self {
            cost_per_kwh: take("cost_per_kwh"),
            appliances: take("appliances"),
        })
    }
}
