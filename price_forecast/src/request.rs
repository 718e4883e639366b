//! Request/response contract of the price prediction endpoint

use crate::config::ForecastConfig;
use crate::data::PriceTable;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastPoint, ForecastResult, SeasonalTrendModel, TrainedForecastModel};
use crate::utils::parse_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Incoming prediction query.
///
/// Every field is optional at the type level so that a missing field is
/// reported as [`ForecastError::InvalidInput`] instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub crop: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
}

/// A request whose fields are present and whose date parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub crop: String,
    pub location: String,
    /// The date exactly as the caller sent it
    pub date_input: String,
    pub date: NaiveDate,
}

/// Successful prediction, serialised with camelCase keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// Echo of the requested date string
    pub requested_date: String,
    pub predicted_price: f64,
    pub recommended_date: NaiveDate,
    pub window: Vec<ForecastPoint>,
}

impl PredictRequest {
    pub fn new(crop: &str, location: &str, date: &str) -> Self {
        Self {
            crop: Some(crop.to_string()),
            location: Some(location.to_string()),
            date: Some(date.to_string()),
        }
    }

    /// Check that crop, location and date are present and non-blank and
    /// that the date parses.
    pub fn validate(&self) -> Result<ValidatedRequest> {
        let missing: Vec<&str> = [
            ("crop", &self.crop),
            ("location", &self.location),
            ("date", &self.date),
        ]
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(ForecastError::InvalidInput(format!(
                "{} required",
                missing.join(", ")
            )));
        }

        let crop = self.crop.as_deref().unwrap_or_default().trim().to_string();
        let location = self.location.as_deref().unwrap_or_default().trim().to_string();
        let date_input = self.date.as_deref().unwrap_or_default().to_string();
        let date = parse_date(&date_input)?;

        Ok(ValidatedRequest {
            crop,
            location,
            date_input,
            date,
        })
    }
}

impl PredictResponse {
    /// Shape a forecast for the caller, echoing the requested date string
    pub fn from_forecast(requested_date: &str, forecast: &ForecastResult) -> Self {
        Self {
            requested_date: requested_date.to_string(),
            predicted_price: forecast.predicted_price(),
            recommended_date: forecast.recommended_date(),
            window: forecast.window().to_vec(),
        }
    }

    /// Serialise to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ForecastError::ComputationError(format!("Cannot serialise response: {}", e)))
    }
}

/// Answer a prediction request against a loaded price table with the
/// default configuration
pub fn predict(table: &PriceTable, request: &PredictRequest) -> Result<PredictResponse> {
    predict_with(table, request, ForecastConfig::default())
}

/// Answer a prediction request with an explicit configuration
pub fn predict_with(
    table: &PriceTable,
    request: &PredictRequest,
    config: ForecastConfig,
) -> Result<PredictResponse> {
    let request = request.validate()?;
    let series = table.series(&request.crop, &request.location)?;

    let forecast = SeasonalTrendModel::new(config)?
        .train(&series)?
        .forecast(request.date)?;

    Ok(PredictResponse::from_forecast(&request.date_input, &forecast))
}
