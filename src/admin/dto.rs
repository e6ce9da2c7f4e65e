use serde::Deserialize;

use crate::accounts::Pricing;
use crate::error::ApiError;

/// Pricing submitted at approval time. Missing amounts default to 0; the
/// stored map is always fully replaced, never merged.
#[derive(Debug, Default, Deserialize)]
pub struct PricingRequest {
    #[serde(default)]
    pub cleaning: Option<f64>,
    #[serde(default)]
    pub plumbing: Option<f64>,
    #[serde(default)]
    pub painting: Option<f64>,
    #[serde(default)]
    pub electrical: Option<f64>,
}

impl PricingRequest {
    pub fn into_pricing(self) -> Result<Pricing, ApiError> {
        let pricing = Pricing {
            cleaning: self.cleaning.unwrap_or(0.0),
            plumbing: self.plumbing.unwrap_or(0.0),
            painting: self.painting.unwrap_or(0.0),
            electrical: self.electrical.unwrap_or(0.0),
        };
        if [
            pricing.cleaning,
            pricing.plumbing,
            pricing.painting,
            pricing.electrical,
        ]
        .iter()
        .any(|amount| *amount < 0.0 || !amount.is_finite())
        {
            return Err(ApiError::Validation(
                "Pricing amounts must be non-negative".into(),
            ));
        }
        Ok(pricing)
    }
}

#[derive(Debug, Deserialize)]
pub struct AddStaffRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}
