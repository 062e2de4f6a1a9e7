use serde::{Deserialize, Serialize};

/// Pricing fields as read from the page; `None` means no strategy resolved the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPricing {
    pub fee: Option<f64>,
    pub exchange_rate: Option<f64>,
    pub recipient_gets: Option<f64>,
}

/// Everything gathered from one list item before cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProviderFields {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub monito_score: Option<f64>,
    pub transfer_time: Option<String>,
    pub best_deal: bool,
    pub promotional: RawPricing,
    pub regular: RawPricing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingGroup {
    pub fee: f64,
    pub exchange_rate: f64,
    pub recipient_gets: f64,
}

impl From<&RawPricing> for PricingGroup {
    fn from(raw: &RawPricing) -> Self {
        Self {
            fee: raw.fee.unwrap_or(0.0),
            exchange_rate: raw.exchange_rate.unwrap_or(0.0),
            recipient_gets: raw.recipient_gets.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub id: u32,
    pub name: String,
    pub logo: String,
    pub monito_score: f64,
    pub transfer_time: String,
    pub best_deal: bool,
    pub promotional: PricingGroup,
    pub regular: PricingGroup,
}
