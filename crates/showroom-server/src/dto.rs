use chrono::{DateTime, Utc};
use serde::Serialize;

use showroom_core::models::CarListing;

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Documented shape of `POST /api/cars`. Numeric fields accept either a JSON
/// number or a numeric string.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub title: String,
    #[schema(value_type = f64)]
    pub price: serde_json::Value,
    pub currency: Option<String>,
    pub location: Option<String>,
    /// `New`, `Used` or `Certified Pre-Owned`
    pub condition: Option<String>,
    /// `Automatic`, `Manual`, `Semi-Automatic` or `CVT`
    pub transmission: Option<String>,
    #[schema(value_type = i32)]
    pub year: serde_json::Value,
    pub make: String,
    pub model: String,
    pub color: Option<String>,
    pub engine_size: Option<String>,
    pub registered_state: Option<String>,
    pub selling_condition: Option<String>,
    pub bought_condition: Option<String>,
    /// `Petrol`, `Diesel`, `Electric` or `Hybrid`
    pub fuel_type: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub mileage: Option<serde_json::Value>,
    /// Hosted URLs and/or `data:<mime>;base64,<data>` URIs, in display order
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub down_payment: Option<serde_json::Value>,
    pub owner_id: Option<uuid::Uuid>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    /// String form of the database key
    pub id: String,
    pub title: String,
    pub price: f64,
    pub currency: String,
    pub location: Option<String>,
    pub condition: Option<String>,
    pub transmission: Option<String>,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub color: Option<String>,
    pub engine_size: Option<String>,
    pub registered_state: Option<String>,
    pub selling_condition: Option<String>,
    pub bought_condition: Option<String>,
    pub fuel_type: Option<String>,
    pub mileage: f64,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub description: String,
    pub down_payment: f64,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CarListing> for ListingResponse {
    fn from(l: CarListing) -> Self {
        Self {
            id: l.id.to_string(),
            title: l.title,
            price: l.price,
            currency: l.currency,
            location: l.location,
            condition: l.condition.map(|c| c.to_string()),
            transmission: l.transmission.map(|t| t.to_string()),
            year: l.year,
            make: l.make,
            model: l.model,
            color: l.color,
            engine_size: l.engine_size,
            registered_state: l.registered_state,
            selling_condition: l.selling_condition,
            bought_condition: l.bought_condition,
            fuel_type: l.fuel_type.map(|f| f.to_string()),
            mileage: l.mileage,
            images: l.images,
            features: l.features,
            description: l.description,
            down_payment: l.down_payment,
            owner_id: l.owner_id.map(|o| o.to_string()),
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Documented shape of `POST /api/send-email`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    /// `contact` or `order`
    #[serde(rename = "type")]
    pub kind: String,
    /// Contact: name, email, phone?, subject?, message.
    /// Order: name, email, phone?, carTitle?, carId?, price?, message?
    pub form_data: serde_json::Value,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SendEmailResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
