//! Coercion of the loosely-typed create payload into a [`NewListing`].
//!
//! The admin form posts whatever the browser had in its inputs, so numeric
//! fields arrive either as JSON numbers or as strings. Everything is
//! normalised here before the listing reaches the store.

use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Condition, DEFAULT_CURRENCY, FuelType, MIN_YEAR, NewListing, Transmission, max_year,
};

/// A number as the browser may send it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// An empty form input posts `""`; treat it as if the field were absent.
    fn is_blank(&self) -> bool {
        matches!(self, Numeric::Text(s) if s.trim().is_empty())
    }

    fn to_f64(&self, field: &str) -> Result<f64, AppError> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().replace(',', "").parse::<f64>().map_err(|_| {
                AppError::ValidationError(format!("{field} must be a number, got '{s}'"))
            })?,
        };
        if !value.is_finite() {
            return Err(AppError::ValidationError(format!(
                "{field} must be a finite number"
            )));
        }
        Ok(value)
    }
}

/// Wire shape accepted by the create endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPayload {
    pub title: Option<String>,
    pub price: Option<Numeric>,
    pub currency: Option<String>,
    pub location: Option<String>,
    pub condition: Option<Condition>,
    pub transmission: Option<Transmission>,
    pub year: Option<Numeric>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub engine_size: Option<String>,
    pub registered_state: Option<String>,
    pub selling_condition: Option<String>,
    pub bought_condition: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub mileage: Option<Numeric>,
    /// Hosted URLs and/or base64 data URIs, in display order.
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub description: Option<String>,
    pub down_payment: Option<Numeric>,
    #[serde(alias = "user")]
    pub owner_id: Option<Uuid>,
}

/// A validated listing whose images have not been resolved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub image_entries: Vec<String>,
    listing: NewListing,
}

impl ListingPayload {
    /// Coerce numerics, check bounds, trim strings and apply defaults.
    pub fn into_draft(self) -> Result<ListingDraft, AppError> {
        let title = required_text(self.title, "title")?;
        let make = required_text(self.make, "make")?;
        let model = required_text(self.model, "model")?;

        let price = present(self.price)
            .ok_or_else(|| AppError::ValidationError("price is required".into()))?
            .to_f64("price")?;
        non_negative(price, "price")?;

        let year = coerce_year(
            &present(self.year)
                .ok_or_else(|| AppError::ValidationError("year is required".into()))?,
        )?;

        let mileage = match present(self.mileage) {
            Some(m) => m.to_f64("mileage")?,
            None => 0.0,
        };
        non_negative(mileage, "mileage")?;

        let down_payment = match present(self.down_payment) {
            Some(d) => d.to_f64("downPayment")?,
            None => 0.0,
        };
        non_negative(down_payment, "downPayment")?;

        let listing = NewListing {
            title,
            price,
            currency: optional_text(self.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            location: optional_text(self.location),
            condition: self.condition,
            transmission: self.transmission,
            year,
            make,
            model,
            color: optional_text(self.color),
            engine_size: optional_text(self.engine_size),
            registered_state: optional_text(self.registered_state),
            selling_condition: optional_text(self.selling_condition),
            bought_condition: optional_text(self.bought_condition),
            fuel_type: self.fuel_type,
            mileage,
            images: Vec::new(),
            features: self
                .features
                .unwrap_or_default()
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            description: self.description.map(|d| d.trim().to_string()).unwrap_or_default(),
            down_payment,
            owner_id: self.owner_id,
        };

        Ok(ListingDraft {
            image_entries: self.images.unwrap_or_default(),
            listing,
        })
    }
}

impl ListingDraft {
    /// Attach the resolved image URLs and produce the insert DTO.
    pub fn into_new_listing(self, images: Vec<String>) -> NewListing {
        NewListing {
            images,
            ..self.listing
        }
    }
}

fn present(value: Option<Numeric>) -> Option<Numeric> {
    value.filter(|n| !n.is_blank())
}

fn coerce_year(raw: &Numeric) -> Result<i32, AppError> {
    let value = raw.to_f64("year")?;
    if value.fract() != 0.0 {
        return Err(AppError::ValidationError(format!(
            "year must be a whole number, got {value}"
        )));
    }
    let max = max_year();
    if value < f64::from(MIN_YEAR) || value > f64::from(max) {
        return Err(AppError::ValidationError(format!(
            "year must be between {MIN_YEAR} and {max}, got {value}"
        )));
    }
    Ok(value as i32)
}

fn non_negative(value: f64, field: &str) -> Result<(), AppError> {
    if value < 0.0 {
        return Err(AppError::ValidationError(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    optional_text(value).ok_or_else(|| AppError::ValidationError(format!("{field} is required")))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
