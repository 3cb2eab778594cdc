use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image shown for listings that ended up with no usable pictures.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/800x600?text=No+Image";

/// Currency assumed when the payload omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Oldest model year a listing may carry.
pub const MIN_YEAR: i32 = 1900;

/// Defines a string-backed enum whose wire and column representation is the
/// human-readable label.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| format!("Unknown {}: {}", stringify!($name), s))
            }
        }
    };
}

labelled_enum!(
    /// Sale condition of the vehicle.
    Condition {
        New => "New",
        Used => "Used",
        CertifiedPreOwned => "Certified Pre-Owned",
    }
);

labelled_enum!(
    /// Gearbox type.
    Transmission {
        Automatic => "Automatic",
        Manual => "Manual",
        SemiAutomatic => "Semi-Automatic",
        Cvt => "CVT",
    }
);

labelled_enum!(
    FuelType {
        Petrol => "Petrol",
        Diesel => "Diesel",
        Electric => "Electric",
        Hybrid => "Hybrid",
    }
);

/// Newest model year accepted right now (next year's models go on sale early).
pub fn max_year() -> i32 {
    use chrono::Datelike;
    Utc::now().year() + 1
}

/// A persisted car-for-sale record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarListing {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub currency: String,
    pub location: Option<String>,
    pub condition: Option<Condition>,
    pub transmission: Option<Transmission>,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub color: Option<String>,
    pub engine_size: Option<String>,
    pub registered_state: Option<String>,
    pub selling_condition: Option<String>,
    pub bought_condition: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub mileage: f64,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub description: String,
    pub down_payment: f64,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for inserting a new listing. Numerics are already coerced and the
/// image list already resolved to hosted URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub price: f64,
    pub currency: String,
    pub location: Option<String>,
    pub condition: Option<Condition>,
    pub transmission: Option<Transmission>,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub color: Option<String>,
    pub engine_size: Option<String>,
    pub registered_state: Option<String>,
    pub selling_condition: Option<String>,
    pub bought_condition: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub mileage: f64,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub description: String,
    pub down_payment: f64,
    pub owner_id: Option<Uuid>,
}
