use chrono::{DateTime, Utc};
use showroom_core::error::AppError;
use showroom_core::models::{CarListing, NewListing};
use showroom_core::traits::ListingStore;
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

const LISTING_COLUMNS: &str = "id, title, price, currency, location, condition, transmission, \
     year, make, model, color, engine_size, registered_state, selling_condition, \
     bought_condition, fuel_type, mileage, images, features, description, down_payment, \
     owner_id, created_at, updated_at";

/// Repository for car listing persistence in PostgreSQL.
#[derive(Clone)]
pub struct ListingRepository {
    pool: Pool<Postgres>,
}

impl ListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a listing and return the stored row with its generated id
    /// and timestamps.
    pub async fn create(&self, listing: &NewListing) -> Result<CarListing, AppError> {
        let query = format!(
            r#"
            INSERT INTO car_listings (
                title, price, currency, location, condition, transmission, year, make, model,
                color, engine_size, registered_state, selling_condition, bought_condition,
                fuel_type, mileage, images, features, description, down_payment, owner_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING {LISTING_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ListingRow>(&query)
            .bind(&listing.title)
            .bind(listing.price)
            .bind(&listing.currency)
            .bind(&listing.location)
            .bind(listing.condition.map(|c| c.as_str()))
            .bind(listing.transmission.map(|t| t.as_str()))
            .bind(listing.year)
            .bind(&listing.make)
            .bind(&listing.model)
            .bind(&listing.color)
            .bind(&listing.engine_size)
            .bind(&listing.registered_state)
            .bind(&listing.selling_condition)
            .bind(&listing.bought_condition)
            .bind(listing.fuel_type.map(|f| f.as_str()))
            .bind(listing.mileage)
            .bind(&listing.images)
            .bind(&listing.features)
            .bind(&listing.description)
            .bind(listing.down_payment)
            .bind(listing.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.into())
    }

    /// All listings, newest first.
    pub async fn list_newest_first(&self) -> Result<Vec<CarListing>, AppError> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM car_listings ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, ListingRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<CarListing>, AppError> {
        let query = format!("SELECT {LISTING_COLUMNS} FROM car_listings WHERE id = $1");

        let row = sqlx::query_as::<_, ListingRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    title: String,
    price: f64,
    currency: String,
    location: Option<String>,
    condition: Option<String>,
    transmission: Option<String>,
    year: i32,
    make: String,
    model: String,
    color: Option<String>,
    engine_size: Option<String>,
    registered_state: Option<String>,
    selling_condition: Option<String>,
    bought_condition: Option<String>,
    fuel_type: Option<String>,
    mileage: f64,
    images: Vec<String>,
    features: Vec<String>,
    description: String,
    down_payment: f64,
    owner_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ListingRow> for CarListing {
    fn from(row: ListingRow) -> Self {
        // CHECK constraints keep the enum columns to known labels.
        CarListing {
            id: row.id,
            title: row.title,
            price: row.price,
            currency: row.currency,
            location: row.location,
            condition: row.condition.and_then(|c| c.parse().ok()),
            transmission: row.transmission.and_then(|t| t.parse().ok()),
            year: row.year,
            make: row.make,
            model: row.model,
            color: row.color,
            engine_size: row.engine_size,
            registered_state: row.registered_state,
            selling_condition: row.selling_condition,
            bought_condition: row.bought_condition,
            fuel_type: row.fuel_type.and_then(|f| f.parse().ok()),
            mileage: row.mileage,
            images: row.images,
            features: row.features,
            description: row.description,
            down_payment: row.down_payment,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// -- Trait implementation --

impl ListingStore for ListingRepository {
    async fn create(&self, listing: &NewListing) -> Result<CarListing, AppError> {
        ListingRepository::create(self, listing).await
    }

    async fn list_newest_first(&self) -> Result<Vec<CarListing>, AppError> {
        ListingRepository::list_newest_first(self).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<CarListing>, AppError> {
        ListingRepository::get(self, id).await
    }
}
