use uuid::Uuid;

use crate::error::AppError;
use crate::images::resolve_images;
use crate::listing::ListingPayload;
use crate::models::CarListing;
use crate::traits::{ImageHost, ListingStore};

/// Orchestrates listing creation: coerce → resolve images → persist.
///
/// Generic over the image host and the store so tests can run without
/// HTTP or a database.
pub struct ListingService<H, S>
where
    H: ImageHost,
    S: ListingStore,
{
    host: H,
    store: S,
}

impl<H, S> ListingService<H, S>
where
    H: ImageHost,
    S: ListingStore,
{
    pub fn new(host: H, store: S) -> Self {
        Self { host, store }
    }

    /// Validate the payload, upload inline images and store the listing.
    ///
    /// Validation failures are returned before any image is uploaded.
    pub async fn create(&self, payload: ListingPayload) -> Result<CarListing, AppError> {
        let draft = payload.into_draft()?;

        let submitted = draft.image_entries.len();
        let images = resolve_images(&self.host, &draft.image_entries).await;
        tracing::info!(submitted, stored = images.len(), "Resolved listing images");

        let new_listing = draft.into_new_listing(images);
        let listing = self.store.create(&new_listing).await?;

        tracing::info!(id = %listing.id, title = %listing.title, "Listing created");
        Ok(listing)
    }

    /// All listings, newest first.
    pub async fn list(&self) -> Result<Vec<CarListing>, AppError> {
        self.store.list_newest_first().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<CarListing>, AppError> {
        self.store.get(id).await
    }
}
