use std::future::Future;

use uuid::Uuid;

use crate::error::AppError;
use crate::images::InlineImage;
use crate::models::{CarListing, NewListing};
use crate::notify::Email;

/// Uploads inline image data to an external hosting service.
pub trait ImageHost: Send + Sync + Clone {
    /// Upload one image and return its publicly reachable URL.
    fn upload(&self, image: &InlineImage) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Persists and retrieves car listings.
pub trait ListingStore: Send + Sync + Clone {
    /// Insert a listing. Identifier and timestamps are assigned by the store.
    fn create(
        &self,
        listing: &NewListing,
    ) -> impl Future<Output = Result<CarListing, AppError>> + Send;

    /// All listings, newest first.
    fn list_newest_first(&self) -> impl Future<Output = Result<Vec<CarListing>, AppError>> + Send;

    fn get(&self, id: Uuid) -> impl Future<Output = Result<Option<CarListing>, AppError>> + Send;
}

/// Dispatches rendered emails through a transport.
///
/// Sender and recipient are properties of the transport configuration,
/// not of the message.
pub trait Mailer: Send + Sync + Clone {
    fn send(&self, email: &Email) -> impl Future<Output = Result<(), AppError>> + Send;
}
