use showroom_client::{CloudinaryUploader, HttpMailer};
use showroom_core::ListingService;
use showroom_db::{Database, ListingRepository};

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub db: Database,
    pub images: CloudinaryUploader,
    pub mailer: HttpMailer,
    /// Admin token protecting listing creation (None = admin endpoints disabled).
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn listings(&self) -> ListingService<CloudinaryUploader, ListingRepository> {
        ListingService::new(self.images.clone(), self.db.listing_repo())
    }
}
