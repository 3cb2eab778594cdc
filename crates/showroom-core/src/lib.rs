pub mod error;
pub mod images;
pub mod listing;
pub mod models;
pub mod notify;
pub mod service;
pub mod traits;


pub use error::AppError;
pub use images::{ImageSource, InlineImage, resolve_images};
pub use listing::{ListingDraft, ListingPayload};
pub use models::{CarListing, Condition, FuelType, NewListing, PLACEHOLDER_IMAGE, Transmission};
pub use notify::{ContactForm, Email, Notification, OrderForm, send_notification};
pub use service::ListingService;
pub use traits::{ImageHost, ListingStore, Mailer};
