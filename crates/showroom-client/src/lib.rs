pub mod hosting;
pub mod mailer;

pub use hosting::{CloudinaryUploader, HostingConfig};
pub use mailer::{HttpMailer, MailerConfig};
