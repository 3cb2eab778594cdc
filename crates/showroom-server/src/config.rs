use showroom_core::AppError;

const DEFAULT_PORT: u16 = 3000;

/// Listener and admin settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub admin_token: Option<String>,
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `SHOWROOM_PORT` (optional, defaults to 3000)
    /// - `SHOWROOM_ADMIN_TOKEN` (optional; listing creation is disabled without it)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("SHOWROOM_PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::ConfigError(format!("Invalid SHOWROOM_PORT '{raw}'"))
            })?,
        };

        let admin_token = lookup("SHOWROOM_ADMIN_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self { port, admin_token })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
