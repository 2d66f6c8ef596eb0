//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// JWT and credential settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token lifetime in hours.
    #[serde(default = "default_jwt_ttl_hours")]
    pub jwt_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_ttl_hours: default_jwt_ttl_hours(),
        }
    }
}

fn default_jwt_secret() -> String {
    // Overridden in any real deployment via DRIVEBOX_AUTH__JWT_SECRET.
    "change-me-in-production".to_string()
}

fn default_jwt_ttl_hours() -> u64 {
    24
}
