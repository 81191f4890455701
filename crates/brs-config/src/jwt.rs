use std::env;

const DEV_SECRET: &str = "brs-dev-secret-change-me";

/// Token signing settings. Lifetimes are in seconds.
///
/// - `JWT_SECRET` (a development secret is used when unset)
/// - `JWT_ACCESS_EXPIRY`: access token lifetime, default one hour
/// - `JWT_REFRESH_EXPIRY`: how long after the original login a token may
///   still be refreshed, default seven days
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

fn seconds(var: &str, default: i64) -> i64 {
    env::var(var)
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEV_SECRET.to_string()),
            access_token_expiry: seconds("JWT_ACCESS_EXPIRY", 60 * 60),
            refresh_token_expiry: seconds("JWT_REFRESH_EXPIRY", 7 * 24 * 60 * 60),
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.secret == DEV_SECRET
    }
}
