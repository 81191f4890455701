use std::env;

/// Shared secret presented by trusted internal callers (the Telegram bot)
/// in the `X-API-KEY` header.
#[derive(Clone, Debug)]
pub struct InternalApiConfig {
    pub api_key: Option<String>,
}

impl InternalApiConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("INTERNAL_API_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}
