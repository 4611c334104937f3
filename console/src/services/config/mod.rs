/// Base URL used when `DISPATCH_API_URL` is not set at build time.
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub user_agent: String,
    pub storage_keys: StorageKeys,
    /// Buffer size of the session invalidation broadcast channel
    pub signal_capacity: usize,
}

/// Keys of the three values persisted in browser storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub access_token: String,
    pub refresh_token: String,
    pub session: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("DISPATCH_API_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            user_agent: "dispatch-admin-console/1.0".to_string(),
            storage_keys: StorageKeys::default(),
            signal_capacity: 16,
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            access_token: "access_token".to_string(),
            refresh_token: "refresh_token".to_string(),
            session: "user".to_string(),
        }
    }
}

impl ConsoleConfig {
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }
}

/// Join a request path onto a base URL without doubling slashes.
/// Absolute URLs are used as given.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joining() {
        let config = ConsoleConfig::default().with_api_base_url("https://dispatch.example.com/api/");
        let base = config.api_base_url.as_str();

        assert_eq!(
            join_url(base, "/auth/email-login/"),
            "https://dispatch.example.com/api/auth/email-login/"
        );
        assert_eq!(
            join_url(base, "users/"),
            "https://dispatch.example.com/api/users/"
        );
        assert_eq!(
            join_url(base, "https://other.example.com/ping"),
            "https://other.example.com/ping"
        );
    }

    #[test]
    fn test_default_storage_keys() {
        let keys = StorageKeys::default();
        assert_eq!(keys.access_token, "access_token");
        assert_eq!(keys.refresh_token, "refresh_token");
        assert_eq!(keys.session, "user");
    }
}
