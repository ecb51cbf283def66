//! Startup configuration from the environment.

use std::env;

/// The Graph permission scopes this server requests, fixed at startup.
pub const GRAPH_SCOPES: [&str; 8] = [
    "https://graph.microsoft.com/Mail.Read",
    "https://graph.microsoft.com/Mail.ReadWrite",
    "https://graph.microsoft.com/Mail.Send",
    "https://graph.microsoft.com/Calendar.Read",
    "https://graph.microsoft.com/Calendar.ReadWrite",
    "https://graph.microsoft.com/Tasks.Read",
    "https://graph.microsoft.com/Tasks.ReadWrite",
    "https://graph.microsoft.com/User.Read",
];

/// Configuration errors, all fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Validated startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Azure AD application (client) id.
    pub client_id: String,
    /// Azure AD client secret.
    pub client_secret: String,
    /// Azure AD tenant id; `common` covers multi-tenant and personal
    /// accounts.
    pub tenant_id: String,
    /// Redirect URI from the app registration. The device flow never
    /// redirects, but the value is kept for registration parity.
    pub redirect_uri: String,
    /// Path of the credential cache file.
    pub cache_path: String,
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `OUTLOOK_CLIENT_ID` or `OUTLOOK_CLIENT_SECRET`
    /// is missing; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::MissingVar(key));

        Ok(Self {
            client_id: required("OUTLOOK_CLIENT_ID")?,
            client_secret: required("OUTLOOK_CLIENT_SECRET")?,
            tenant_id: lookup("OUTLOOK_TENANT_ID").unwrap_or_else(|| "common".to_string()),
            redirect_uri: lookup("OUTLOOK_REDIRECT_URI")
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            cache_path: lookup("TOKEN_CACHE_FILE")
                .unwrap_or_else(|| "token_cache.json".to_string()),
        })
    }

    /// The scope list as owned strings for the auth session.
    #[must_use]
    pub fn scopes() -> Vec<String> {
        GRAPH_SCOPES.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("OUTLOOK_CLIENT_ID", "cid"),
            ("OUTLOOK_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.tenant_id, "common");
        assert_eq!(config.redirect_uri, "http://localhost:8080");
        assert_eq!(config.cache_path, "token_cache.json");
    }

    #[test]
    fn test_missing_client_id_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("OUTLOOK_CLIENT_SECRET", "secret")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("OUTLOOK_CLIENT_ID")));
    }

    #[test]
    fn test_missing_client_secret_is_fatal() {
        let err =
            Config::from_lookup(lookup_from(&[("OUTLOOK_CLIENT_ID", "cid")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVar("OUTLOOK_CLIENT_SECRET")
        ));
    }

    #[test]
    fn test_overrides_respected() {
        let config = Config::from_lookup(lookup_from(&[
            ("OUTLOOK_CLIENT_ID", "cid"),
            ("OUTLOOK_CLIENT_SECRET", "secret"),
            ("OUTLOOK_TENANT_ID", "contoso"),
            ("TOKEN_CACHE_FILE", "/var/lib/graphmail/cache.json"),
        ]))
        .unwrap();

        assert_eq!(config.tenant_id, "contoso");
        assert_eq!(config.cache_path, "/var/lib/graphmail/cache.json");
    }

    #[test]
    fn test_scope_list_is_fixed() {
        assert_eq!(Config::scopes().len(), 8);
        assert!(Config::scopes().iter().all(|s| s.starts_with("https://graph.microsoft.com/")));
    }
}
