//! Authorization server endpoint configuration.

use crate::error::{Error, Result};
use url::Url;

/// Authorization server base for the Microsoft identity platform.
const MICROSOFT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// `OAuth2` authorization server configuration.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Provider name, used in log output.
    pub name: String,
    /// Token endpoint URL.
    pub token_url: Url,
    /// Device authorization endpoint URL.
    pub device_auth_url: Url,
    /// Scopes appended to every authorization request. `offline_access`
    /// lives here: without it the server issues no refresh token.
    pub base_scopes: Vec<String>,
}

impl Provider {
    /// Creates a provider from explicit endpoint URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL does not parse.
    pub fn new(
        name: impl Into<String>,
        token_url: impl AsRef<str>,
        device_auth_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            token_url: Url::parse(token_url.as_ref())?,
            device_auth_url: Url::parse(device_auth_url.as_ref())?,
            base_scopes: Vec::new(),
        })
    }

    /// Sets the scopes appended to every authorization request.
    #[must_use]
    pub fn with_base_scopes(mut self, scopes: Vec<String>) -> Self {
        self.base_scopes = scopes;
        self
    }

    /// Microsoft identity platform configuration for the given tenant.
    ///
    /// `tenant` is an Azure AD tenant id, or `common` for multi-tenant and
    /// personal accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant produces an unparseable URL.
    pub fn microsoft(tenant: &str) -> Result<Self> {
        if tenant.is_empty() {
            return Err(Error::InvalidConfig("tenant id is empty".into()));
        }
        Ok(Self::new(
            "Microsoft",
            format!("{MICROSOFT_AUTHORITY}/{tenant}/oauth2/v2.0/token"),
            format!("{MICROSOFT_AUTHORITY}/{tenant}/oauth2/v2.0/devicecode"),
        )?
        .with_base_scopes(vec!["offline_access".to_string()]))
    }

    /// Joins request scopes with the provider's base scopes into the
    /// space-separated form the wire format expects.
    #[must_use]
    pub fn scope_string(&self, scopes: &[String]) -> String {
        let mut all: Vec<&str> = scopes.iter().map(String::as_str).collect();
        for base in &self.base_scopes {
            if !all.contains(&base.as_str()) {
                all.push(base);
            }
        }
        all.join(" ")
    }
}
