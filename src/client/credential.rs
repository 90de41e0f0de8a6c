use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{var} environment variable not set")]
    Missing { var: String },
}

/// Personal access token used for Basic authentication
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the token from `var`. Unset and empty values are both treated as missing.
    pub fn from_env(var: &str) -> Result<Self, CredentialError> {
        match std::env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self(token)),
            _ => Err(CredentialError::Missing {
                var: var.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Authorization` header value: blank user name, token as password
    pub fn basic_auth_header(&self) -> String {
        format!("Basic {}", STANDARD.encode(format!(":{}", self.0)))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} chars>)", self.0.len())
    }
}
