use crate::application_port::{SigningKey, TokenKeys};
use anyhow::{Result, bail};
use std::fmt;

pub const ACCESS_TOKEN_SECRET: &str = "ACCESS_TOKEN_SECRET";
pub const REFRESH_TOKEN_SECRET: &str = "REFRESH_TOKEN_SECRET";

/// Signing secrets, read once at startup. Absence is fatal.
#[derive(Clone)]
pub struct Secrets {
    access_token_secret: String,
    refresh_token_secret: String,
}

impl Secrets {
    pub fn new(access_token_secret: impl Into<String>, refresh_token_secret: impl Into<String>) -> Result<Self> {
        let access_token_secret = access_token_secret.into();
        let refresh_token_secret = refresh_token_secret.into();
        if access_token_secret == refresh_token_secret {
            bail!("{ACCESS_TOKEN_SECRET} and {REFRESH_TOKEN_SECRET} must differ");
        }
        Ok(Self {
            access_token_secret,
            refresh_token_secret,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let access = read(ACCESS_TOKEN_SECRET);
        let refresh = read(REFRESH_TOKEN_SECRET);

        match (access, refresh) {
            (Some(access), Some(refresh)) => Self::new(access, refresh),
            (access, refresh) => {
                let missing: Vec<&str> = [
                    (ACCESS_TOKEN_SECRET, access.is_none()),
                    (REFRESH_TOKEN_SECRET, refresh.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect();
                bail!(
                    "missing required environment variables: {}",
                    missing.join(", ")
                )
            }
        }
    }

    pub fn token_keys(&self) -> TokenKeys {
        TokenKeys {
            access: SigningKey::new(self.access_token_secret.as_bytes()),
            refresh: SigningKey::new(self.refresh_token_secret.as_bytes()),
        }
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secrets(..)")
    }
}
