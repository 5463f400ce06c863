use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::BootstrapError;

/// Optional file layered between the defaults and the environment.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Driver connection string, seed lists included; parsed by the driver in `connect`.
    /// `mongodb` is the compose service name.
    pub mongodb_url: String,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub loglevel: String,
    /// Startup ping attempts while the server is still coming up.
    pub connect_retries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongodb_url: "mongodb://mongodb:27017".to_string(),
            loglevel: "info".to_string(),
            connect_retries: 5,
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `MONGODB_URL` / `LOGLEVEL` / `CONNECT_RETRIES`.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::raw().only(&["mongodb_url", "loglevel", "connect_retries"]))
    }

    pub fn load() -> Result<Self, BootstrapError> {
        Ok(Self::figment().extract()?)
    }

    /// The connection string with any password masked, safe to log.
    pub fn redacted_url(&self) -> String {
        redact_password(&self.mongodb_url)
    }
}

/// Masks the text between the user's `:` and the last `@` of the authority.
fn redact_password(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    let Some((userinfo, hosts)) = authority.rsplit_once('@') else {
        return uri.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{hosts}{tail}"),
        None => uri.to_string(),
    }
}
