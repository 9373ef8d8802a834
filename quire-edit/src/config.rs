//! Admin configuration loaded with Figment
//!
//! Sources are merged in precedence order (later overrides earlier):
//! 1. Built-in defaults
//! 2. An optional config file (TOML, YAML or JSON, chosen by extension)
//! 3. Environment variables prefixed `QUIRE_`, nested keys split on `__`
//!    (`QUIRE_SERVER_URL`, `QUIRE_ROUTES__ADMIN`)

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "QUIRE_";

/// Route prefixes of the admin UI and the REST API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Routes {
    #[serde(default = "default_admin_route")]
    pub admin: String,
    #[serde(default = "default_api_route")]
    pub api: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            admin: default_admin_route(),
            api: default_api_route(),
        }
    }
}

fn default_admin_route() -> String {
    "/admin".to_string()
}

fn default_api_route() -> String {
    "/api".to_string()
}

fn default_server_url() -> String {
    "http://localhost:3000".to_string()
}

/// Where the admin lives and which server it talks to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub routes: Routes,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            routes: Routes::default(),
        }
    }
}

impl AdminConfig {
    /// Config with an explicit server URL and default routes.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            routes: Routes::default(),
        }
        .normalized()
    }

    /// Load from defaults, an optional file, and the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config: AdminConfig = Self::figment(file)?.extract()?;
        let config = config.normalized();
        debug!(
            server_url = %config.server_url,
            admin = %config.routes.admin,
            api = %config.routes.api,
            "loaded admin configuration"
        );
        Ok(config)
    }

    fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(AdminConfig::default()));

        if let Some(path) = file {
            if !path.exists() {
                return Err(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))
                .into());
            }
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => {
                    return Err(figment::Error::from(format!(
                        "unsupported config format: {}",
                        path.display()
                    ))
                    .into())
                }
            };
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Strip trailing slashes from the server URL and make routes absolute.
    fn normalized(mut self) -> Self {
        self.server_url = self.server_url.trim_end_matches('/').to_string();
        self.routes.admin = normalize_route(&self.routes.admin);
        self.routes.api = normalize_route(&self.routes.api);
        self
    }
}

fn normalize_route(route: &str) -> String {
    let trimmed = route.trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
