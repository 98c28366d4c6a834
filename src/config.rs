use std::{
    io,
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use garde::Validate;
use serde::Deserialize;

use crate::swagger_ui::{PageConfig, WEBJAR_PATH};

/// Environment variable naming the JSON configuration file.
pub const CONFIG_ENV: &str = "SWAGGER_UI_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] garde::Report),

    #[error("invalid configuration: {route} is mounted by both {first} and {second}")]
    RouteConflict {
        route: String,
        first: &'static str,
        second: &'static str,
    },
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct SwaggerConfig {
    #[serde(flatten)]
    #[garde(dive)]
    pub page: PageConfig,
    #[garde(skip)]
    pub listen: SocketAddr,
    /// Directory of `<version>.json` OpenAPI documents.
    #[garde(skip)]
    pub documents_dir: Option<PathBuf>,
    /// Directory holding an unpacked Swagger UI distribution.
    #[garde(skip)]
    pub assets_dir: Option<PathBuf>,
    /// Listed in the page when no document is loaded.
    #[garde(inner(length(min = 1)))]
    pub versions: Vec<String>,
}

impl Default for SwaggerConfig {
    fn default() -> Self {
        SwaggerConfig {
            page: PageConfig::default(),
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000)),
            documents_dir: None,
            assets_dir: None,
            versions: Vec::new(),
        }
    }
}

impl SwaggerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SwaggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        config.check_routes()?;
        Ok(config)
    }

    /// Rejects settings that would mount two handlers on the same route.
    fn check_routes(&self) -> Result<(), ConfigError> {
        let page = &self.page;
        let ui = page.mount_path(&page.ui_path);
        let documentation = page.mount_path(&page.documentation_path);
        if ui == documentation {
            return Err(ConfigError::RouteConflict {
                route: ui,
                first: "ui_path",
                second: "documentation_path",
            });
        }

        if self.assets_dir.is_some() {
            let assets = page.mount_path(&format!("{WEBJAR_PATH}/{}", page.swagger_version));
            for (name, route) in [("ui_path", ui), ("documentation_path", documentation)] {
                if route == assets || route.starts_with(&format!("{assets}/")) {
                    return Err(ConfigError::RouteConflict {
                        route,
                        first: name,
                        second: "assets_dir",
                    });
                }
            }
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Loads the file named by [`CONFIG_ENV`], or the defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
