//! Gateway configuration. Precedence: `FRAMEBOARD__*` env > `FRAMEBOARD_CONFIG`
//! file (default `config/gateway.toml`) > built-in defaults.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Interface to bind.
    pub bind: IpAddr,
    /// HTTP port.
    pub port: u16,
    /// JSON file holding the frame layout document.
    pub data_file: PathBuf,
    /// Directory scanned for carousel images.
    pub image_dir: PathBuf,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("FRAMEBOARD_CONFIG").unwrap_or_else(|_| "config/gateway.toml".to_string());
        Self::load_from(Path::new(&config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("bind", "127.0.0.1")?
            .set_default("port", 3000_i64)?
            .set_default("data_file", "./frames.json")?
            .set_default("image_dir", ".")?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        builder
            .add_source(config::Environment::with_prefix("FRAMEBOARD").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
