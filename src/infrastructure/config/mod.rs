// ============================================================
// CONFIG SERVICE
// ============================================================
// Layered engine configuration: defaults, then an optional TOML
// file, then FORGE_* environment variables (a .env file is honoured)

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use tracing::{debug, info};

use crate::domain::error::Result;
use crate::domain::EngineConfig;

pub const ENV_PREFIX: &str = "FORGE_";
pub const DEFAULT_CONFIG_FILE: &str = "forge.toml";

pub struct ConfigService {
    file: PathBuf,
    use_env: bool,
}

impl Default for ConfigService {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_CONFIG_FILE),
            use_env: true,
        }
    }
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the TOML layer from `path` instead of ./forge.toml
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = path.as_ref().to_path_buf();
        self
    }

    /// Skip the environment layer
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    fn figment(&self) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(EngineConfig::default()))
            .merge(Toml::file(&self.file));
        if self.use_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX));
        }
        figment
    }

    /// Load and validate. A missing TOML file is not an error.
    pub fn load(&self) -> Result<EngineConfig> {
        if self.use_env {
            if let Ok(path) = dotenvy::dotenv() {
                debug!(path = %path.display(), "Loaded .env");
            }
        }

        let config: EngineConfig = self.figment().extract()?;
        config.check()?;

        info!(
            file = %self.file.display(),
            max_file_size = config.max_file_size,
            max_diagnostics = config.max_diagnostics,
            "Engine configuration loaded"
        );
        Ok(config)
    }
}
