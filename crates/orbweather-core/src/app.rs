use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::Config;

/// Application lifecycle: owns the validated configuration.
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Load and validate configuration, then build the application.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let (config, validation) = Config::load_validated(config_path)?;
        tracing::info!(
            warnings = validation.warnings.len(),
            "Configuration loaded"
        );

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Build an application around an already-loaded configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_config_keeps_values() {
        let mut config = Config::default();
        config.dashboard.default_city = "Medan".into();
        let mut app = App::with_config(config);
        assert_eq!(app.config().dashboard.default_city, "Medan");
        assert!(app.shutdown().is_ok());
    }
}
