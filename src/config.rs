// Runtime settings loaded with the 'config' crate

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // Directory holding the saved listing pages
    pub directory: String,
    // Inspect the first record and report per-record skips
    pub debug: bool,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let builder = Config::builder()
            .set_default("directory", "scraped_vehicles")?
            .set_default("debug", false)?
            // Optional config.toml next to the binary's working directory
            .add_source(File::with_name("config").required(false))
            // YAD2_DIRECTORY, YAD2_DEBUG
            .add_source(Environment::with_prefix("YAD2"));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    // Command line values win over file and environment
    pub fn with_overrides(mut self, directory: Option<String>, debug: bool) -> Self {
        if let Some(directory) = directory {
            self.directory = directory;
        }
        self.debug |= debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Settings {
        Settings {
            directory: "scraped_vehicles".to_string(),
            debug: false,
        }
    }

    #[test]
    fn cli_overrides_directory_and_enables_debug() {
        let settings = base().with_overrides(Some("mazda_pages".to_string()), true);
        assert_eq!(settings.directory, "mazda_pages");
        assert!(settings.debug);
    }

    #[test]
    fn absent_overrides_keep_settings() {
        let settings = Settings { debug: true, ..base() }.with_overrides(None, false);
        assert_eq!(settings.directory, "scraped_vehicles");
        assert!(settings.debug);
    }
}
