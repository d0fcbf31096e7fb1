use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub publish: PublishConfig,
    pub serve: ServeConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

#[derive(Debug, Deserialize)]
pub struct PublishConfig {
    /// Base name of the per-docroot index files ("<name>.idx" / "<name>-all.idx").
    #[serde(default = "default_index_name")]
    pub index_name: String,
}

fn default_index_name() -> String {
    "content".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ServeConfig {
    /// Path to the newline-delimited CDN node table.
    pub node_table: String,
    /// Servlet-style context prefix stripped from resolved references.
    #[serde(default)]
    pub context_path: String,
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("STATICPRESS_CONFIG").unwrap_or_else(|_| "config".to_string());

    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(&config_path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
