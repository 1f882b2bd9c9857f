use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Feedback, Storage};

/// Loads the application configuration from the `meridian.toml` file.
///
/// The file is optional: every field carries a sensible default, so a missing
/// or partially-specified file still yields a working configuration.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `meridian.toml`.
        .add_source(config::File::with_name("meridian").required(false))
        // Environment variables win over the file, e.g. MERIDIAN_STORAGE__LEDGER_PATH.
        .add_source(config::Environment::with_prefix("MERIDIAN").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct.
    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}
