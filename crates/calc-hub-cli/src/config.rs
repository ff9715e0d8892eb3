use serde::Deserialize;
use std::path::PathBuf;

use crate::Cli;

/// Environment variable prefix; `CALCHUB_STORE_DIR` sets the store directory.
pub const ENV_PREFIX: &str = "CALCHUB";

const DEFAULT_STORE_DIR: &str = ".calchub";

/// Settings resolved once from flags and environment.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub store_dir: PathBuf,
    /// Pre-fill missing fields from saved parameters.
    pub use_saved: bool,
    /// Persist the parameters after a successful calculation.
    pub save: bool,
    pub log_level: &'static str,
}

/// Values taken from the process environment.
#[derive(Debug, Default, Deserialize)]
struct EnvSettings {
    /// `CALCHUB_STORE_DIR`
    store_dir: Option<PathBuf>,
}

/// The user's home directory, from `HOME`.
#[derive(Debug, Default, Deserialize)]
struct HomeSettings {
    home: Option<PathBuf>,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        Self::resolve(cli, None)
    }

    /// `vars` replaces the process environment when given.
    fn resolve(cli: &Cli, vars: Option<config::Map<String, String>>) -> Result<Self, config::ConfigError> {
        let env: EnvSettings = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(vars.clone()))
            .build()?
            .try_deserialize()?;

        let store_dir = match cli.store_dir.as_deref() {
            Some(dir) => PathBuf::from(dir),
            None => match env.store_dir.filter(|d| !d.as_os_str().is_empty()) {
                Some(dir) => dir,
                None => home_dir(vars)?.join(DEFAULT_STORE_DIR),
            },
        };

        Ok(Self {
            store_dir,
            use_saved: !cli.no_saved,
            save: cli.save,
            log_level: log_level(cli.verbose),
        })
    }
}

fn home_dir(vars: Option<config::Map<String, String>>) -> Result<PathBuf, config::ConfigError> {
    // Unprefixed source; every key but `home` is ignored.
    let settings: HomeSettings = config::Config::builder()
        .add_source(config::Environment::default().source(vars))
        .build()?
        .try_deserialize()?;
    Ok(settings.home.unwrap_or_else(|| PathBuf::from(".")))
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
