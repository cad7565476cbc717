use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use dyncli_gslb::{ReconcileSettings, ServeMode};
use serde::Deserialize;

use crate::cli::Cli;
use crate::client::DEFAULT_API_URL;

pub const ENV_PREFIX: &str = "DYN";
pub const DEFAULT_CONFIG_NAME: &str = ".dyn-cli";

/// Settings merged from defaults, config file, `DYN_*` environment and flags
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub username: Option<String>,
    pub password: Option<String>,
    pub account: String,
    pub log_level: String,
    pub api_url: String,
    pub zone: String,
    pub fqdn: String,
    pub label_pattern: String,
    pub serve_mode: String,
    pub wait: bool,
    pub concurrency_limit: usize,
    pub update_timeout_secs: u64,
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        self.serve_mode()?;
        if self.concurrency_limit == 0 {
            return Err("concurrency_limit must be > 0".into());
        }
        if self.update_timeout_secs == 0 {
            return Err("update_timeout_secs must be > 0".into());
        }
        if self.api_url.is_empty() {
            return Err("api_url must not be empty".into());
        }
        Ok(())
    }

    pub fn serve_mode(&self) -> Result<ServeMode, String> {
        self.serve_mode.parse()
    }

    /// Username and password, or an error naming every missing one
    pub fn credentials(&self) -> Result<(&str, &str), String> {
        let username = self.username.as_deref().filter(|s| !s.is_empty());
        let password = self.password.as_deref().filter(|s| !s.is_empty());
        match (username, password) {
            (Some(u), Some(p)) => Ok((u, p)),
            _ => {
                let missing: Vec<&str> = [("username", username), ("password", password)]
                    .into_iter()
                    .filter(|(_, v)| v.is_none())
                    .map(|(k, _)| k)
                    .collect();
                Err(format!("'{}' flags are required", missing.join(", ")))
            }
        }
    }

    pub fn reconcile_settings(&self) -> ReconcileSettings {
        ReconcileSettings {
            concurrency_limit: self.concurrency_limit,
            deadline: Duration::from_secs(self.update_timeout_secs),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_NAME))
}

fn with_defaults(builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>> {
    Ok(builder
        .set_default("account", "financialtimes")?
        .set_default("log_level", "info")?
        .set_default("api_url", DEFAULT_API_URL)?
        .set_default("zone", "ft.com")?
        .set_default("fqdn", "prometheus.in.ft.com")?
        .set_default("label_pattern", "eu-[0-9]+")?
        .set_default("serve_mode", "obey")?
        .set_default("wait", true)?
        .set_default("concurrency_limit", 1_u64)?
        .set_default("update_timeout_secs", 20_u64)?)
}

fn with_flags(builder: ConfigBuilder<DefaultState>, cli: &Cli) -> Result<ConfigBuilder<DefaultState>> {
    let mut builder = builder
        .set_override_option("username", cli.username.clone())?
        .set_override_option("password", cli.password.clone())?
        .set_override_option("account", cli.account.clone())?
        .set_override_option("log_level", cli.log_level.clone())?
        .set_override_option("api_url", cli.api_url.clone())?;

    if let Some(args) = cli.update_pools_args() {
        builder = builder
            .set_override_option("fqdn", args.fqdn.clone())?
            .set_override_option("zone", args.zone.clone())?
            .set_override_option("label_pattern", args.label_pattern.clone())?
            .set_override_option("serve_mode", args.serve_mode.clone())?
            .set_override_option("wait", args.wait)?
            .set_override_option("concurrency_limit", args.concurrency_limit.map(|n| n as u64))?
            .set_override_option("update_timeout_secs", args.update_timeout_secs)?;
    }
    Ok(builder)
}

/// Resolve settings. Precedence, lowest first: defaults, config file,
/// `DYN_*` environment variables, command-line flags.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut builder = with_defaults(Config::builder())?;

    builder = match &cli.config {
        Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
        None => match default_config_path() {
            Some(path) => builder.add_source(File::from(path).required(false)),
            None => builder,
        },
    };

    // e.g. DYN_USERNAME, DYN_LABEL_PATTERN
    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
    builder = with_flags(builder, cli)?;

    let settings: Settings = builder
        .build()
        .context("config build error")?
        .try_deserialize()
        .context("config deserialize error")?;
    settings.validate().map_err(anyhow::Error::msg)?;
    Ok(settings)
}
