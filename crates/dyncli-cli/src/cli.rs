use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dyn-cli-utils")]
#[command(about = "CLI utils for the Dynect API")]
#[command(long_about = "Captures common tasks associated with configuration of the Dynect DNS API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default is $HOME/.dyn-cli.{toml,yaml,json})
    #[arg(long, global = true, env = "DYN_CONFIG")]
    pub config: Option<PathBuf>,

    /// The Dynect API username
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// The Dynect API password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// The Dynect API account [default: financialtimes]
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// The log level to use (trace, debug, info, warn, error) [default: info]
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Base URL of the Dynect REST API [default: https://api.dynect.net/REST/]
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commands relating to Global Server Load Balancing service (GSLB) services
    #[command(long_about = "gslb requires a subcommand, e.g. `dyn-cli-utils gslb update-pools`.")]
    Gslb(GslbArgs),
    /// Generate markdown documentation for every command
    GenerateDocs(GenerateDocsArgs),
}

#[derive(clap::Args)]
pub struct GslbArgs {
    #[command(subcommand)]
    pub command: GslbCommands,
}

#[derive(Subcommand)]
pub enum GslbCommands {
    /// Update a GSLB service pools
    #[command(
        long_about = "Updates Global Server Load Balancing service pools across all regions. \
                      Only pools which match the given label-pattern regular expression are updated."
    )]
    UpdatePools(UpdatePoolsArgs),
}

#[derive(clap::Args)]
pub struct UpdatePoolsArgs {
    /// The full DNS name to edit the GSLB region for [default: prometheus.in.ft.com]
    #[arg(long)]
    pub fqdn: Option<String>,

    /// The DNS zone the GSLB service lives in [default: ft.com]
    #[arg(long)]
    pub zone: Option<String>,

    /// A regex matched against the whole pool entry label in every region [default: eu-[0-9]+]
    #[arg(long)]
    pub label_pattern: Option<String>,

    /// The serve_mode to set all matching pools to [default: obey]
    #[arg(long, value_parser = ["always", "obey", "remove", "no"])]
    pub serve_mode: Option<String>,

    /// Whether to wait for the GSLB TTL to return [default: true]
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub wait: Option<bool>,

    /// Region updates allowed in flight at once [default: 1]
    #[arg(long)]
    pub concurrency_limit: Option<usize>,

    /// Seconds to wait for all region updates to return [default: 20]
    #[arg(long)]
    pub update_timeout_secs: Option<u64>,
}

#[derive(clap::Args)]
pub struct GenerateDocsArgs {
    /// Directory to write the markdown files to
    #[arg(long, default_value = "docs")]
    pub dir: PathBuf,
}

impl Cli {
    /// Arguments of the `gslb update-pools` command, if that is the command
    pub fn update_pools_args(&self) -> Option<&UpdatePoolsArgs> {
        match &self.command {
            Commands::Gslb(GslbArgs {
                command: GslbCommands::UpdatePools(args),
            }) => Some(args),
            _ => None,
        }
    }
}
