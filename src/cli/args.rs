//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lbcerts - Manage load balancer TLS certificates.
#[derive(Debug, Parser)]
#[command(name = "lbcerts")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to settings file (overrides $LBCERTS_CONFIG and ./lbcerts.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Tenant to act as (overrides controller.tenant)
    #[arg(short, long, global = true)]
    pub tenant: Option<String>,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List certificates visible to the tenant
    List(ListArgs),

    /// Upload a new certificate
    Add(AddArgs),

    /// Attach certificates to a pool and its virtual IP
    Associate(AssociateArgs),

    /// Show the certificates a pool and virtual IP can use
    Choices(ChoicesArgs),

    /// Print the session handle for the analytics frame
    Analytics(AnalyticsArgs),

    /// Copy the analytics template into the template directory
    InstallAsset,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AddArgs {
    /// Certificate name
    #[arg(long)]
    pub name: String,

    /// Private key as text
    #[arg(long, conflicts_with = "key_file")]
    pub key: Option<String>,

    /// Read the private key from a file
    #[arg(long, value_name = "PATH")]
    pub key_file: Option<PathBuf>,

    /// Certificate as text
    #[arg(long, conflicts_with = "cert_file")]
    pub cert: Option<String>,

    /// Read the certificate from a file
    #[arg(long, value_name = "PATH")]
    pub cert_file: Option<PathBuf>,

    /// Passphrase protecting the private key
    #[arg(long, env = "LBCERTS_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,
}

/// Arguments for the `associate` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AssociateArgs {
    /// Pool identifier
    #[arg(long)]
    pub pool: String,

    /// Virtual IP identifier
    #[arg(long)]
    pub vip: String,

    /// Certificate for the pool (defaults to the current one)
    #[arg(long)]
    pub pool_cert: Option<String>,

    /// Certificate for the virtual IP (defaults to the current one)
    #[arg(long)]
    pub vip_cert: Option<String>,
}

/// Arguments for the `choices` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ChoicesArgs {
    /// Pool identifier
    #[arg(long)]
    pub pool: String,

    /// Virtual IP identifier
    #[arg(long)]
    pub vip: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `analytics` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AnalyticsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["lbcerts", "list", "--tenant", "demo", "--config", "x.yml"]);
        assert_eq!(cli.tenant.as_deref(), Some("demo"));
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn key_text_and_file_conflict() {
        let result = Cli::try_parse_from([
            "lbcerts", "add", "--name", "web", "--key", "K", "--key-file", "k.pem",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn associate_certs_are_optional() {
        let cli = Cli::parse_from(["lbcerts", "associate", "--pool", "P", "--vip", "V"]);
        match cli.command {
            Commands::Associate(args) => {
                assert_eq!(args.pool, "P");
                assert!(args.pool_cert.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn install_asset_takes_no_arguments() {
        let cli = Cli::parse_from(["lbcerts", "install-asset"]);
        assert!(matches!(cli.command, Commands::InstallAsset));
    }
}
