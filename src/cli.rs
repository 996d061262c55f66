use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::*;
use otp_guard::OtpConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to encrypted account database (required for all commands)
    keyfile: Option<PathBuf>,
    /// TOML file with issuer, algorithm, digits, step, window and secret_length
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Command
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new secret for a user and print the enrollment QR code
    Provision {
        /// User id
        #[arg(short, long, value_name = "USER")]
        user: String,
        /// Also write the QR code as SVG to this file
        #[arg(long, value_name = "FILE")]
        svg: Option<PathBuf>,
        /// Print the payload as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Store an existing Base32 secret for a user (prompted for if omitted)
    Import {
        /// User id
        #[arg(short, long, value_name = "USER")]
        user: String,
        /// Base32 secret
        #[arg(short, long, value_name = "SECRET")]
        secret: Option<String>,
    },
    /// Check a code submitted by a user; exits with status 1 when invalid
    Verify {
        /// User id
        #[arg(short, long, value_name = "USER")]
        user: String,
        /// Code from the authenticator app
        #[arg(short, long, value_name = "CODE")]
        code: String,
    },
    /// Print the current code for a user
    Code {
        /// User id
        #[arg(short, long, value_name = "USER")]
        user: String,
    },
    /// Remove a user's secret
    Revoke {
        /// User id
        #[arg(short, long, value_name = "USER")]
        user: String,
    },
}

impl Cli {
    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        init_tracing(cli.verbose);

        let config = match cli.config.as_ref() {
            Some(path) => OtpConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => OtpConfig::default(),
        };

        let command = match &cli.command {
            Some(command) => command,
            None => {
                Cli::command().print_help().ok();
                return Ok(());
            }
        };

        let keyfile = cli
            .keyfile
            .as_ref()
            .ok_or(anyhow!("Key file must be specified"))?;

        match command {
            Commands::Provision { user, svg, json } => {
                provision(keyfile, config, user, svg.as_ref(), *json)
            }
            Commands::Import { user, secret } => {
                import_secret(keyfile, config, user, secret.as_deref())
            }
            Commands::Verify { user, code } => {
                if !verify_code(keyfile, config, user, code)? {
                    process::exit(1);
                }
                Ok(())
            }
            Commands::Code { user } => show_code(keyfile, config, user),
            Commands::Revoke { user } => revoke(keyfile, config, user),
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
