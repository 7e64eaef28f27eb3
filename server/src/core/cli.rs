use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::LogFormat;
use super::constants::{
    ENV_ADMIN_JWT_SECRET, ENV_CONFIG, ENV_DATABASE_URL, ENV_HOST, ENV_JWT_SECRET, ENV_LOG_FORMAT,
    ENV_PORT,
};

#[derive(Parser)]
#[command(name = "nestmate")]
#[command(version, about = "Roommate marketplace search service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// SQLite connection URL (e.g. sqlite://nestmate.db)
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,

    /// Secret used to verify user tokens
    #[arg(long, global = true, env = ENV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Secret used to verify admin tokens (defaults to the user secret)
    #[arg(long, global = true, env = ENV_ADMIN_JWT_SECRET, hide_env_values = true)]
    pub admin_jwt_secret: Option<String>,

    /// Log output format (compact or json)
    #[arg(long, global = true, env = ENV_LOG_FORMAT, value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,
}

/// Parse log format from CLI/env string
fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    match s.to_lowercase().as_str() {
        "compact" | "text" => Ok(LogFormat::Compact),
        "json" => Ok(LogFormat::Json),
        _ => Err(format!(
            "Invalid log format '{}'. Valid options: compact, json",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Mint a development token signed with the configured secret
    Token {
        /// Subject user id (UUID)
        #[arg(long)]
        user_id: uuid::Uuid,
        /// Email claim
        #[arg(long)]
        email: Option<String>,
        /// Mark the token as an admin token
        #[arg(long)]
        admin: bool,
        /// Token lifetime in seconds
        #[arg(long)]
        ttl_secs: Option<u64>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub admin_jwt_secret: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        database_url: cli.database_url,
        jwt_secret: cli.jwt_secret,
        admin_jwt_secret: cli.admin_jwt_secret,
        log_format: cli.log_format,
    };
    (config, cli.command)
}
