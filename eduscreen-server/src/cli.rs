use clap::Parser;
use std::path::PathBuf;

const HELP_EPILOG: &str = r#"Options can also be provided via environment variables:
  CONFIG_PATH (default: ./config.yaml)
  DB_PATH     (default: data/app.db)
  PORT        (default: 5000 or config.listen_port)
"#;

#[derive(Debug, Parser)]
#[command(
    name = "eduscreen-server",
    version,
    about = "Learning-screening server",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(long)]
    pub config_path: Option<PathBuf>,
    /// Path to the SQLite database file
    #[arg(long)]
    pub db_path: Option<String>,
    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,
}
