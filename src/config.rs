//! Command line and environment configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::db::Database;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5555;

#[derive(Debug, Parser)]
#[command(name = "mission-control")]
#[command(about = "REST backend for planets, scientists, and missions")]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, global = true, env = "MISSION_CONTROL_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port for the HTTP API
    #[arg(short, long, global = true, env = "MISSION_CONTROL_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// SQLite database file. Defaults to the platform data directory.
    #[arg(long, global = true, env = "MISSION_CONTROL_DATABASE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Seed the database with sample data if it is empty
        #[arg(long)]
        seed: bool,
    },
    /// Replace all data with the sample data set
    Seed,
}

impl Cli {
    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
        }
    }

    /// The subcommand to run; no subcommand means `serve`.
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve { seed: false })
    }
}

/// Resolved settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Database::default_path(),
        }
    }

    /// Opens the configured database and brings its schema up to date.
    pub fn open_database(&self) -> Result<Database> {
        let db = Database::open(self.database_path()?)?;
        db.migrate()?;
        Ok(db)
    }
}
