//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

/// Command line interface of the `ctfai` server
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ctfai")]
#[command(about = "CTF AI provider orchestration service")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind, overriding `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,
}
