//! `ctfai` server binary

// Force-link ctfai-providers to ensure linkme adapter registrations are included
extern crate ctfai_providers;

use clap::Parser;
use ctfai_server::{Cli, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_server(Cli::parse()).await
}
