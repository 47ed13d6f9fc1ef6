// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — CLI
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `seismic` — run a FOM or ROM sampling sweep from a JSON config.

use clap::Parser;
use seismic_core::problem::Problem;
use seismic_types::config::SimConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "seismic",
    version,
    about = "Elastic shear-wave simulation: full-order and reduced-order sampling sweeps"
)]
struct Cli {
    /// Path to the JSON configuration file.
    config: String,

    /// Validate the configuration and assemble the problem, then exit
    /// without time stepping.
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> seismic_types::error::SeismicResult<()> {
    let config = SimConfig::from_file(&cli.config)?;
    info!(run_name = %config.run_name, config = %cli.config, "configuration loaded");

    let mut problem = Problem::from_config(config)?;
    if cli.dry_run {
        info!("dry run: problem assembled, skipping time stepping");
        return Ok(());
    }
    problem.run()
}
