//! tsbuild CLI - Thin Build Orchestrator for TypeScript Projects
//!
//! Transpiles sources with esbuild and copies assets in one concurrent pass.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tsbuild::config::{load_user_config, CliArgs};
use tsbuild::core::{derive_build_metadata, BuildEngine};
use tsbuild::error::Result;
use tsbuild::progress::BuildReporter;
use tsbuild::tsconfig::TsConfig;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    // Parse CLI arguments
    let args = CliArgs::parse();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let config = load_user_config(&args)?;

    let cwd = std::env::current_dir()?;
    let tsconfig = TsConfig::load(&cwd, config.tsconfig_file())?;
    let metadata = derive_build_metadata(&config, &tsconfig);

    let engine = BuildEngine::new(metadata)
        .with_clean(config.clean)
        .with_reporter(BuildReporter::from_silent(config.silent));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(engine.execute())?;

    Ok(())
}
