mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use retri_engines::StandardPipeline;
use retri_pipeline::PipelineConfig;
use retri_sweep::{FileCatalogProvider, QueryCatalogProvider, ResultStore, Sweeper};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let modules = FileCatalogProvider
        .load(&cli.search_modules)
        .context("loading search modules")?;
    let store = ResultStore::load(&cli.save_path).context("loading result store")?;
    info!(
        "loaded {} prior result(s) from {}",
        store.len(),
        cli.save_path.display()
    );

    let pipeline = StandardPipeline::new();
    let mut sweeper = Sweeper::new(modules, PipelineConfig::default(), store, &pipeline)?;
    let stats = sweeper.run(&cli.fea_dir).context("running sweep")?;

    info!(
        "sweep finished: {} executed, {} skipped, {} total result(s) in {}",
        stats.executed,
        stats.skipped,
        sweeper.store().len(),
        cli.save_path.display()
    );
    Ok(())
}
