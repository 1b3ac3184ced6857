use anishelf::app_config_path;
use anishelf::logging::init_tracing;
use anishelf_core::config::load_config;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    let config = load_config(&app_config_path());
    init_tracing(&config);

    let out_dir = Path::new("ui/src/generated");
    anishelf::export_ts_bindings(out_dir).context("failed to export TS bindings")?;
    info!(path = %out_dir.display(), "Exported TS bindings");
    Ok(())
}
