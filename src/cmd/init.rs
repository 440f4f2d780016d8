use crate::data::{AppSettings, EventData, Persistable};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory {}", dir.display()))?;
    run_in_dir(&dir)?;
    println!("Data files initialized in {}", dir.display());
    Ok(())
}

/// Writes the default data files into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    write_config(dir)?;
    write_events(dir)?;
    Ok(())
}

fn write_config(dir: &Path) -> Result<()> {
    AppSettings::default().save_to(dir)?;
    tracing::info!(dir = %dir.display(), "wrote default config.yaml");
    Ok(())
}

/// Never clobbers events that already exist.
fn write_events(dir: &Path) -> Result<()> {
    let path = dir.join(EventData::filename());
    if path.exists() {
        tracing::info!(path = %path.display(), "events file already present, leaving it alone");
        return Ok(());
    }
    EventData::default().save_to(dir)?;
    tracing::info!(path = %path.display(), "wrote empty events file");
    Ok(())
}
