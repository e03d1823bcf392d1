//! Export command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use haul_core::export::export;
use haul_core::ExportFormat;

use super::{load_analysis, LoadOptions};

pub fn cmd_export(
    files: &[PathBuf],
    options: &LoadOptions,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let (analysis, _) = load_analysis(files, options)?;
    let content = export(&analysis, format).context("Failed to export analysis")?;

    if let Some(path) = output {
        std::fs::write(path, &content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("✅ Exported {} to {}", format, path.display());
    } else {
        print!("{}", content);
        if format == ExportFormat::Json {
            println!();
        }
    }

    Ok(())
}
