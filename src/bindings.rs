//! TypeScript declarations for the UI, generated from the Rust records.

use anishelf_core::config::{CardSize, SortOrder, ThemeMode};
use anishelf_core::{AiringStatus, Anime, BackendFault, Collection, ImportReport, registry};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use ts_rs::TS;

pub const COMMANDS_MANIFEST: &str = "commands.json";

const INDEX_CONTENT: &str = r#"export type { Collection } from "./Collection";
export type { AiringStatus } from "./AiringStatus";
export type { Anime } from "./Anime";
export type { ImportReport } from "./ImportReport";
export type { BackendFault } from "./BackendFault";
export type { ThemeMode } from "./ThemeMode";
export type { CardSize } from "./CardSize";
export type { SortOrder } from "./SortOrder";

export type TaggedResult<T, E> =
  | { status: "ok"; data: T }
  | { status: "error"; error: E };
"#;

/// Rewrites `out_dir` with the record declarations, an `index.ts` and the
/// command manifest consumed by the UI's dynamic dispatch path.
pub fn export_ts_bindings(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    remove_stale_declarations(out_dir)?;

    Collection::export_all_to(out_dir)?;
    AiringStatus::export_all_to(out_dir)?;
    Anime::export_all_to(out_dir)?;
    ImportReport::export_all_to(out_dir)?;
    BackendFault::export_all_to(out_dir)?;
    ThemeMode::export_all_to(out_dir)?;
    CardSize::export_all_to(out_dir)?;
    SortOrder::export_all_to(out_dir)?;

    write_file(&out_dir.join("index.ts"), INDEX_CONTENT)?;
    let manifest = serde_json::to_string_pretty(&*registry())
        .context("serializing the command manifest")?;
    write_file(&out_dir.join(COMMANDS_MANIFEST), &manifest)
}

fn remove_stale_declarations(out_dir: &Path) -> Result<()> {
    let entries =
        fs::read_dir(out_dir).with_context(|| format!("listing {}", out_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        }
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
