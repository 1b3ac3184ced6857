//! Typed command bridge between the collection views and the local backend.
//!
//! Call sites build a command record from `anishelf_core::commands`, hand it to
//! a [`Bridge`] and get back the declared result type or a [`BridgeError`].

pub mod bindings;
pub mod bridge;
pub mod error;
pub mod library;
pub mod logging;
pub mod transport;

pub use bindings::export_ts_bindings;
pub use bridge::{Bridge, unwrap_response};
pub use error::{BridgeError, DispatchError, FailureKind};
pub use library::Library;
pub use transport::{Router, Traced, Transport, TransportError};

use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "ANISHELF_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";

fn workspace_root_from_cwd() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    if cwd.file_name().and_then(|name| name.to_str()) == Some("ui") {
        cwd.parent().map(Path::to_path_buf)
    } else {
        Some(cwd)
    }
}

/// Location of the settings file, honoring `ANISHELF_CONFIG_PATH`.
pub fn app_config_path() -> PathBuf {
    resolve_config_path(
        std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from),
        workspace_root_from_cwd(),
    )
}

fn resolve_config_path(configured: Option<PathBuf>, workspace_root: Option<PathBuf>) -> PathBuf {
    if let Some(candidate) = configured {
        return match workspace_root {
            Some(root) if !candidate.is_absolute() => root.join(candidate),
            _ => candidate,
        };
    }

    match workspace_root {
        Some(root) => root.join(DEFAULT_CONFIG_PATH),
        None => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}
