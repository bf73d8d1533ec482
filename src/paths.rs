//! Executable-relative paths and external tool resolution.
//!
//! Tools (ffmpeg, ffprobe, tesseract) resolve in this order:
//! 1) environment variable override (WR_FFMPEG_PATH, ...)
//! 2) configured path (tesseract only)
//! 3) sidecar next to the executable, or in its `bin/` subdirectory
//! 4) PATH fallback

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::config::CONFIG_FILE_NAME;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the per-user config path: `<config_dir>/wr-analyzer/config.json`
pub fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wr-analyzer").join("config.json"))
}

/// Config files to try, most specific first.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![get_exe_dir().join(CONFIG_FILE_NAME)];
    if let Some(user) = get_user_config_path() {
        candidates.push(user);
    }
    candidates
}

/// Resolves a tool from an env override, an explicit configured path, a
/// sidecar in `exe_dir` (or `exe_dir/bin`), then the bare name for PATH lookup.
fn resolve_tool_in(
    env_key: &str,
    env_value: Option<String>,
    configured: Option<&Path>,
    default_name: &str,
    exe_dir: &Path,
) -> PathBuf {
    if let Some(v) = env_value {
        let p = PathBuf::from(&v);
        if p.exists() {
            return p;
        }
        log::warn!("{} points to missing file {}, ignoring", env_key, v);
    }

    if let Some(p) = configured {
        return p.to_path_buf();
    }

    let mut filename = default_name.to_string();
    if cfg!(windows) && !filename.to_lowercase().ends_with(".exe") {
        filename.push_str(".exe");
    }

    for candidate in [exe_dir.join(&filename), exe_dir.join("bin").join(&filename)] {
        if candidate.exists() {
            return candidate;
        }
    }

    PathBuf::from(default_name)
}

fn resolve_tool(env_key: &str, configured: Option<&Path>, default_name: &str) -> PathBuf {
    resolve_tool_in(env_key, env::var(env_key).ok(), configured, default_name, get_exe_dir())
}

/// Path to the ffprobe binary
pub fn ffprobe_path() -> PathBuf {
    resolve_tool("WR_FFPROBE_PATH", None, "ffprobe")
}

/// Path to the ffmpeg binary
pub fn ffmpeg_path() -> PathBuf {
    resolve_tool("WR_FFMPEG_PATH", None, "ffmpeg")
}

/// Path to the tesseract binary. `WR_TESSERACT_PATH` wins over the
/// configured path, which wins over sidecars and PATH.
pub fn tesseract_path(configured: Option<&Path>) -> PathBuf {
    resolve_tool("WR_TESSERACT_PATH", configured, "tesseract")
}
