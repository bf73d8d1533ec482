//! JSON export for analysis results.

use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Serializes `value` as pretty-printed JSON.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes `value` to `output_path` as pretty-printed JSON.
///
/// Used for both the compact summary and the full per-frame result.
pub fn export_to_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> Result<()> {
    let json = to_json_string(value)?;

    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    log::info!("JSON saved: {}", output_path.display());
    Ok(())
}
