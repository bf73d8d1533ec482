use std::path::Path;
use std::process::Command;

use crate::error::{AnalyzerError, Result};

/// Checks that the tesseract executable runs and returns its version line.
pub fn ensure_tesseract(executable: &Path) -> Result<String> {
    let output = Command::new(executable)
        .arg("--version")
        .output()
        .map_err(|e| {
            AnalyzerError::Config(format!(
                "tesseract not runnable at {}: {}. Install Tesseract-OCR, add it to PATH \
                 or set WR_TESSERACT_PATH",
                executable.display(),
                e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AnalyzerError::Config(format!(
            "tesseract --version failed: {}",
            stderr.trim()
        )));
    }

    // Older builds print the version banner on stderr.
    let banner = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).to_string()
    };
    let version = banner.lines().next().unwrap_or("tesseract").trim().to_string();
    log::info!("Tesseract found at {}: {}", executable.display(), version);
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tesseract_is_config_error() {
        let result = ensure_tesseract(Path::new("/nonexistent/dir/tesseract"));
        assert!(matches!(result, Err(AnalyzerError::Config(_))));
    }
}
