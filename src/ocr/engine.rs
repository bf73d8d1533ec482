use image::GrayImage;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

use crate::config::OcrSettings;

/// Tesseract page-segmentation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSegMode {
    /// Assume a single uniform block of text (psm 6)
    Block,
    /// Treat the image as a single text line (psm 7)
    SingleLine,
}

impl PageSegMode {
    pub fn psm(self) -> u8 {
        match self {
            PageSegMode::Block => 6,
            PageSegMode::SingleLine => 7,
        }
    }
}

/// Text recognition backend.
///
/// Recognition never fails from the caller's point of view: a backend that
/// cannot read anything returns an empty string.
pub trait OcrEngine {
    fn recognize(&self, image: &GrayImage, mode: PageSegMode, whitelist: Option<&str>) -> String;
}

/// Runs the tesseract executable on a temporary PNG per call.
#[derive(Clone, Debug)]
pub struct TesseractEngine {
    executable: PathBuf,
    tessdata_dir: Option<PathBuf>,
    language: String,
}

impl TesseractEngine {
    pub fn new(
        executable: PathBuf,
        tessdata_dir: Option<PathBuf>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            executable,
            tessdata_dir,
            language: language.into(),
        }
    }

    /// Builds an engine from config, resolving the executable location.
    pub fn from_settings(settings: &OcrSettings) -> Self {
        Self::new(
            crate::paths::tesseract_path(settings.tesseract_path.as_deref()),
            settings.tessdata_dir.clone(),
            settings.language.clone(),
        )
    }

    pub fn executable(&self) -> &PathBuf {
        &self.executable
    }

    fn build_command(
        &self,
        input: &std::path::Path,
        mode: PageSegMode,
        whitelist: Option<&str>,
    ) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(input)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(mode.psm().to_string());

        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        if let Some(chars) = whitelist.filter(|w| !w.is_empty()) {
            cmd.arg("-c").arg(format!("tessedit_char_whitelist={}", chars));
        }
        cmd
    }

    fn run(
        &self,
        image: &GrayImage,
        mode: PageSegMode,
        whitelist: Option<&str>,
    ) -> Result<String, String> {
        let temp_input = NamedTempFile::with_suffix(".png").map_err(|e| e.to_string())?;
        image.save(temp_input.path()).map_err(|e| e.to_string())?;

        let output = self
            .build_command(temp_input.path(), mode, whitelist)
            .output()
            .map_err(|e| format!("failed to run {}: {}", self.executable.display(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("tesseract failed: {}", stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &GrayImage, mode: PageSegMode, whitelist: Option<&str>) -> String {
        if image.width() == 0 || image.height() == 0 {
            return String::new();
        }

        match self.run(image, mode, whitelist) {
            Ok(text) => {
                log::debug!("OCR psm {} -> {:?}", mode.psm(), text);
                text
            }
            Err(e) => {
                log::warn!("OCR failed, treating as empty: {}", e);
                String::new()
            }
        }
    }
}

impl<E: OcrEngine + ?Sized> OcrEngine for &E {
    fn recognize(&self, image: &GrayImage, mode: PageSegMode, whitelist: Option<&str>) -> String {
        (**self).recognize(image, mode, whitelist)
    }
}
