pub mod engine;
pub mod preprocess;
pub mod setup;

pub use engine::{OcrEngine, PageSegMode, TesseractEngine};
pub use preprocess::{prepare_for_ocr, to_grayscale, Binarize};
pub use setup::ensure_tesseract;

use image::RgbImage;

/// How one crop is turned into text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recognition {
    pub binarize: Binarize,
    pub scale: u32,
    pub mode: PageSegMode,
    pub whitelist: Option<&'static str>,
}

/// Crop → preprocess → OCR. Returns trimmed text, empty when nothing is read.
pub fn recognize_crop<E: OcrEngine + ?Sized>(
    engine: &E,
    crop: &RgbImage,
    recognition: &Recognition,
) -> String {
    if crop.width() == 0 || crop.height() == 0 {
        return String::new();
    }
    let binary = prepare_for_ocr(crop, recognition.binarize, recognition.scale);
    engine
        .recognize(&binary, recognition.mode, recognition.whitelist)
        .trim()
        .to_string()
}
