//! Local recognition engine — the bundled OCR models behind `PageRecognizer`.
//!
//! Detection and reading happen inside `ocr-rs`; this adapter handles the
//! configuration surface around it: detector geometry (scale/margin),
//! reading-order line clustering, and the lexicon constraint in constrained
//! mode.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use ocr_rs::OcrEngine;

use crate::page::{BoundingBox, PageResult, RecognizedLine, RecognizedWord};

use super::{DecodingMode, PageRecognizer, RecognitionConfig, RecognitionError};

/// Words whose vertical offset from a line's first word stays within this
/// many pixels belong to the same line.
const LINE_CLUSTER_THRESHOLD_PX: i32 = 20;

/// Detection model filename (shared across recognition models).
const DET_MODEL: &str = "PP-OCRv5_mobile_det.mnn";
/// Handwriting-capable English recognition model + its charset.
const REC_MODEL: &str = "en_PP-OCRv5_mobile_rec_infer.mnn";
const CHARSET: &str = "ppocr_keys_en.txt";

/// Engine instance over a directory of model files.
pub struct LocalRecognizer {
    engine: OcrEngine,
}

impl LocalRecognizer {
    pub fn new(models_dir: impl AsRef<Path>) -> Result<Self, RecognitionError> {
        let (det, rec, charset) = model_paths(models_dir.as_ref())?;
        let engine = OcrEngine::new(&det, &rec, &charset, None)
            .map_err(|e| RecognitionError::Engine(format!("engine init failed: {e}")))?;
        Ok(Self { engine })
    }
}

fn model_paths(models_dir: &Path) -> Result<(PathBuf, PathBuf, PathBuf), RecognitionError> {
    let det = models_dir.join(DET_MODEL);
    let rec = models_dir.join(REC_MODEL);
    let charset = models_dir.join(CHARSET);
    for path in [&det, &rec, &charset] {
        if !path.exists() {
            return Err(RecognitionError::Engine(format!(
                "model file missing: {}",
                path.display()
            )));
        }
    }
    Ok((det, rec, charset))
}

impl PageRecognizer for LocalRecognizer {
    fn read_page(
        &self,
        image: &[u8],
        config: &RecognitionConfig,
    ) -> Result<PageResult, RecognitionError> {
        let img = image::load_from_memory(image)?;

        // Detector geometry: detect on the scaled raster, then map the boxes
        // back into the original pixel space.
        let scale = config.scale.max(f32::EPSILON);
        let scaled = if (scale - 1.0).abs() > f32::EPSILON {
            let w = ((img.width() as f32 * scale).round() as u32).max(1);
            let h = ((img.height() as f32 * scale).round() as u32).max(1);
            img.resize_exact(w, h, FilterType::CatmullRom)
        } else {
            img
        };

        let raw = self
            .engine
            .recognize(&scaled)
            .map_err(|e| RecognitionError::Engine(e.to_string()))?;

        let words: Vec<RecognizedWord> = raw
            .into_iter()
            .filter(|r| !r.text.trim().is_empty())
            .map(|r| RecognizedWord {
                text: r.text.trim().to_string(),
                bbox: unscale_and_pad(
                    r.bbox.rect.left(),
                    r.bbox.rect.top(),
                    r.bbox.rect.width() as i32,
                    r.bbox.rect.height() as i32,
                    scale,
                    config.margin,
                ),
            })
            .collect();

        let mut lines = cluster_lines(words, config.min_words_per_line as usize);

        if config.decoding == DecodingMode::LexiconConstrained {
            let lexicon = config.lexicon.as_deref();
            for line in &mut lines {
                for word in &mut line.words {
                    if let Some(entry) = lexicon.and_then(|lex| lex.constrain(&word.text)) {
                        word.text = entry.to_string();
                    }
                }
            }
        }

        Ok(PageResult::new(lines))
    }
}

/// Map a detected box from scaled-image space back to page space and grow it
/// by the configured margin.
fn unscale_and_pad(x: i32, y: i32, width: i32, height: i32, scale: f32, margin: i32) -> BoundingBox {
    let unscale = |v: i32| (v as f32 / scale).round() as i32;
    BoundingBox {
        x: unscale(x) - margin,
        y: unscale(y) - margin,
        width: (unscale(width) + 2 * margin).max(0),
        height: (unscale(height) + 2 * margin).max(0),
    }
}

/// Group words into top-to-bottom reading-order lines, left to right within
/// a line. Lines with fewer than `min_words_per_line` words are dropped.
fn cluster_lines(mut words: Vec<RecognizedWord>, min_words_per_line: usize) -> Vec<RecognizedLine> {
    words.sort_by_key(|w| w.bbox.y);

    let mut clusters: Vec<Vec<RecognizedWord>> = Vec::new();
    for word in words {
        match clusters
            .iter_mut()
            .find(|line| (word.bbox.y - line[0].bbox.y).abs() <= LINE_CLUSTER_THRESHOLD_PX)
        {
            Some(line) => line.push(word),
            None => clusters.push(vec![word]),
        }
    }

    clusters
        .into_iter()
        .filter(|line| line.len() >= min_words_per_line)
        .map(|mut line| {
            line.sort_by_key(|w| w.bbox.x);
            RecognizedLine { words: line }
        })
        .collect()
}
