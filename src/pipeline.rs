//! The page-reading pipeline.
//!
//! This is the one path that produces a fresh `PageResult`:
//! recognize → text → overlay → table → publish, synchronously, with the
//! publish completed before the outputs are returned. The live mirror never
//! calls in here — it only ever sees the published artifact.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use image::{DynamicImage, RgbImage};
use thiserror::Error;

use crate::artifact::{publish, ArtifactStore};
use crate::engine::{
    recognize_page, DecodingMode, Lexicon, PageRecognizer, RecognitionConfig, RecognitionError,
};
use crate::overlay;
use crate::table::{EmptyPageError, Table};

/// Tuning parameters for one request.
///
/// Ranges are the caller UI's to enforce (scale 0–10, margin 0–25, min words
/// 1–10, text scale 0.5–2); nothing here re-validates them.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub scale: f32,
    pub margin: i32,
    pub use_dictionary: bool,
    pub min_words_per_line: u32,
    pub text_scale: f32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            scale: 1.0,
            margin: 1,
            use_dictionary: false,
            min_words_per_line: 2,
            text_scale: 1.0,
        }
    }
}

/// The three derived artifacts returned to the caller.
pub struct ProcessedPage {
    pub text: String,
    pub annotated: RgbImage,
    pub table: Table,
}

/// Request-path failures. These surface to the caller; nothing retries
/// automatically — the caller may re-issue the request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
    #[error(transparent)]
    EmptyPage(#[from] EmptyPageError),
    #[error("failed to encode page image: {0}")]
    ImageEncode(#[from] image::ImageError),
    #[error("failed to publish artifact: {0}")]
    Publish(#[from] io::Error),
}

/// Orchestrates one page-reading request end to end.
pub struct Pipeline {
    engine: Box<dyn PageRecognizer>,
    /// Process-wide lexicon, built once at startup and injected here so the
    /// pipeline stays testable without a real word list.
    lexicon: Option<Arc<Lexicon>>,
    store: Arc<dyn ArtifactStore>,
}

impl Pipeline {
    pub fn new(
        engine: Box<dyn PageRecognizer>,
        lexicon: Option<Arc<Lexicon>>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            engine,
            lexicon,
            store,
        }
    }

    /// Process one page image through the full pipeline.
    pub fn process_page(
        &self,
        image: &DynamicImage,
        request: &PageRequest,
    ) -> Result<ProcessedPage, PipelineError> {
        let pipeline_start = Instant::now();

        // Encode to PNG bytes in memory — the engine decodes on its side of
        // the seam.
        let encode_start = Instant::now();
        let mut png_bytes = Vec::new();
        image.write_to(&mut io::Cursor::new(&mut png_bytes), image::ImageFormat::Png)?;
        log::info!(
            "[PIPELINE] PNG encode: {}ms ({} bytes)",
            encode_start.elapsed().as_millis(),
            png_bytes.len()
        );

        let config = RecognitionConfig {
            scale: request.scale,
            margin: request.margin,
            min_words_per_line: request.min_words_per_line,
            decoding: if request.use_dictionary {
                DecodingMode::LexiconConstrained
            } else {
                DecodingMode::Unconstrained
            },
            lexicon: self.lexicon.clone(),
        };

        let read_start = Instant::now();
        let page = recognize_page(self.engine.as_ref(), &png_bytes, &config)?;
        log::info!(
            "[PIPELINE] Recognition: {} lines in {}ms",
            page.lines().len(),
            read_start.elapsed().as_millis()
        );

        let text = page.to_text();

        let render_start = Instant::now();
        let annotated = overlay::render(image.to_rgb8(), &page, request.text_scale);
        log::info!(
            "[PIPELINE] Overlay: {}ms",
            render_start.elapsed().as_millis()
        );

        let table = Table::from_page(&page)?;

        publish(self.store.as_ref(), &page)?;

        log::info!(
            "[PIPELINE] Total: {}ms",
            pipeline_start.elapsed().as_millis()
        );
        Ok(ProcessedPage {
            text,
            annotated,
            table,
        })
    }
}
