//! Recognition engine boundary.
//!
//! The detection-and-reading engine is an external collaborator: this module
//! owns the configuration surface and the gateway in front of it, not the
//! recognition algorithms. `LocalRecognizer` adapts the bundled OCR engine;
//! anything implementing `PageRecognizer` can stand in (tests use fakes).

mod lexicon;
mod local;

pub use lexicon::Lexicon;
pub use local::LocalRecognizer;

use std::sync::Arc;

use thiserror::Error;

use crate::page::PageResult;

/// How recognized text is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingMode {
    /// Free decoding — output is whatever the reader produces.
    Unconstrained,
    /// Output restricted to entries of a pre-built lexicon.
    LexiconConstrained,
}

/// Engine configuration for one recognition call.
#[derive(Clone)]
pub struct RecognitionConfig {
    /// Detector geometry scale. Positive.
    pub scale: f32,
    /// Margin grown around each detected word box, in pixels. Non-negative.
    pub margin: i32,
    /// Clustered lines with fewer words than this are dropped. Positive.
    pub min_words_per_line: u32,
    pub decoding: DecodingMode,
    /// Required iff `decoding` is `LexiconConstrained`.
    pub lexicon: Option<Arc<Lexicon>>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            margin: 0,
            min_words_per_line: 1,
            decoding: DecodingMode::Unconstrained,
            lexicon: None,
        }
    }
}

/// Failures on the recognition path. All fatal to the triggering request;
/// nothing here is retried.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Raised by the gateway before the engine runs.
    #[error("lexicon-constrained decoding requested without a lexicon")]
    MissingLexicon,
    /// The input was not a decodable raster. Surfaced unchanged from the
    /// engine's decode step.
    #[error("failed to decode page image: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("recognition engine failed: {0}")]
    Engine(String),
}

/// The seam to the external detection-and-reading engine.
pub trait PageRecognizer {
    /// Detect and read all words on a page, handed over as encoded raster
    /// bytes. Lines come back in top-to-bottom reading order, words within a
    /// line left to right.
    fn read_page(
        &self,
        image: &[u8],
        config: &RecognitionConfig,
    ) -> Result<PageResult, RecognitionError>;
}

/// Gateway in front of the engine: validates the configuration, then
/// delegates. The missing-lexicon check runs before the engine is invoked.
pub fn recognize_page(
    engine: &dyn PageRecognizer,
    image: &[u8],
    config: &RecognitionConfig,
) -> Result<PageResult, RecognitionError> {
    if config.decoding == DecodingMode::LexiconConstrained && config.lexicon.is_none() {
        return Err(RecognitionError::MissingLexicon);
    }
    engine.read_page(image, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fails the test if the gateway lets a call through.
    struct UnreachableEngine;

    impl PageRecognizer for UnreachableEngine {
        fn read_page(
            &self,
            _image: &[u8],
            _config: &RecognitionConfig,
        ) -> Result<PageResult, RecognitionError> {
            panic!("engine must not be invoked");
        }
    }

    struct EmptyEngine;

    impl PageRecognizer for EmptyEngine {
        fn read_page(
            &self,
            _image: &[u8],
            _config: &RecognitionConfig,
        ) -> Result<PageResult, RecognitionError> {
            Ok(PageResult::new(vec![]))
        }
    }

    #[test]
    fn constrained_decoding_without_lexicon_fails_before_the_engine() {
        let config = RecognitionConfig {
            decoding: DecodingMode::LexiconConstrained,
            lexicon: None,
            ..RecognitionConfig::default()
        };
        let err = recognize_page(&UnreachableEngine, b"png", &config).unwrap_err();
        assert!(matches!(err, RecognitionError::MissingLexicon));
    }

    #[test]
    fn constrained_decoding_with_lexicon_reaches_the_engine() {
        let config = RecognitionConfig {
            decoding: DecodingMode::LexiconConstrained,
            lexicon: Some(Arc::new(Lexicon::from_word_list("hello\nworld\n"))),
            ..RecognitionConfig::default()
        };
        assert!(recognize_page(&EmptyEngine, b"png", &config).is_ok());
    }

    #[test]
    fn unconstrained_decoding_needs_no_lexicon() {
        let config = RecognitionConfig::default();
        assert!(recognize_page(&EmptyEngine, b"png", &config).is_ok());
    }
}
