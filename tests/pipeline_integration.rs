//! Integration tests for the page-reading pipeline.
//!
//! A fake engine stands in for the external recognizer so the orchestration
//! (text join, overlay, table shaping, publish ordering) is exercised end to
//! end without model files.

use std::io;
use std::sync::{Arc, Mutex};

use image::DynamicImage;
use page_glass_lib::artifact::ArtifactStore;
use page_glass_lib::engine::{
    DecodingMode, Lexicon, PageRecognizer, RecognitionConfig, RecognitionError,
};
use page_glass_lib::page::{BoundingBox, PageResult, RecognizedLine, RecognizedWord};
use page_glass_lib::pipeline::{PageRequest, Pipeline, PipelineError};
use page_glass_lib::table::Table;

/// In-memory artifact store standing in for the file-backed one.
#[derive(Default)]
struct MemoryStore {
    content: Mutex<Option<String>>,
}

impl ArtifactStore for MemoryStore {
    fn write(&self, text: &str) -> io::Result<()> {
        *self.content.lock().unwrap() = Some(text.to_string());
        Ok(())
    }

    fn size(&self) -> io::Result<Option<u64>> {
        Ok(self
            .content
            .lock()
            .unwrap()
            .as_ref()
            .map(|c| c.len() as u64))
    }

    fn read(&self) -> io::Result<String> {
        self.content
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no artifact"))
    }
}

/// Engine returning a canned page, recording the config it was handed.
struct FixedEngine {
    page: PageResult,
    seen_config: Mutex<Option<(DecodingMode, bool)>>,
}

impl FixedEngine {
    fn new(page: PageResult) -> Self {
        Self {
            page,
            seen_config: Mutex::new(None),
        }
    }
}

impl PageRecognizer for FixedEngine {
    fn read_page(
        &self,
        _image: &[u8],
        config: &RecognitionConfig,
    ) -> Result<PageResult, RecognitionError> {
        *self.seen_config.lock().unwrap() = Some((config.decoding, config.lexicon.is_some()));
        Ok(self.page.clone())
    }
}

/// Fails the test if the pipeline reaches the engine at all.
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

fn word(text: &str, x: i32, y: i32) -> RecognizedWord {
    RecognizedWord {
        text: text.to_string(),
        bbox: BoundingBox {
            x,
            y,
            width: 40,
            height: 12,
        },
    }
}

fn hello_world_page() -> PageResult {
    PageResult::new(vec![
        RecognizedLine {
            words: vec![word("HELLO", 10, 10), word("WORLD", 60, 10)],
        },
        RecognizedLine {
            words: vec![word("FOO", 10, 40)],
        },
    ])
}

fn test_image() -> DynamicImage {
    DynamicImage::ImageRgb8(image::RgbImage::new(120, 60))
}

#[test]
fn process_page_returns_text_image_and_table() {
    let store = Arc::new(MemoryStore::default());
    let pipeline = Pipeline::new(
        Box::new(FixedEngine::new(hello_world_page())),
        None,
        store.clone(),
    );

    let outcome = pipeline
        .process_page(&test_image(), &PageRequest::default())
        .unwrap();

    assert_eq!(outcome.text, "HELLO WORLD\nFOO\n");
    assert_eq!(
        outcome.table.headers().to_vec(),
        vec!["Column 1", "Column 2"]
    );
    assert_eq!(
        outcome.table.rows().to_vec(),
        vec![vec!["HELLO", "WORLD"], vec!["FOO", ""]]
    );
    assert_eq!(outcome.annotated.dimensions(), (120, 60));

    // Publish completed before the call returned.
    assert_eq!(store.read().unwrap(), "HELLO WORLD\nFOO\n");
}

#[test]
fn dictionary_requests_reach_the_engine_in_constrained_mode() {
    let store = Arc::new(MemoryStore::default());
    let engine = Arc::new(FixedEngine::new(hello_world_page()));
    let lexicon = Arc::new(Lexicon::from_word_list("hello\nworld\nfoo\n"));

    struct Shared(Arc<FixedEngine>);
    impl PageRecognizer for Shared {
        fn read_page(
            &self,
            image: &[u8],
            config: &RecognitionConfig,
        ) -> Result<PageResult, RecognitionError> {
            self.0.read_page(image, config)
        }
    }

    let pipeline = Pipeline::new(Box::new(Shared(engine.clone())), Some(lexicon), store);
    let request = PageRequest {
        use_dictionary: true,
        ..PageRequest::default()
    };
    pipeline.process_page(&test_image(), &request).unwrap();

    let seen = engine.seen_config.lock().unwrap().unwrap();
    assert_eq!(seen, (DecodingMode::LexiconConstrained, true));
}

#[test]
fn dictionary_without_lexicon_fails_before_the_engine() {
    let store = Arc::new(MemoryStore::default());
    let pipeline = Pipeline::new(Box::new(UnreachableEngine), None, store.clone());
    let request = PageRequest {
        use_dictionary: true,
        ..PageRequest::default()
    };

    let err = pipeline.process_page(&test_image(), &request).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Recognition(RecognitionError::MissingLexicon)
    ));
    // Nothing was published for the failed request.
    assert!(store.read().is_err());
}

#[test]
fn empty_page_fails_shaping_and_publishes_nothing() {
    let store = Arc::new(MemoryStore::default());
    let pipeline = Pipeline::new(
        Box::new(FixedEngine::new(PageResult::new(vec![]))),
        None,
        store.clone(),
    );

    let err = pipeline
        .process_page(&test_image(), &PageRequest::default())
        .unwrap_err();
    assert!(matches!(err, PipelineError::EmptyPage(_)));
    assert!(store.read().is_err());
}

#[test]
fn repeated_requests_leave_the_artifact_byte_identical() {
    let store = Arc::new(MemoryStore::default());
    let pipeline = Pipeline::new(
        Box::new(FixedEngine::new(hello_world_page())),
        None,
        store.clone(),
    );

    pipeline
        .process_page(&test_image(), &PageRequest::default())
        .unwrap();
    let first = store.read().unwrap();
    pipeline
        .process_page(&test_image(), &PageRequest::default())
        .unwrap();
    let second = store.read().unwrap();

    assert_eq!(first, second);
}

#[test]
fn published_artifact_round_trips_word_for_word() {
    let store = Arc::new(MemoryStore::default());
    let page = hello_world_page();
    let pipeline = Pipeline::new(Box::new(FixedEngine::new(page.clone())), None, store.clone());

    pipeline
        .process_page(&test_image(), &PageRequest::default())
        .unwrap();

    let table = Table::from_artifact_text(&store.read().unwrap()).unwrap();
    for (row, line) in table.rows().iter().zip(page.lines()) {
        let words: Vec<&str> = line.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(&row[..words.len()], &words[..]);
    }
}
