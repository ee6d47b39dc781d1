//! page-glass demo CLI.
//!
//! Usage:
//!   page-glass <image> [--scale N] [--margin N] [--dictionary]
//!              [--min-words N] [--text-scale N] [--watch]
//!
//! Reads the page image, prints the recognized text and table, and saves an
//! annotated copy next to the input. The live mirror starts before the page
//! is processed and re-renders the published artifact independently;
//! `--watch` keeps it running until the process is killed.

use std::path::{Path, PathBuf};
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

use page_glass_lib::artifact::FileStore;
use page_glass_lib::engine::{Lexicon, LocalRecognizer};
use page_glass_lib::gallery;
use page_glass_lib::mirror::{Mirror, DEFAULT_POLL_INTERVAL};
use page_glass_lib::pipeline::{PageRequest, Pipeline};

const DEFAULT_ARTIFACT: &str = "output.txt";
const DEFAULT_MODELS_DIR: &str = "models";
const DEFAULT_WORD_LIST: &str = "data/words_alpha.txt";
const DEFAULT_GALLERY: &str = "data/config.json";

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  page-glass <image> [--scale N] [--margin N] [--dictionary]");
    eprintln!("             [--min-words N] [--text-scale N] [--watch]");
    exit(1);
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let image_path = match args.first() {
        Some(p) if !p.starts_with("--") => PathBuf::from(p),
        _ => usage(),
    };

    // Gallery seed pre-fills parameters for known example images; explicit
    // flags override.
    let mut request = PageRequest::default();
    let examples = gallery::load_examples(Path::new(&env_or("PAGE_GLASS_GALLERY", DEFAULT_GALLERY)));
    let seed = image_path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| examples.get(n))
        .copied();
    if let Some(seed) = seed {
        request.scale = seed.scale;
        request.margin = seed.margin;
        request.text_scale = seed.text_scale;
        log::info!(
            "[STARTUP] Gallery parameters applied for {}",
            image_path.display()
        );
    }
    if let Some(v) = flag_value(&args, "--scale").and_then(|v| v.parse().ok()) {
        request.scale = v;
    }
    if let Some(v) = flag_value(&args, "--margin").and_then(|v| v.parse().ok()) {
        request.margin = v;
    }
    if let Some(v) = flag_value(&args, "--min-words").and_then(|v| v.parse().ok()) {
        request.min_words_per_line = v;
    }
    if let Some(v) = flag_value(&args, "--text-scale").and_then(|v| v.parse().ok()) {
        request.text_scale = v;
    }
    request.use_dictionary = args.iter().any(|a| a == "--dictionary");

    // Process-wide lexicon — built once, injected into the pipeline.
    let lexicon = match std::fs::read_to_string(env_or("PAGE_GLASS_WORDS", DEFAULT_WORD_LIST)) {
        Ok(list) => {
            let lexicon = Lexicon::from_word_list(&list);
            log::info!("[STARTUP] Lexicon loaded: {} words", lexicon.len());
            Some(Arc::new(lexicon))
        }
        Err(_) => {
            log::info!("[STARTUP] No word list found — dictionary decoding unavailable");
            None
        }
    };

    let engine = match LocalRecognizer::new(env_or("PAGE_GLASS_MODELS", DEFAULT_MODELS_DIR)) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to initialize recognition engine: {e}");
            exit(1);
        }
    };

    let store = Arc::new(FileStore::new(env_or("PAGE_GLASS_ARTIFACT", DEFAULT_ARTIFACT)));
    let mirror = Mirror::new(store.clone()).spawn(DEFAULT_POLL_INTERVAL);

    let image = match image::open(&image_path) {
        Ok(img) => img,
        Err(e) => {
            eprintln!("Failed to open {}: {e}", image_path.display());
            mirror.stop().await;
            exit(1);
        }
    };

    let pipeline = Pipeline::new(Box::new(engine), lexicon, store);
    match pipeline.process_page(&image, &request) {
        Ok(outcome) => {
            println!("{}", outcome.text);
            println!("{}", outcome.table);

            let annotated_path = image_path.with_extension("annotated.png");
            match outcome.annotated.save(&annotated_path) {
                Ok(()) => println!("Annotated image saved to {}", annotated_path.display()),
                Err(e) => eprintln!("Failed to save annotated image: {e}"),
            }
        }
        Err(e) => {
            eprintln!("Page processing failed: {e}");
            mirror.stop().await;
            exit(1);
        }
    }

    if args.iter().any(|a| a == "--watch") {
        log::info!("[STARTUP] Watching the artifact — press Ctrl-C to exit");
        loop {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    }

    mirror.stop().await;
}
