//! page-glass — handwritten-page reading demo.
//!
//! Hand the pipeline a page image and tuning parameters; it invokes the
//! recognition engine and returns the read text, an annotated copy of the
//! image, and a rectangular table of the words. Independently, a background
//! mirror polls the published text artifact and re-renders the table whenever
//! it changes.
//!
//! Module map:
//!   - page      — recognition data model (words, lines, page result)
//!   - engine    — gateway + configuration surface over the external engine
//!   - overlay   — box/label drawing on the page raster
//!   - table     — the shared rectangular table shaper
//!   - artifact  — durable text artifact store + result publisher
//!   - mirror    — background poll/detect/emit loop
//!   - pipeline  — per-request orchestration
//!   - gallery   — example seed store (read by the binary only)

pub mod artifact;
pub mod engine;
pub mod gallery;
pub mod mirror;
pub mod overlay;
pub mod page;
pub mod pipeline;
pub mod table;
