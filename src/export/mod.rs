//! Export the deck into a PDF file.
//!
//! Every slide is drawn off-screen into an image at A4 landscape proportions and each image
//! becomes one page of the generated document.

pub(crate) mod capture;
pub(crate) mod document;
pub(crate) mod exporter;

pub use capture::CaptureError;
pub use exporter::{export_deck, ExportOptions};

use std::{io, path::PathBuf};

/// The name of the generated file.
pub const OUTPUT_FILENAME: &str = "english-literature-improves-life.pdf";

/// The size of a page in points: A4 in landscape orientation.
pub(crate) const PAGE_SIZE_POINTS: (f32, f32) = (841.89, 595.28);

/// The size of a slide in CSS pixels: 297mm by 210mm at 96 DPI.
pub(crate) const SLIDE_SIZE: (u32, u32) = (1123, 794);

/// The factor slides are scaled by when being captured.
pub(crate) const CAPTURE_SCALE: u32 = 2;

/// An error during a PDF export.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("capturing slide {slide}: {source}")]
    Capture { slide: usize, source: CaptureError },

    #[error("loading font {path}: {reason}")]
    Font { path: PathBuf, reason: String },

    #[error("building document: {0}")]
    Document(#[from] lopdf::Error),

    #[error("saving document: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("export was interrupted")]
    Interrupted,
}
