use super::{
    capture::{load_font, SlideCapture, SlideRasterizer},
    document::PdfDocument,
    ExportError, OUTPUT_FILENAME,
};
use crate::deck::{Slide, SLIDES};
use log::{debug, error, info};
use std::{
    io::BufWriter,
    path::PathBuf,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread::{self, JoinHandle},
};
use tempfile::NamedTempFile;

/// The options for a PDF export.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// The directory the PDF file is written to.
    pub output_directory: PathBuf,

    /// The font used to draw text. System fonts are looked up if not set.
    pub font_path: Option<PathBuf>,
}

/// Turns slides into a PDF file.
pub(crate) struct Exporter<C> {
    capture: C,
    output_directory: PathBuf,
}

impl<C: SlideCapture> Exporter<C> {
    pub(crate) fn new(capture: C, output_directory: PathBuf) -> Self {
        Self { capture, output_directory }
    }

    /// Export the given slides, returning the path to the generated file.
    ///
    /// Slides are captured one at a time in order. The file only shows up in the output directory
    /// once the whole document was written, so a failure never leaves a partial file behind.
    pub(crate) fn export(&mut self, slides: &[Slide]) -> Result<PathBuf, ExportError> {
        let title = slides.first().map(|slide| slide.title).unwrap_or_default();
        let mut document = PdfDocument::new(title);
        for (index, slide) in slides.iter().enumerate() {
            debug!("capturing slide {}/{}", index + 1, slides.len());
            let image =
                self.capture.capture(slide).map_err(|source| ExportError::Capture { slide: index + 1, source })?;
            document.add_page(&image)?;
        }

        let pages = document.page_count();
        let path = self.output_directory.join(OUTPUT_FILENAME);
        let mut file = NamedTempFile::new_in(&self.output_directory)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            document.save(&mut writer)?;
            writer.into_inner().map_err(|e| e.into_error())?;
        }
        file.persist(&path)?;
        info!("exported {pages} pages into {}", path.display());
        Ok(path)
    }
}

/// Export the deck using the given options.
pub fn export_deck(options: &ExportOptions) -> Result<PathBuf, ExportError> {
    let font = load_font(options.font_path.as_deref())?;
    let mut exporter = Exporter::new(SlideRasterizer::new(font), options.output_directory.clone());
    exporter.export(&SLIDES)
}

/// An export running in the background.
///
/// Dropping a job waits for it to finish so a half written temporary file is never left behind.
pub(crate) struct ExportJob {
    receiver: Receiver<Result<PathBuf, ExportError>>,
    handle: Option<JoinHandle<()>>,
}

impl ExportJob {
    /// Start exporting the deck in a separate thread.
    pub(crate) fn spawn(options: ExportOptions) -> Self {
        Self::spawn_with(move || export_deck(&options))
    }

    pub(crate) fn spawn_with<F>(task: F) -> Self
    where
        F: FnOnce() -> Result<PathBuf, ExportError> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || {
            let result = task();
            if let Err(e) = &result {
                error!("export failed: {e}");
            }
            // The receiving end may be gone if the presentation was closed mid export.
            let _ = sender.send(result);
        });
        Self { receiver, handle: Some(handle) }
    }

    /// Check whether the export finished.
    ///
    /// A job that died without reporting a result counts as a failed one.
    pub(crate) fn poll(&self) -> Option<Result<PathBuf, ExportError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ExportError::Interrupted)),
        }
    }
}

impl Drop for ExportJob {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if !handle.is_finished() {
            info!("waiting for running export to finish");
        }
        // A panic was already reported through the channel being disconnected.
        let _ = handle.join();
    }
}
