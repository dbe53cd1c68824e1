use crossterm::terminal::{size, window_size};
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowSize {
    pub(crate) rows: u16,
    pub(crate) columns: u16,
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl WindowSize {
    pub(crate) fn current() -> io::Result<Self> {
        match window_size() {
            Ok(size) => Ok(size.into()),
            // Not every platform can report the size in pixels.
            Err(_) => {
                let (columns, rows) = size()?;
                Ok(Self { rows, columns, width: 0, height: 0 })
            }
        }
    }

    /// The size of a single cell in pixels.
    ///
    /// Terminals that don't report their pixel size are assumed to have cells twice as tall as they
    /// are wide.
    pub(crate) fn cell_size(&self) -> (f32, f32) {
        if self.width == 0 || self.height == 0 || self.rows == 0 || self.columns == 0 {
            return (1.0, 2.0);
        }
        (self.width as f32 / self.columns as f32, self.height as f32 / self.rows as f32)
    }
}

impl From<crossterm::terminal::WindowSize> for WindowSize {
    fn from(size: crossterm::terminal::WindowSize) -> Self {
        Self { rows: size.rows, columns: size.columns, width: size.width, height: size.height }
    }
}
