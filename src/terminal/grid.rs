use crate::style::Color;
use unicode_width::UnicodeWidthChar;

/// The style of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CellStyle {
    pub(crate) foreground: Option<Color>,
    pub(crate) background: Option<Color>,
    pub(crate) bold: bool,
    pub(crate) dim: bool,
}

impl CellStyle {
    pub(crate) fn fg(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub(crate) fn bg(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub(crate) fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub(crate) fn dim(mut self) -> Self {
        self.dim = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StyledChar {
    pub(crate) character: char,
    pub(crate) style: CellStyle,
}

impl StyledChar {
    // The cell to the right of a double width character.
    pub(crate) const CONTINUATION: char = '\0';

    pub(crate) fn is_continuation(&self) -> bool {
        self.character == Self::CONTINUATION
    }
}

impl Default for StyledChar {
    fn default() -> Self {
        Self { character: ' ', style: Default::default() }
    }
}

/// A rectangle of cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) column: u16,
    pub(crate) row: u16,
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Rect {
    pub(crate) fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.column
            && row >= self.row
            && (column - self.column) < self.width
            && (row - self.row) < self.height
    }
}

/// An in-memory screen that gets drawn into before being flushed to the terminal.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u16,
    rows: Vec<Vec<StyledChar>>,
}

impl Grid {
    pub(crate) fn new(rows: u16, columns: u16) -> Self {
        let rows = vec![vec![StyledChar::default(); columns as usize]; rows as usize];
        Self { columns, rows }
    }

    pub(crate) fn columns(&self) -> u16 {
        self.columns
    }

    pub(crate) fn height(&self) -> u16 {
        self.rows.len() as u16
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &[StyledChar]> {
        self.rows.iter().map(Vec::as_slice)
    }

    #[cfg(test)]
    pub(crate) fn cell(&self, row: u16, column: u16) -> Option<&StyledChar> {
        self.rows.get(row as usize).and_then(|r| r.get(column as usize))
    }

    /// Set the background color of a single cell.
    pub(crate) fn set_background(&mut self, row: u16, column: u16, color: Color) {
        if let Some(cell) = self.cell_mut(row, column) {
            cell.style.background = Some(color);
        }
    }

    /// Fill a rectangle with blank cells of the given style.
    pub(crate) fn fill(&mut self, rect: Rect, style: CellStyle) {
        for row in rect.row..rect.row.saturating_add(rect.height) {
            for column in rect.column..rect.column.saturating_add(rect.width) {
                if let Some(cell) = self.cell_mut(row, column) {
                    *cell = StyledChar { character: ' ', style };
                }
            }
        }
    }

    /// Print text starting at a position.
    ///
    /// Cells keep their background color unless the style sets one. Text that goes past the
    /// right edge is dropped. Returns the number of columns written.
    pub(crate) fn print(&mut self, row: u16, column: u16, text: &str, style: CellStyle) -> u16 {
        let mut current = column;
        for c in text.chars() {
            let width = c.width().unwrap_or(0) as u16;
            if width == 0 {
                continue;
            }
            if current.saturating_add(width) > self.columns {
                break;
            }
            self.put(row, current, c, style);
            for offset in 1..width {
                self.put(row, current + offset, StyledChar::CONTINUATION, style);
            }
            current += width;
        }
        current - column
    }

    /// Get the text in a row, skipping the filler cells after wide characters.
    #[cfg(test)]
    pub(crate) fn row_text(&self, row: u16) -> String {
        let Some(cells) = self.rows.get(row as usize) else {
            return String::new();
        };
        cells.iter().filter(|c| !c.is_continuation()).map(|c| c.character).collect()
    }

    fn put(&mut self, row: u16, column: u16, character: char, style: CellStyle) {
        let Some(cell) = self.cell_mut(row, column) else {
            return;
        };
        let background = style.background.or(cell.style.background);
        cell.character = character;
        cell.style = CellStyle { background, ..style };
    }

    fn cell_mut(&mut self, row: u16, column: u16) -> Option<&mut StyledChar> {
        self.rows.get_mut(row as usize).and_then(|r| r.get_mut(column as usize))
    }
}
