use crate::{render::properties::WindowSize, terminal::grid::Rect};
use unicode_width::UnicodeWidthStr;

pub(crate) const MINIMUM_COLUMNS: u16 = 50;
pub(crate) const MINIMUM_ROWS: u16 = 15;

pub(crate) const EXPORT_LABEL: &str = " 📄 Download PDF ";
pub(crate) const EXPORTING_LABEL: &str = " Generating PDF... ";
pub(crate) const PREVIOUS_LABEL: &str = " ← Previous ";
pub(crate) const NEXT_LABEL: &str = " Next → ";

const MARGIN: u16 = 2;
const CONTROLS_GAP: u16 = 2;

/// A clickable control on the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Control {
    Select(usize),
    Previous,
    Next,
    Export,
}

/// The positions of everything on the screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ScreenLayout {
    pub(crate) selectors: Vec<Rect>,
    pub(crate) export: Rect,
    pub(crate) panel: Rect,
    pub(crate) previous: Rect,
    pub(crate) next: Rect,
    pub(crate) footer: Rect,
}

impl ScreenLayout {
    /// Compute the layout for a screen of the given size.
    ///
    /// Returns `None` if the screen is too small to fit everything.
    pub(crate) fn compute(dimensions: &WindowSize, total_slides: usize) -> Option<Self> {
        let WindowSize { rows, columns, .. } = *dimensions;
        if rows < MINIMUM_ROWS || columns < MINIMUM_COLUMNS {
            return None;
        }
        let export_width = EXPORT_LABEL.width().max(EXPORTING_LABEL.width()) as u16;
        let export = Rect { column: columns - MARGIN - export_width, row: 1, width: export_width, height: 1 };

        let mut selectors = Vec::new();
        let mut column = MARGIN;
        for index in 0..total_slides {
            let width = Self::selector_label(index).width() as u16;
            // leave at least one column between the selectors and the export button
            if column + width >= export.column {
                return None;
            }
            selectors.push(Rect { column, row: 1, width, height: 1 });
            column += width + 1;
        }

        let panel = Rect { column: MARGIN, row: 3, width: columns - MARGIN * 2, height: rows - 7 };

        let previous_width = PREVIOUS_LABEL.width() as u16;
        let next_width = NEXT_LABEL.width() as u16;
        let controls_start = (columns - previous_width - CONTROLS_GAP - next_width) / 2;
        let previous = Rect { column: controls_start, row: rows - 3, width: previous_width, height: 1 };
        let next =
            Rect { column: controls_start + previous_width + CONTROLS_GAP, row: rows - 3, width: next_width, height: 1 };

        let footer = Rect { column: 0, row: rows - 1, width: columns, height: 1 };
        Some(Self { selectors, export, panel, previous, next, footer })
    }

    /// The label for the selector of the slide at the given index.
    pub(crate) fn selector_label(index: usize) -> String {
        format!(" {} ", index + 1)
    }

    /// Find the control at a position, if any.
    pub(crate) fn control_at(&self, column: u16, row: u16) -> Option<Control> {
        if let Some(index) = self.selectors.iter().position(|rect| rect.contains(column, row)) {
            return Some(Control::Select(index));
        }
        let controls = [(self.export, Control::Export), (self.previous, Control::Previous), (self.next, Control::Next)];
        controls.into_iter().find(|(rect, _)| rect.contains(column, row)).map(|(_, control)| control)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn size(columns: u16, rows: u16) -> WindowSize {
        WindowSize { rows, columns, width: 0, height: 0 }
    }

    #[rstest]
    #[case::too_narrow(MINIMUM_COLUMNS - 1, 30)]
    #[case::too_short(80, MINIMUM_ROWS - 1)]
    fn too_small(#[case] columns: u16, #[case] rows: u16) {
        assert_eq!(ScreenLayout::compute(&size(columns, rows), 5), None);
    }

    #[test]
    fn too_many_selectors() {
        assert_eq!(ScreenLayout::compute(&size(MINIMUM_COLUMNS, 20), 30), None);
    }

    #[test]
    fn minimum_size_fits() {
        let layout = ScreenLayout::compute(&size(MINIMUM_COLUMNS, MINIMUM_ROWS), 5).expect("no layout");
        let last_selector = layout.selectors.last().unwrap();
        assert!(last_selector.column + last_selector.width < layout.export.column);
        assert!(layout.panel.row + layout.panel.height < layout.previous.row);
    }

    #[test]
    fn positions() {
        let layout = ScreenLayout::compute(&size(80, 24), 5).expect("no layout");
        assert_eq!(layout.selectors.len(), 5);
        assert_eq!(layout.selectors[0], Rect { column: 2, row: 1, width: 3, height: 1 });
        assert_eq!(layout.selectors[1], Rect { column: 6, row: 1, width: 3, height: 1 });
        assert_eq!(layout.export.column + layout.export.width, 78);
        assert_eq!(layout.panel, Rect { column: 2, row: 3, width: 76, height: 17 });
        assert_eq!(layout.previous.row, 21);
        assert_eq!(layout.footer.row, 23);
    }

    #[test]
    fn controls_lookup() {
        let layout = ScreenLayout::compute(&size(80, 24), 5).expect("no layout");
        assert_eq!(layout.control_at(7, 1), Some(Control::Select(1)));
        assert_eq!(layout.control_at(5, 1), None);
        assert_eq!(layout.control_at(layout.export.column, 1), Some(Control::Export));
        assert_eq!(layout.control_at(layout.previous.column + 1, 21), Some(Control::Previous));
        assert_eq!(layout.control_at(layout.next.column, 21), Some(Control::Next));
        assert_eq!(layout.control_at(10, 10), None);
    }
}
