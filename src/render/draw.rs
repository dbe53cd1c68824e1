use super::{
    layout::{ScreenLayout, EXPORTING_LABEL, EXPORT_LABEL, NEXT_LABEL, PREVIOUS_LABEL},
    properties::WindowSize,
    text::wrap_columns,
    RenderError,
};
use crate::{
    deck::Slide,
    presentation::Presentation,
    style::Color,
    terminal::grid::{CellStyle, Grid, Rect},
};
use unicode_width::UnicodeWidthStr;

const PAGE_BACKGROUND: Color = Color::new(0x1f, 0x1d, 0x36);
const ACCENT: Color = Color::new(0x66, 0x7e, 0xea);
const INACTIVE: Color = Color::new(0x4a, 0x4c, 0x6e);
const DISABLED: Color = Color::new(0x9a, 0x9c, 0xb8);
const SUBTITLE: Color = Color::new(0xee, 0xee, 0xf2);
const ERROR_BACKGROUND: Color = Color::new(0x8b, 0x1e, 0x3f);

const HINTS: &str = "←/→ navigate · 1-5 jump · e export · q quit";
const MODAL_HINT: &str = "press <esc> to dismiss";
const TOO_SMALL: &str = "terminal too small";

// Horizontal and vertical padding inside the slide panel.
const PANEL_PADDING: (u16, u16) = (4, 1);

/// Everything that's shown on the screen.
pub(crate) struct ScreenState<'a> {
    pub(crate) presentation: &'a Presentation,
    pub(crate) status: Option<&'a str>,
    pub(crate) error: Option<&'a str>,
}

/// A drawn screen.
pub(crate) struct Screen {
    pub(crate) grid: Grid,

    /// The layout used, or `None` if the screen was too small to draw anything.
    pub(crate) layout: Option<ScreenLayout>,
}

/// Draws the presentation into a grid.
pub(crate) struct ScreenDrawer {
    dimensions: WindowSize,
}

impl ScreenDrawer {
    pub(crate) fn new(dimensions: WindowSize) -> Self {
        Self { dimensions }
    }

    pub(crate) fn draw(&self, state: &ScreenState<'_>) -> Result<Screen, RenderError> {
        let mut grid = Grid::new(self.dimensions.rows, self.dimensions.columns);
        let Some(layout) = ScreenLayout::compute(&self.dimensions, state.presentation.total_slides()) else {
            grid.print(0, 0, TOO_SMALL, CellStyle::default().bold());
            return Ok(Screen { grid, layout: None });
        };
        let everything = Rect { column: 0, row: 0, width: grid.columns(), height: grid.height() };
        grid.fill(everything, CellStyle::default().bg(PAGE_BACKGROUND));

        self.draw_selectors(&mut grid, &layout, state.presentation);
        self.draw_export_button(&mut grid, &layout, state.presentation.is_exporting());
        self.draw_slide(&mut grid, layout.panel, state.presentation.current_slide())?;
        self.draw_navigation(&mut grid, &layout, state.presentation);
        self.draw_footer(&mut grid, &layout, state);
        if let Some(error) = state.error {
            self.draw_error(&mut grid, error);
        }
        Ok(Screen { grid, layout: Some(layout) })
    }

    fn draw_selectors(&self, grid: &mut Grid, layout: &ScreenLayout, presentation: &Presentation) {
        for (index, rect) in layout.selectors.iter().enumerate() {
            let style = if index == presentation.current_slide_index() {
                CellStyle::default().bg(Color::WHITE).fg(ACCENT).bold()
            } else {
                CellStyle::default().bg(INACTIVE).fg(Color::WHITE)
            };
            Self::draw_button(grid, *rect, &ScreenLayout::selector_label(index), style);
        }
    }

    fn draw_export_button(&self, grid: &mut Grid, layout: &ScreenLayout, exporting: bool) {
        let (label, style) = match exporting {
            true => (EXPORTING_LABEL, CellStyle::default().bg(INACTIVE).fg(DISABLED).dim()),
            false => (EXPORT_LABEL, CellStyle::default().bg(Color::WHITE).fg(ACCENT).bold()),
        };
        Self::draw_button(grid, layout.export, label, style);
    }

    fn draw_navigation(&self, grid: &mut Grid, layout: &ScreenLayout, presentation: &Presentation) {
        let style = |enabled: bool| match enabled {
            true => CellStyle::default().bg(Color::WHITE).fg(ACCENT).bold(),
            false => CellStyle::default().bg(INACTIVE).fg(DISABLED),
        };
        Self::draw_button(grid, layout.previous, PREVIOUS_LABEL, style(presentation.can_go_previous()));
        Self::draw_button(grid, layout.next, NEXT_LABEL, style(presentation.can_go_next()));
    }

    fn draw_button(grid: &mut Grid, rect: Rect, label: &str, style: CellStyle) {
        grid.fill(rect, style);
        grid.print(rect.row, rect.column, label, style);
    }

    fn draw_slide(&self, grid: &mut Grid, panel: Rect, slide: &Slide) -> Result<(), RenderError> {
        let gradient = slide.gradient()?;
        let (cell_width, cell_height) = self.dimensions.cell_size();
        let (width, height) = (panel.width as f32 * cell_width, panel.height as f32 * cell_height);
        for row in 0..panel.height {
            for column in 0..panel.width {
                let x = (column as f32 + 0.5) * cell_width;
                let y = (row as f32 + 0.5) * cell_height;
                let color = gradient.sample(x, y, width, height);
                grid.set_background(panel.row + row, panel.column + column, color);
            }
        }

        let (padding_columns, padding_rows) = PANEL_PADDING;
        let inner = Rect {
            column: panel.column + padding_columns,
            row: panel.row + padding_rows,
            width: panel.width.saturating_sub(padding_columns * 2),
            height: panel.height.saturating_sub(padding_rows * 2),
        };
        let mut lines = Self::slide_lines(slide, inner.width);
        if lines.len() > inner.height as usize {
            lines.truncate(inner.height as usize);
            if let Some((last, _)) = lines.last_mut() {
                last.push('…');
            }
        }
        let start_row = inner.row + (inner.height - lines.len() as u16) / 2;
        for (offset, (line, style)) in lines.iter().enumerate() {
            grid.print(start_row + offset as u16, inner.column, line, *style);
        }
        Ok(())
    }

    fn slide_lines(slide: &Slide, width: u16) -> Vec<(String, CellStyle)> {
        let title_style = CellStyle::default().fg(Color::WHITE).bold();
        let subtitle_style = CellStyle::default().fg(SUBTITLE);
        let body_style = CellStyle::default().fg(Color::WHITE);
        let blank = || (String::new(), CellStyle::default());

        let mut lines = vec![(slide.icon.to_string(), body_style), blank()];
        lines.extend(wrap_columns(slide.title, width).into_iter().map(|line| (line, title_style)));
        lines.push(blank());
        lines.extend(wrap_columns(slide.subtitle, width).into_iter().map(|line| (line, subtitle_style)));
        lines.push(blank());

        // body text is capped at 85% of the content width
        let body_width = (width as u32 * 85 / 100) as u16;
        lines.extend(wrap_columns(slide.body, body_width).into_iter().map(|line| (line, body_style)));
        lines
    }

    fn draw_footer(&self, grid: &mut Grid, layout: &ScreenLayout, state: &ScreenState<'_>) {
        let presentation = state.presentation;
        let style = CellStyle::default().fg(DISABLED);
        let position = format!(" slide {} / {}", presentation.current_slide_index() + 1, presentation.total_slides());
        let used = grid.print(layout.footer.row, layout.footer.column, &position, style);

        let message = state.status.unwrap_or(HINTS);
        let message_width = message.width() as u16;
        let column = layout.footer.width.saturating_sub(message_width + 1).max(used + 2);
        let style = match state.status {
            Some(_) => CellStyle::default().fg(Color::WHITE).bold(),
            None => style,
        };
        grid.print(layout.footer.row, column, message, style);
    }

    fn draw_error(&self, grid: &mut Grid, error: &str) {
        let width = grid.columns().saturating_sub(8).min(60);
        let lines = wrap_columns(error, width.saturating_sub(4));
        let height = (lines.len() as u16 + 6).min(grid.height());
        let rect = Rect {
            column: (grid.columns() - width) / 2,
            row: (grid.height() - height) / 2,
            width,
            height,
        };
        let style = CellStyle::default().bg(ERROR_BACKGROUND).fg(Color::WHITE);
        grid.fill(rect, style);

        let column = rect.column + 2;
        grid.print(rect.row + 1, column, "Error", style.bold());
        for (offset, line) in lines.iter().enumerate() {
            let row = rect.row + 3 + offset as u16;
            if row >= rect.row + rect.height - 2 {
                break;
            }
            grid.print(row, column, line, style);
        }
        grid.print(rect.row + rect.height - 2, column, MODAL_HINT, style.dim());
    }
}
