use super::grid::{CellStyle, Grid};
use crossterm::{
    cursor, event,
    style::{self, Attribute},
    terminal, QueueableCommand,
};
use std::io::{self, Write};

/// A wrapper over the terminal write handle.
pub(crate) struct Terminal<I: TerminalWrite> {
    writer: I,
}

impl<I: TerminalWrite> Terminal<I> {
    pub(crate) fn new(mut writer: I) -> io::Result<Self> {
        writer.init()?;
        Ok(Self { writer })
    }

    /// Draw a grid on the screen, replacing whatever was there.
    pub(crate) fn draw(&mut self, grid: &Grid) -> io::Result<()> {
        self.writer.queue(terminal::BeginSynchronizedUpdate)?;
        self.writer.queue(style::ResetColor)?;
        self.writer.queue(terminal::Clear(terminal::ClearType::All))?;
        for (row, cells) in grid.rows().enumerate() {
            self.writer.queue(cursor::MoveTo(0, row as u16))?;
            let mut run = String::new();
            let mut run_style = cells.first().map(|c| c.style).unwrap_or_default();
            for cell in cells {
                if cell.is_continuation() {
                    continue;
                }
                if cell.style != run_style {
                    self.print_run(&run, &run_style)?;
                    run.clear();
                    run_style = cell.style;
                }
                run.push(cell.character);
            }
            self.print_run(&run, &run_style)?;
        }
        self.writer.queue(style::SetAttribute(Attribute::Reset))?;
        self.writer.queue(style::ResetColor)?;
        self.writer.queue(terminal::EndSynchronizedUpdate)?;
        self.writer.flush()
    }

    fn print_run(&mut self, text: &str, cell_style: &CellStyle) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.writer.queue(style::SetAttribute(Attribute::Reset))?;
        self.writer.queue(style::ResetColor)?;
        if let Some(color) = cell_style.foreground {
            self.writer.queue(style::SetForegroundColor(color.into()))?;
        }
        if let Some(color) = cell_style.background {
            self.writer.queue(style::SetBackgroundColor(color.into()))?;
        }
        if cell_style.bold {
            self.writer.queue(style::SetAttribute(Attribute::Bold))?;
        }
        if cell_style.dim {
            self.writer.queue(style::SetAttribute(Attribute::Dim))?;
        }
        self.writer.queue(style::Print(text))?;
        Ok(())
    }

    pub(crate) fn suspend(&mut self) {
        self.writer.deinit();
    }

    pub(crate) fn resume(&mut self) {
        let _ = self.writer.init();
    }
}

impl<I: TerminalWrite> Drop for Terminal<I> {
    fn drop(&mut self) {
        self.writer.deinit();
    }
}

pub(crate) trait TerminalWrite: io::Write {
    fn init(&mut self) -> io::Result<()>;
    fn deinit(&mut self);
}

impl TerminalWrite for io::Stdout {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.queue(cursor::Hide)?;
        self.queue(terminal::EnterAlternateScreen)?;
        self.queue(event::EnableMouseCapture)?;
        self.flush()
    }

    fn deinit(&mut self) {
        let _ = self.queue(event::DisableMouseCapture);
        let _ = self.queue(terminal::LeaveAlternateScreen);
        let _ = self.queue(cursor::Show);
        let _ = self.flush();
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{style::Color, terminal::grid::CellStyle};

    #[derive(Default)]
    struct CapturingWriter {
        output: Vec<u8>,
        initialized: bool,
    }

    impl io::Write for CapturingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl TerminalWrite for CapturingWriter {
        fn init(&mut self) -> io::Result<()> {
            self.initialized = true;
            Ok(())
        }

        fn deinit(&mut self) {
            self.initialized = false;
        }
    }

    #[test]
    fn draw_skips_continuations() {
        let mut grid = Grid::new(1, 6);
        grid.print(0, 0, "🧠ab", CellStyle::default().fg(Color::WHITE));
        let mut terminal = Terminal::new(CapturingWriter::default()).expect("init failed");
        assert!(terminal.writer.initialized);
        terminal.draw(&grid).expect("draw failed");

        let output = String::from_utf8(terminal.writer.output.clone()).expect("not utf8");
        assert!(output.contains("🧠ab"), "{output:?}");
        assert!(!output.contains('\0'));
    }
}
