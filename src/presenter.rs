use crate::{
    commands::{
        keyboard::KeyBindingsValidationError,
        listener::{Command, CommandListener},
    },
    config::KeyBindingsConfig,
    deck::SLIDES,
    export::{exporter::ExportJob, ExportError, ExportOptions},
    presentation::Presentation,
    render::{
        draw::{ScreenDrawer, ScreenState},
        layout::{Control, ScreenLayout},
        properties::WindowSize,
        RenderError,
    },
    terminal::printer::{Terminal, TerminalWrite},
};
use log::{debug, info};
use std::{
    io::{self, Stdout},
    path::PathBuf,
};

const EXPORT_FAILED: &str = "Error generating PDF. Please try again.";

pub struct PresenterOptions {
    pub bindings: KeyBindingsConfig,
    pub export: ExportOptions,
}

/// A slideshow presenter.
///
/// This type puts everything else together.
pub struct Presenter {
    commands: CommandListener,
    presentation: Presentation,
    status: Option<String>,
    error: Option<String>,
    layout: Option<ScreenLayout>,
    export_job: Option<ExportJob>,
    options: PresenterOptions,
}

impl Presenter {
    /// Construct a new presenter.
    pub fn new(options: PresenterOptions) -> Result<Self, PresentationError> {
        let commands = CommandListener::new(options.bindings.clone())?;
        Ok(Self {
            commands,
            presentation: Presentation::new(&SLIDES),
            status: None,
            error: None,
            layout: None,
            export_job: None,
            options,
        })
    }

    /// Run the presentation until the user exits.
    pub fn present(mut self) -> Result<(), PresentationError> {
        let mut terminal = Terminal::new(io::stdout())?;
        loop {
            self.render(&mut terminal)?;
            loop {
                if self.poll_export() {
                    break;
                }
                let Some(command) = self.commands.try_next_command()? else {
                    continue;
                };
                match self.apply_command(command) {
                    CommandSideEffect::Exit => return Ok(()),
                    CommandSideEffect::Suspend => {
                        self.suspend(&mut terminal);
                        break;
                    }
                    CommandSideEffect::StartExport => {
                        info!("starting export into {}", self.options.export.output_directory.display());
                        self.export_job = Some(ExportJob::spawn(self.options.export.clone()));
                        break;
                    }
                    CommandSideEffect::Redraw => break,
                    CommandSideEffect::None => (),
                };
            }
        }
    }

    fn render<W: TerminalWrite>(&mut self, terminal: &mut Terminal<W>) -> Result<(), RenderError> {
        let drawer = ScreenDrawer::new(WindowSize::current()?);
        let state = ScreenState {
            presentation: &self.presentation,
            status: self.status.as_deref(),
            error: self.error.as_deref(),
        };
        let screen = drawer.draw(&state)?;
        terminal.draw(&screen.grid)?;
        self.layout = screen.layout;
        Ok(())
    }

    // Returns whether the running export, if any, just finished.
    fn poll_export(&mut self) -> bool {
        let Some(result) = self.export_job.as_ref().and_then(ExportJob::poll) else {
            return false;
        };
        self.finish_export(result);
        true
    }

    fn finish_export(&mut self, result: Result<PathBuf, ExportError>) {
        self.export_job = None;
        self.presentation.finish_export();
        match result {
            Ok(path) => self.status = Some(format!("PDF saved to {}", path.display())),
            Err(e) => self.error = Some(format!("{EXPORT_FAILED} ({e})")),
        }
    }

    fn apply_command(&mut self, command: Command) -> CommandSideEffect {
        // These ones always happens no matter our state.
        match command {
            Command::Exit => return CommandSideEffect::Exit,
            Command::Suspend => return CommandSideEffect::Suspend,
            Command::Redraw => return CommandSideEffect::Redraw,
            Command::CloseModal => {
                return match self.error.take() {
                    Some(_) => CommandSideEffect::Redraw,
                    None => CommandSideEffect::None,
                };
            }
            _ => (),
        };
        // Everything else is blocked while an error is being shown.
        if self.error.is_some() {
            return CommandSideEffect::None;
        }
        let command = match command {
            Command::Click { column, row } => match self.clicked_command(column, row) {
                Some(command) => command,
                None => return CommandSideEffect::None,
            },
            other => other,
        };
        let needs_redraw = match command {
            Command::Next => self.presentation.jump_next(),
            Command::Previous => self.presentation.jump_previous(),
            Command::FirstSlide => self.presentation.jump_first_slide(),
            Command::LastSlide => self.presentation.jump_last_slide(),
            Command::GoToSlide(number) => self.presentation.go_to_slide(number.saturating_sub(1) as usize),
            Command::Export => {
                if !self.presentation.start_export() {
                    debug!("ignoring export request, one is already running");
                    return CommandSideEffect::None;
                }
                self.status = None;
                return CommandSideEffect::StartExport;
            }
            // These are handled above.
            Command::Exit
            | Command::Suspend
            | Command::Redraw
            | Command::CloseModal
            | Command::Click { .. } => return CommandSideEffect::None,
        };
        if needs_redraw {
            CommandSideEffect::Redraw
        } else {
            CommandSideEffect::None
        }
    }

    fn clicked_command(&self, column: u16, row: u16) -> Option<Command> {
        let control = self.layout.as_ref()?.control_at(column, row)?;
        let command = match control {
            Control::Select(index) => Command::GoToSlide(index as u32 + 1),
            Control::Previous => Command::Previous,
            Control::Next => Command::Next,
            Control::Export => Command::Export,
        };
        Some(command)
    }

    fn suspend(&self, terminal: &mut Terminal<Stdout>) {
        #[cfg(unix)]
        unsafe {
            terminal.suspend();
            libc::raise(libc::SIGTSTP);
            terminal.resume();
        }
    }
}

#[derive(Debug, PartialEq)]
enum CommandSideEffect {
    Exit,
    Suspend,
    Redraw,
    StartExport,
    None,
}

/// An error when running a presentation.
#[derive(thiserror::Error, Debug)]
pub enum PresentationError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("invalid key bindings: {0}")]
    KeyBindings(#[from] KeyBindingsValidationError),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::export::CaptureError;
    use rstest::rstest;

    fn make_presenter() -> Presenter {
        let options = PresenterOptions {
            bindings: KeyBindingsConfig::default(),
            export: ExportOptions { output_directory: PathBuf::from("."), font_path: None },
        };
        Presenter::new(options).expect("construction failed")
    }

    fn with_layout(mut presenter: Presenter) -> Presenter {
        let size = WindowSize { rows: 24, columns: 80, width: 0, height: 0 };
        presenter.layout = ScreenLayout::compute(&size, presenter.presentation.total_slides());
        presenter
    }

    fn failure() -> ExportError {
        ExportError::Capture { slide: 1, source: CaptureError::Canvas(0, 0) }
    }

    #[rstest]
    #[case::next(&[Command::Next], 1)]
    #[case::previous_at_start(&[Command::Previous], 0)]
    #[case::last(&[Command::LastSlide], 4)]
    #[case::last_then_previous(&[Command::LastSlide, Command::Previous], 3)]
    #[case::first(&[Command::Next, Command::Next, Command::FirstSlide], 0)]
    #[case::go_to(&[Command::GoToSlide(3)], 2)]
    #[case::go_to_zero(&[Command::LastSlide, Command::GoToSlide(0)], 0)]
    #[case::go_to_past_end(&[Command::GoToSlide(42)], 4)]
    fn navigation(#[case] commands: &[Command], #[case] expected: usize) {
        let mut presenter = make_presenter();
        for command in commands {
            presenter.apply_command(command.clone());
        }
        assert_eq!(presenter.presentation.current_slide_index(), expected);
    }

    #[test]
    fn redraw_only_on_change() {
        let mut presenter = make_presenter();
        assert_eq!(presenter.apply_command(Command::Previous), CommandSideEffect::None);
        assert_eq!(presenter.apply_command(Command::Next), CommandSideEffect::Redraw);
    }

    #[test]
    fn export_once() {
        let mut presenter = make_presenter();
        assert_eq!(presenter.apply_command(Command::Export), CommandSideEffect::StartExport);
        assert!(presenter.presentation.is_exporting());
        assert_eq!(presenter.apply_command(Command::Export), CommandSideEffect::None);
    }

    #[test]
    fn navigation_while_exporting() {
        let mut presenter = make_presenter();
        presenter.apply_command(Command::Export);
        presenter.apply_command(Command::Next);
        assert_eq!(presenter.presentation.current_slide_index(), 1);
    }

    #[test]
    fn export_success() {
        let mut presenter = make_presenter();
        presenter.apply_command(Command::Export);
        presenter.finish_export(Ok(PathBuf::from("/tmp/deck.pdf")));

        assert!(!presenter.presentation.is_exporting());
        assert_eq!(presenter.status.as_deref(), Some("PDF saved to /tmp/deck.pdf"));
        assert_eq!(presenter.error, None);
        assert_eq!(presenter.apply_command(Command::Export), CommandSideEffect::StartExport);
    }

    #[test]
    fn export_failure() {
        let mut presenter = make_presenter();
        presenter.apply_command(Command::Export);
        presenter.finish_export(Err(failure()));

        assert!(!presenter.presentation.is_exporting());
        let error = presenter.error.clone().expect("no error");
        assert!(error.starts_with("Error generating PDF. Please try again."));

        // The modal blocks everything until it's dismissed.
        assert_eq!(presenter.apply_command(Command::Next), CommandSideEffect::None);
        assert_eq!(presenter.presentation.current_slide_index(), 0);
        assert_eq!(presenter.apply_command(Command::CloseModal), CommandSideEffect::Redraw);
        assert_eq!(presenter.error, None);
        assert_eq!(presenter.apply_command(Command::Export), CommandSideEffect::StartExport);
    }

    #[test]
    fn always_available_commands() {
        let mut presenter = make_presenter();
        presenter.finish_export(Err(failure()));
        assert_eq!(presenter.apply_command(Command::Redraw), CommandSideEffect::Redraw);
        assert_eq!(presenter.apply_command(Command::Suspend), CommandSideEffect::Suspend);
        assert_eq!(presenter.apply_command(Command::Exit), CommandSideEffect::Exit);
    }

    #[test]
    fn close_without_modal() {
        let mut presenter = make_presenter();
        assert_eq!(presenter.apply_command(Command::CloseModal), CommandSideEffect::None);
    }

    #[test]
    fn click_controls() {
        let mut presenter = with_layout(make_presenter());
        let layout = presenter.layout.clone().expect("no layout");

        let next = Command::Click { column: layout.next.column, row: layout.next.row };
        assert_eq!(presenter.apply_command(next), CommandSideEffect::Redraw);
        assert_eq!(presenter.presentation.current_slide_index(), 1);

        let selector = layout.selectors[3];
        presenter.apply_command(Command::Click { column: selector.column, row: selector.row });
        assert_eq!(presenter.presentation.current_slide_index(), 3);

        let previous = Command::Click { column: layout.previous.column, row: layout.previous.row };
        presenter.apply_command(previous);
        assert_eq!(presenter.presentation.current_slide_index(), 2);

        let export = Command::Click { column: layout.export.column, row: layout.export.row };
        assert_eq!(presenter.apply_command(export), CommandSideEffect::StartExport);
    }

    #[test]
    fn click_disabled_control() {
        let mut presenter = with_layout(make_presenter());
        let layout = presenter.layout.clone().expect("no layout");
        let previous = Command::Click { column: layout.previous.column, row: layout.previous.row };
        assert_eq!(presenter.apply_command(previous), CommandSideEffect::None);
        assert_eq!(presenter.presentation.current_slide_index(), 0);
    }

    #[test]
    fn click_nowhere() {
        let mut presenter = with_layout(make_presenter());
        assert_eq!(presenter.apply_command(Command::Click { column: 0, row: 0 }), CommandSideEffect::None);
    }

    #[test]
    fn click_without_layout() {
        let mut presenter = make_presenter();
        assert_eq!(presenter.apply_command(Command::Click { column: 10, row: 10 }), CommandSideEffect::None);
    }
}
