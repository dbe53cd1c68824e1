use super::keyboard::{CommandKeyBindings, InputListener, KeyBindingsValidationError};
use crate::config::KeyBindingsConfig;
use std::{io, time::Duration};
use strum::EnumDiscriminants;

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// A command listener that turns terminal input into commands.
pub(crate) struct CommandListener {
    input: InputListener,
}

impl CommandListener {
    /// Create a new command listener using the given key bindings.
    pub(crate) fn new(config: KeyBindingsConfig) -> Result<Self, KeyBindingsValidationError> {
        let bindings = CommandKeyBindings::try_from(config)?;
        Ok(Self { input: InputListener::new(bindings) })
    }

    /// Try to get the next command.
    ///
    /// This attempts to get a command and returns `Ok(None)` on timeout.
    pub(crate) fn try_next_command(&mut self) -> io::Result<Option<Command>> {
        self.input.poll_next_command(POLL_TIMEOUT)
    }
}

/// A command.
#[derive(Clone, Debug, PartialEq, Eq, EnumDiscriminants)]
pub(crate) enum Command {
    /// Redraw the presentation.
    ///
    /// This can happen on terminal resize.
    Redraw,

    /// Move to the next slide.
    Next,

    /// Move to the previous slide.
    Previous,

    /// Go to the first slide.
    FirstSlide,

    /// Go to the last slide.
    LastSlide,

    /// Go to one particular slide, 1-based.
    GoToSlide(u32),

    /// Export the presentation into a PDF file.
    Export,

    /// A mouse click at a screen position.
    Click { column: u16, row: u16 },

    /// Dismiss the notification currently being shown.
    CloseModal,

    /// Suspend the presentation.
    Suspend,

    /// Exit the presentation.
    Exit,
}
