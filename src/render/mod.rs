pub(crate) mod draw;
pub(crate) mod layout;
pub(crate) mod properties;
pub(crate) mod text;

use crate::style::ParseGradientError;
use std::io;

/// An error during rendering.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("invalid slide background: {0}")]
    Background(#[from] ParseGradientError),
}
