//! litslides: a terminal slideshow about how learning English literature improves our life.
//!
//! This is not meant to be used as a crate!

pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod deck;
pub(crate) mod export;
pub(crate) mod logging;
pub(crate) mod presentation;
pub(crate) mod presenter;
pub(crate) mod render;
pub(crate) mod style;
pub(crate) mod terminal;

pub use crate::{
    config::{Config, ConfigLoadError},
    export::{export_deck, ExportError, ExportOptions, OUTPUT_FILENAME},
    logging::{init_file_logging, LoggingError},
    presenter::{PresentationError, Presenter, PresenterOptions},
};
