//! Pitchterm: the Termforge pitch deck, straight from your terminal.
//!
//! This is not meant to be used as a crate!

pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod deck;
pub(crate) mod presenter;
pub(crate) mod render;
pub(crate) mod scroll;
pub(crate) mod terminal;
pub(crate) mod text;
pub(crate) mod theme;
pub(crate) mod ui;

pub use crate::{
    commands::{keyboard::KeyBindingsValidationError, listener::CommandListener},
    config::{Config, ConfigLoadError},
    presenter::{PresentationError, Presenter, PresenterOptions},
    theme::{
        raw::DeckTheme,
        registry::{DeckThemeRegistry, LoadThemeError},
    },
};
