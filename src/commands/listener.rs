use super::keyboard::{CommandKeyBindings, InputAction, KeyBindingsValidationError};
use crate::config::KeyBindingsConfig;
use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind, poll, read};
use std::{io, mem, time::Duration};
use strum::EnumDiscriminants;

/// A command listener that polls all terminal input in a single place.
pub struct CommandListener {
    bindings: CommandKeyBindings,
    events: Vec<KeyEvent>,
}

impl CommandListener {
    pub fn new(config: KeyBindingsConfig) -> Result<Self, KeyBindingsValidationError> {
        let bindings = CommandKeyBindings::try_from(config)?;
        Ok(Self { bindings, events: Vec::new() })
    }

    /// Try to get the next command.
    ///
    /// This attempts to get a command and returns `Ok(None)` on timeout.
    pub(crate) fn try_next_command(&mut self) -> io::Result<Option<Command>> {
        self.poll_next_command(Duration::from_millis(100))
    }

    /// Polls for the next command until the given timeout is reached.
    pub(crate) fn poll_next_command(&mut self, timeout: Duration) -> io::Result<Option<Command>> {
        if poll(timeout)? { self.next_command() } else { Ok(None) }
    }

    fn next_command(&mut self) -> io::Result<Option<Command>> {
        let mut events = mem::take(&mut self.events);
        let (command, events) = match read()? {
            // Ignore release events
            Event::Key(event) if event.kind == KeyEventKind::Release => (None, events),
            Event::Key(event) => {
                events.push(event);
                self.match_events(events)
            }
            Event::Mouse(event) => (Self::mouse_command(&event), events),
            Event::Resize(..) => (Some(Command::Redraw), events),
            _ => (None, vec![]),
        };
        self.events = events;
        Ok(command)
    }

    fn match_events(&self, events: Vec<KeyEvent>) -> (Option<Command>, Vec<KeyEvent>) {
        match self.bindings.apply(&events) {
            InputAction::Emit(command) => (Some(command), Vec::new()),
            InputAction::Buffer => (None, events),
            InputAction::Reset => (None, Vec::new()),
        }
    }

    fn mouse_command(event: &MouseEvent) -> Option<Command> {
        match event.kind {
            MouseEventKind::ScrollUp => Some(Command::ScrollUp),
            MouseEventKind::ScrollDown => Some(Command::ScrollDown),
            MouseEventKind::Down(MouseButton::Left) => {
                Some(Command::Click { column: event.column, row: event.row })
            }
            _ => None,
        }
    }
}

/// A command.
#[derive(Clone, Debug, PartialEq, Eq, EnumDiscriminants)]
pub(crate) enum Command {
    /// Redraw the deck.
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

    /// Go to one particular slide.
    GoToSlide(u32),

    /// Scroll the deck up by a few rows.
    ScrollUp,

    /// Scroll the deck down by a few rows.
    ScrollDown,

    /// A mouse click at the given terminal position.
    Click { column: u16, row: u16 },

    /// Toggle the slide index view.
    ToggleSlideIndex,

    /// Toggle the key bindings config view.
    ToggleKeyBindingsConfig,

    /// Hide the currently open modal, if any.
    CloseModal,

    /// Exit the deck.
    Exit,

    /// Suspend the application.
    Suspend,
}
