use crate::{
    commands::listener::{Command, CommandListener},
    config::{KeyBindingsConfig, ScrollingConfig},
    deck::{Deck, builder::DeckBuilder},
    render::{
        RenderError, RenderResult, TerminalDrawer, TerminalDrawerOptions,
        properties::WindowSize,
    },
    scroll::{DeckSurface, ScrollState, animation::ScrollAnimation},
    terminal::printer::{TerminalCommand, TerminalIo},
    theme::{DeckTheme, ProcessingThemeError, raw},
    ui::indicator::{IndicatorLayout, IndicatorTarget},
};
use std::{
    io::{self, Stdout},
    mem,
    time::{Duration, Instant},
};

#[derive(Default)]
pub struct PresenterOptions {
    pub bindings: KeyBindingsConfig,
    pub scrolling: ScrollingConfig,
}

/// A deck presenter.
pub struct Presenter<'a> {
    theme: &'a raw::DeckTheme,
    commands: CommandListener,
    state: PresenterState,
    options: PresenterOptions,
}

impl<'a> Presenter<'a> {
    /// Construct a new presenter.
    pub fn new(theme: &'a raw::DeckTheme, commands: CommandListener, options: PresenterOptions) -> Self {
        Self { theme, commands, state: PresenterState::Empty, options }
    }

    /// Run the deck, blocking until the user exits.
    pub fn present(mut self) -> Result<(), PresentationError> {
        let theme = DeckTheme::new(self.theme)?;
        let deck = DeckBuilder::new(&theme, &self.options.bindings).build();
        self.state = PresenterState::Presenting(deck);

        let mut drawer = TerminalDrawer::new(io::stdout(), TerminalDrawerOptions::default())?;
        let dimensions = WindowSize::current()?;
        let mut surface = DeckSurface::render(self.state.deck(), &dimensions)?;
        let mut scroll = ScrollState::new(
            self.state.deck().total_slides(),
            dimensions.rows as usize,
            Duration::from_millis(self.options.scrolling.snap_delay_millis),
        );
        loop {
            self.render(&mut drawer, &surface, &scroll)?;

            loop {
                let side_effect = match self.commands.try_next_command()? {
                    Some(command) => self.process_command(&mut drawer, &mut surface, &mut scroll, command)?,
                    None => match scroll.take_due_snap(Instant::now()) {
                        Some(target) => match self.animate_scroll(&mut drawer, &surface, &mut scroll, target)? {
                            Some(command) => {
                                self.process_command(&mut drawer, &mut surface, &mut scroll, command)?
                            }
                            None => CommandSideEffect::Redraw,
                        },
                        None => CommandSideEffect::None,
                    },
                };
                match side_effect {
                    CommandSideEffect::Exit => return Ok(()),
                    CommandSideEffect::Suspend => {
                        self.suspend(&mut drawer);
                        break;
                    }
                    CommandSideEffect::Redraw => break,
                    CommandSideEffect::ScrollTo(_) => panic!("scroll must be processed before this point"),
                    CommandSideEffect::None => (),
                }
            }
        }
    }

    /// Apply a command and run any scroll animations it triggers, chaining into whatever command
    /// interrupts them.
    fn process_command(
        &mut self,
        drawer: &mut TerminalDrawer<Stdout>,
        surface: &mut DeckSurface,
        scroll: &mut ScrollState,
        command: Command,
    ) -> Result<CommandSideEffect, PresentationError> {
        let mut command = command;
        loop {
            match self.apply_command(surface, scroll, command)? {
                CommandSideEffect::ScrollTo(target) => {
                    match self.animate_scroll(drawer, surface, scroll, target)? {
                        Some(next) => command = next,
                        None => return Ok(CommandSideEffect::Redraw),
                    }
                }
                side_effect => return Ok(side_effect),
            }
        }
    }

    fn render(&self, drawer: &mut TerminalDrawer<Stdout>, surface: &DeckSurface, scroll: &ScrollState) -> RenderResult {
        let result = match &self.state {
            PresenterState::Presenting(deck) => Self::render_deck(drawer, deck, surface, scroll),
            PresenterState::SlideIndex(deck) => {
                Self::render_deck(drawer, deck, surface, scroll)?;
                drawer.render_operations(deck.iter_slide_index_operations())
            }
            PresenterState::KeyBindings(deck) => {
                Self::render_deck(drawer, deck, surface, scroll)?;
                drawer.render_operations(deck.iter_bindings_operations())
            }
            PresenterState::Empty => panic!("cannot render without state"),
        };
        // If the screen is too small, simply ignore this. Eventually the user will resize the
        // screen and we'll render properly.
        match result {
            Err(RenderError::TerminalTooSmall) => Ok(()),
            other => other,
        }
    }

    fn render_deck(
        drawer: &mut TerminalDrawer<Stdout>,
        deck: &Deck,
        surface: &DeckSurface,
        scroll: &ScrollState,
    ) -> RenderResult {
        if scroll.is_aligned_to(deck.current_slide_index()) {
            drawer.render_operations(deck.current_slide().iter_operations())
        } else {
            Self::render_frame(drawer, surface, scroll.offset())
        }
    }

    fn render_frame(drawer: &mut TerminalDrawer<Stdout>, surface: &DeckSurface, offset: usize) -> RenderResult {
        let frame = surface.frame_at(offset);
        let commands = frame.build_commands();
        let terminal = &mut drawer.terminal;
        terminal.execute(&TerminalCommand::BeginUpdate)?;
        for command in &commands {
            terminal.execute(command)?;
        }
        terminal.execute(&TerminalCommand::EndUpdate)?;
        terminal.execute(&TerminalCommand::Flush)?;
        Ok(())
    }

    fn apply_command(
        &mut self,
        surface: &mut DeckSurface,
        scroll: &mut ScrollState,
        command: Command,
    ) -> Result<CommandSideEffect, PresentationError> {
        // These ones always happen no matter our state.
        match command {
            Command::Redraw => {
                let dimensions = WindowSize::current()?;
                match DeckSurface::render(self.state.deck(), &dimensions) {
                    Ok(rebuilt) => {
                        *surface = rebuilt;
                        scroll.resize(dimensions.rows as usize, self.state.deck().current_slide_index());
                    }
                    // Keep the stale surface if the new size can't fit a slide; the render path
                    // already knows how to deal with tiny screens.
                    Err(RenderError::TerminalTooSmall) => (),
                    Err(e) => return Err(e.into()),
                }
                return Ok(CommandSideEffect::Redraw);
            }
            Command::Exit => return Ok(CommandSideEffect::Exit),
            Command::Suspend => return Ok(CommandSideEffect::Suspend),
            _ => (),
        };

        // Now apply the commands that require a deck.
        let deck = match &mut self.state {
            PresenterState::Presenting(deck)
            | PresenterState::SlideIndex(deck)
            | PresenterState::KeyBindings(deck) => deck,
            PresenterState::Empty => panic!("state is empty"),
        };
        let side_effect = match command {
            Command::Next => {
                deck.jump_next();
                Self::scroll_to_current_slide(deck, scroll)
            }
            Command::Previous => {
                deck.jump_previous();
                Self::scroll_to_current_slide(deck, scroll)
            }
            Command::FirstSlide => {
                deck.jump_first_slide();
                Self::scroll_to_current_slide(deck, scroll)
            }
            Command::LastSlide => {
                deck.jump_last_slide();
                Self::scroll_to_current_slide(deck, scroll)
            }
            Command::GoToSlide(number) => {
                deck.go_to_slide(number.saturating_sub(1) as usize);
                Self::scroll_to_current_slide(deck, scroll)
            }
            Command::ScrollUp => Self::wheel_scroll(deck, scroll, -(self.options.scrolling.wheel_rows as isize)),
            Command::ScrollDown => Self::wheel_scroll(deck, scroll, self.options.scrolling.wheel_rows as isize),
            Command::Click { column, row } => {
                let layout = IndicatorLayout::new(deck.total_slides());
                match layout.hit_test(column, row, surface.dimensions()) {
                    Some(IndicatorTarget::Previous) => {
                        deck.jump_previous();
                        Self::scroll_to_current_slide(deck, scroll)
                    }
                    Some(IndicatorTarget::Next) => {
                        deck.jump_next();
                        Self::scroll_to_current_slide(deck, scroll)
                    }
                    Some(IndicatorTarget::Slide(index)) => {
                        deck.go_to_slide(index);
                        Self::scroll_to_current_slide(deck, scroll)
                    }
                    None => CommandSideEffect::None,
                }
            }
            Command::ToggleSlideIndex => {
                self.toggle_slide_index();
                CommandSideEffect::Redraw
            }
            Command::ToggleKeyBindingsConfig => {
                self.toggle_key_bindings();
                CommandSideEffect::Redraw
            }
            Command::CloseModal => {
                let deck = mem::take(&mut self.state).into_deck();
                self.state = PresenterState::Presenting(deck);
                CommandSideEffect::Redraw
            }
            // These were already handled above.
            Command::Redraw | Command::Exit | Command::Suspend => panic!("unreachable commands"),
        };
        Ok(side_effect)
    }

    /// Queue a scroll towards the current slide, superseding any pending snap.
    fn scroll_to_current_slide(deck: &Deck, scroll: &mut ScrollState) -> CommandSideEffect {
        scroll.cancel_snap();
        CommandSideEffect::ScrollTo(scroll.slide_offset(deck.current_slide_index()))
    }

    /// Scroll by a wheel delta, letting the slide index follow the offset.
    fn wheel_scroll(deck: &mut Deck, scroll: &mut ScrollState, delta: isize) -> CommandSideEffect {
        scroll.scroll_by(delta);
        deck.go_to_slide(scroll.derived_index());
        CommandSideEffect::Redraw
    }

    /// Animate the scroll offset towards a target, bailing out early if a command comes in.
    ///
    /// A command that interrupts the animation jumps the offset to its destination and is handed
    /// back to the caller so it's applied on the final state.
    fn animate_scroll(
        &mut self,
        drawer: &mut TerminalDrawer<Stdout>,
        surface: &DeckSurface,
        scroll: &mut ScrollState,
        target: usize,
    ) -> Result<Option<Command>, PresentationError> {
        let frames = self.options.scrolling.frames;
        let animation = ScrollAnimation::new(scroll.offset(), target, frames);
        let delay = Duration::from_millis(self.options.scrolling.duration_millis) / frames.max(1) as u32;
        for frame in 1..=animation.total_frames() {
            scroll.set_offset(animation.offset_at(frame));
            Self::render_frame(drawer, surface, scroll.offset())?;
            if let Some(command) = self.commands.poll_next_command(delay)? {
                scroll.set_offset(animation.destination());
                return Ok(Some(command));
            }
        }
        scroll.set_offset(animation.destination());
        Ok(None)
    }

    fn toggle_slide_index(&mut self) {
        let state = mem::take(&mut self.state);
        match state {
            PresenterState::Presenting(deck) | PresenterState::KeyBindings(deck) => {
                self.state = PresenterState::SlideIndex(deck)
            }
            PresenterState::SlideIndex(deck) => self.state = PresenterState::Presenting(deck),
            other => self.state = other,
        };
    }

    fn toggle_key_bindings(&mut self) {
        let state = mem::take(&mut self.state);
        match state {
            PresenterState::Presenting(deck) | PresenterState::SlideIndex(deck) => {
                self.state = PresenterState::KeyBindings(deck)
            }
            PresenterState::KeyBindings(deck) => self.state = PresenterState::Presenting(deck),
            other => self.state = other,
        };
    }

    fn suspend(&self, drawer: &mut TerminalDrawer<Stdout>) {
        #[cfg(unix)]
        unsafe {
            drawer.terminal.suspend();
            libc::raise(libc::SIGTSTP);
            drawer.terminal.resume();
        }
    }
}

/// The presenter's state.
#[derive(Default)]
enum PresenterState {
    #[default]
    Empty,
    Presenting(Deck),
    SlideIndex(Deck),
    KeyBindings(Deck),
}

impl PresenterState {
    fn deck(&self) -> &Deck {
        match self {
            Self::Presenting(deck) | Self::SlideIndex(deck) | Self::KeyBindings(deck) => deck,
            Self::Empty => panic!("state is empty"),
        }
    }

    fn into_deck(self) -> Deck {
        match self {
            Self::Presenting(deck) | Self::SlideIndex(deck) | Self::KeyBindings(deck) => deck,
            Self::Empty => panic!("state is empty"),
        }
    }
}

/// A side effect of applying a command.
#[derive(Debug)]
enum CommandSideEffect {
    Exit,
    Suspend,
    Redraw,
    ScrollTo(usize),
    None,
}

/// An error when presenting a deck.
#[derive(thiserror::Error, Debug)]
pub enum PresentationError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    InvalidTheme(#[from] ProcessingThemeError),

    #[error("io: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    fn build(theme: &raw::DeckTheme) -> (Presenter<'_>, DeckSurface, ScrollState) {
        let clean = DeckTheme::new(theme).expect("invalid theme");
        let deck = DeckBuilder::new(&clean, &KeyBindingsConfig::default()).build();
        let dimensions = WindowSize { rows: 24, columns: 80 };
        let surface = DeckSurface::render(&deck, &dimensions).expect("rendering surface");
        let scroll = ScrollState::new(deck.total_slides(), dimensions.rows as usize, Duration::from_millis(250));

        let commands = CommandListener::new(KeyBindingsConfig::default()).expect("invalid bindings");
        let mut presenter = Presenter::new(theme, commands, PresenterOptions::default());
        presenter.state = PresenterState::Presenting(deck);
        (presenter, surface, scroll)
    }

    fn apply(
        presenter: &mut Presenter<'_>,
        surface: &mut DeckSurface,
        scroll: &mut ScrollState,
        command: Command,
    ) -> CommandSideEffect {
        presenter.apply_command(surface, scroll, command).expect("applying command")
    }

    #[test]
    fn jumps_scroll_to_the_target_slide() {
        let theme = raw::DeckTheme::default();
        let (mut presenter, mut surface, mut scroll) = build(&theme);

        let effect = apply(&mut presenter, &mut surface, &mut scroll, Command::Next);
        assert!(matches!(effect, CommandSideEffect::ScrollTo(24)), "unexpected side effect {effect:?}");
        assert_eq!(presenter.state.deck().current_slide_index(), 1);

        let effect = apply(&mut presenter, &mut surface, &mut scroll, Command::LastSlide);
        assert!(matches!(effect, CommandSideEffect::ScrollTo(216)), "unexpected side effect {effect:?}");
        assert_eq!(presenter.state.deck().current_slide_index(), 9);

        let effect = apply(&mut presenter, &mut surface, &mut scroll, Command::FirstSlide);
        assert!(matches!(effect, CommandSideEffect::ScrollTo(0)), "unexpected side effect {effect:?}");
        assert_eq!(presenter.state.deck().current_slide_index(), 0);
    }

    #[test]
    fn go_to_slide_is_one_based_and_clamped() {
        let theme = raw::DeckTheme::default();
        let (mut presenter, mut surface, mut scroll) = build(&theme);

        apply(&mut presenter, &mut surface, &mut scroll, Command::GoToSlide(3));
        assert_eq!(presenter.state.deck().current_slide_index(), 2);

        apply(&mut presenter, &mut surface, &mut scroll, Command::GoToSlide(9999));
        assert_eq!(presenter.state.deck().current_slide_index(), 9);

        apply(&mut presenter, &mut surface, &mut scroll, Command::GoToSlide(0));
        assert_eq!(presenter.state.deck().current_slide_index(), 0);
    }

    #[test]
    fn wheel_scrolls_the_surface() {
        let theme = raw::DeckTheme::default();
        let (mut presenter, mut surface, mut scroll) = build(&theme);

        let effect = apply(&mut presenter, &mut surface, &mut scroll, Command::ScrollDown);
        assert!(matches!(effect, CommandSideEffect::Redraw), "unexpected side effect {effect:?}");
        assert_eq!(scroll.offset(), 3);
        assert_eq!(presenter.state.deck().current_slide_index(), 0);

        let effect = apply(&mut presenter, &mut surface, &mut scroll, Command::ScrollUp);
        assert!(matches!(effect, CommandSideEffect::Redraw), "unexpected side effect {effect:?}");
        assert_eq!(scroll.offset(), 0);
    }

    #[test]
    fn wheel_scrolling_updates_the_slide_index() {
        let theme = raw::DeckTheme::default();
        let (mut presenter, mut surface, mut scroll) = build(&theme);

        // 15 rows in: past the half viewport mark, so we're on slide 1 territory.
        for _ in 0..5 {
            apply(&mut presenter, &mut surface, &mut scroll, Command::ScrollDown);
        }
        assert_eq!(scroll.offset(), 15);
        assert_eq!(presenter.state.deck().current_slide_index(), 1);
    }

    #[test]
    fn clicks_on_the_indicator_jump() {
        let theme = raw::DeckTheme::default();
        let (mut presenter, mut surface, mut scroll) = build(&theme);

        // 10 slides on an 80 column screen: the indicator starts at column 28, dot N sits at
        // column 30 + 2N, and the arrows sit at both ends.
        let effect = apply(&mut presenter, &mut surface, &mut scroll, Command::Click { column: 38, row: 23 });
        assert!(matches!(effect, CommandSideEffect::ScrollTo(96)), "unexpected side effect {effect:?}");
        assert_eq!(presenter.state.deck().current_slide_index(), 4);

        let effect = apply(&mut presenter, &mut surface, &mut scroll, Command::Click { column: 28, row: 23 });
        assert!(matches!(effect, CommandSideEffect::ScrollTo(72)), "unexpected side effect {effect:?}");
        assert_eq!(presenter.state.deck().current_slide_index(), 3);

        let effect = apply(&mut presenter, &mut surface, &mut scroll, Command::Click { column: 50, row: 23 });
        assert!(matches!(effect, CommandSideEffect::ScrollTo(96)), "unexpected side effect {effect:?}");
        assert_eq!(presenter.state.deck().current_slide_index(), 4);

        let effect = apply(&mut presenter, &mut surface, &mut scroll, Command::Click { column: 0, row: 0 });
        assert!(matches!(effect, CommandSideEffect::None), "unexpected side effect {effect:?}");
        assert_eq!(presenter.state.deck().current_slide_index(), 4);
    }

    #[test]
    fn toggling_modals() {
        let theme = raw::DeckTheme::default();
        let (mut presenter, mut surface, mut scroll) = build(&theme);

        apply(&mut presenter, &mut surface, &mut scroll, Command::ToggleSlideIndex);
        assert!(matches!(presenter.state, PresenterState::SlideIndex(_)));

        // Opening another modal replaces the current one.
        apply(&mut presenter, &mut surface, &mut scroll, Command::ToggleKeyBindingsConfig);
        assert!(matches!(presenter.state, PresenterState::KeyBindings(_)));

        apply(&mut presenter, &mut surface, &mut scroll, Command::ToggleKeyBindingsConfig);
        assert!(matches!(presenter.state, PresenterState::Presenting(_)));

        apply(&mut presenter, &mut surface, &mut scroll, Command::ToggleSlideIndex);
        apply(&mut presenter, &mut surface, &mut scroll, Command::CloseModal);
        assert!(matches!(presenter.state, PresenterState::Presenting(_)));
    }

    #[test]
    fn exit_side_effect() {
        let theme = raw::DeckTheme::default();
        let (mut presenter, mut surface, mut scroll) = build(&theme);

        let effect = apply(&mut presenter, &mut surface, &mut scroll, Command::Exit);
        assert!(matches!(effect, CommandSideEffect::Exit), "unexpected side effect {effect:?}");
    }
}
