use crate::render::operation::RenderOperation;
use std::{cell::RefCell, fmt::Debug, ops::Deref, rc::Rc};

pub(crate) mod builder;
pub(crate) mod content;

#[derive(Debug)]
pub(crate) struct Modals {
    pub(crate) slide_index: Vec<RenderOperation>,
    pub(crate) bindings: Vec<RenderOperation>,
}

/// A deck.
#[derive(Debug)]
pub(crate) struct Deck {
    slides: Vec<Slide>,
    modals: Modals,
    pub(crate) state: DeckState,
}

impl Deck {
    /// Construct a new deck.
    pub(crate) fn new(slides: Vec<Slide>, modals: Modals, state: DeckState) -> Self {
        Self { slides, modals, state }
    }

    /// Iterate the slides in this deck.
    pub(crate) fn iter_slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    /// Get the current slide.
    pub(crate) fn current_slide(&self) -> &Slide {
        &self.slides[self.current_slide_index()]
    }

    /// Iterate the operations that render the slide index.
    pub(crate) fn iter_slide_index_operations(&self) -> impl Iterator<Item = &RenderOperation> {
        self.modals.slide_index.iter()
    }

    /// Iterate the operations that render the key bindings modal.
    pub(crate) fn iter_bindings_operations(&self) -> impl Iterator<Item = &RenderOperation> {
        self.modals.bindings.iter()
    }

    /// Get the current slide index.
    pub(crate) fn current_slide_index(&self) -> usize {
        self.state.current_slide_index()
    }

    /// Get the total number of slides.
    pub(crate) fn total_slides(&self) -> usize {
        self.slides.len()
    }

    /// Jump forwards, staying put if we're already at the last slide.
    pub(crate) fn jump_next(&mut self) -> bool {
        self.go_to_slide(self.current_slide_index().saturating_add(1))
    }

    /// Jump backwards, staying put if we're already at the first slide.
    pub(crate) fn jump_previous(&mut self) -> bool {
        self.go_to_slide(self.current_slide_index().saturating_sub(1))
    }

    /// Jump to the first slide.
    pub(crate) fn jump_first_slide(&mut self) -> bool {
        self.go_to_slide(0)
    }

    /// Jump to the last slide.
    pub(crate) fn jump_last_slide(&mut self) -> bool {
        self.go_to_slide(self.slides.len().saturating_sub(1))
    }

    /// Jump to a specific slide, clamping to the deck's bounds.
    ///
    /// Returns whether the current slide changed.
    pub(crate) fn go_to_slide(&mut self, slide_index: usize) -> bool {
        let slide_index = slide_index.min(self.slides.len().saturating_sub(1));
        let changed = slide_index != self.current_slide_index();
        self.state.set_current_slide_index(slide_index);
        changed
    }
}

impl From<Vec<Slide>> for Deck {
    fn from(slides: Vec<Slide>) -> Self {
        let modals = Modals { slide_index: vec![], bindings: vec![] };
        Self::new(slides, modals, Default::default())
    }
}

#[derive(Debug, Default)]
struct DeckStateInner {
    current_slide_index: usize,
}

/// The deck's state, shared with any dynamic operations that need to read it.
#[derive(Clone, Debug, Default)]
pub(crate) struct DeckState {
    inner: Rc<RefCell<DeckStateInner>>,
}

impl DeckState {
    pub(crate) fn current_slide_index(&self) -> usize {
        self.inner.deref().borrow().current_slide_index
    }

    fn set_current_slide_index(&self, value: usize) {
        self.inner.deref().borrow_mut().current_slide_index = value;
    }
}

/// A slide.
///
/// Slides are composed of render operations that can be carried out to materialize this slide into
/// the terminal's screen.
#[derive(Debug)]
pub(crate) struct Slide {
    operations: Vec<RenderOperation>,
    footer: Vec<RenderOperation>,
}

impl Slide {
    pub(crate) fn new(operations: Vec<RenderOperation>, footer: Vec<RenderOperation>) -> Self {
        Self { operations, footer }
    }

    pub(crate) fn iter_operations(&self) -> impl Iterator<Item = &RenderOperation> + Clone {
        self.operations.iter().chain(self.footer.iter())
    }
}
