use crate::{
    deck::Deck,
    render::{
        RenderError,
        engine::{RenderEngine, RenderEngineOptions},
        properties::WindowSize,
    },
    terminal::{
        printer::TerminalCommand,
        virt::{TerminalGrid, TerminalRowIterator, VirtualTerminal},
    },
    text::Line,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

pub(crate) mod animation;

/// The deck's slides, pre-rendered and stacked vertically.
///
/// Any scroll offset into the stack can be turned into a displayable frame, which is how both
/// slide transitions and free wheel scrolling get drawn.
pub(crate) struct DeckSurface {
    grid: TerminalGrid,
    dimensions: WindowSize,
}

impl DeckSurface {
    pub(crate) fn render(deck: &Deck, dimensions: &WindowSize) -> Result<Self, RenderError> {
        let mut grids = Vec::new();
        for slide in deck.iter_slides() {
            let mut terminal = VirtualTerminal::new(dimensions.clone());
            let engine = RenderEngine::new(&mut terminal, dimensions.clone(), RenderEngineOptions::default());
            engine.render(slide.iter_operations())?;
            grids.push(terminal.into_contents());
        }
        Ok(Self::new(grids, dimensions.clone()))
    }

    fn new(grids: Vec<TerminalGrid>, dimensions: WindowSize) -> Self {
        let mut rows = Vec::new();
        let mut background_color = None;
        for grid in grids {
            background_color = background_color.or(grid.background_color);
            rows.extend(grid.rows);
        }
        let grid = TerminalGrid { rows, background_color };
        Self { grid, dimensions }
    }

    pub(crate) fn max_offset(&self) -> usize {
        self.grid.rows.len().saturating_sub(self.dimensions.rows as usize)
    }

    pub(crate) fn dimensions(&self) -> &WindowSize {
        &self.dimensions
    }

    /// Extract the frame visible at the given offset.
    pub(crate) fn frame_at(&self, offset: usize) -> LinesFrame {
        let offset = offset.min(self.max_offset());
        let end = (offset + self.dimensions.rows as usize).min(self.grid.rows.len());
        let mut lines = Vec::new();
        for row in &self.grid.rows[offset..end] {
            lines.push(Line(TerminalRowIterator::new(row).collect()));
        }
        LinesFrame { lines, background_color: self.grid.background_color }
    }
}

/// A single displayable frame.
#[derive(Debug)]
pub(crate) struct LinesFrame {
    pub(crate) lines: Vec<Line>,
    pub(crate) background_color: Option<crate::text::style::Color>,
}

impl LinesFrame {
    fn skip_whitespace(mut text: &str) -> (&str, usize, usize) {
        let mut trimmed_before = 0;
        while let Some(' ') = text.chars().next() {
            text = &text[1..];
            trimmed_before += 1;
        }
        let mut trimmed_after = 0;
        let mut rev = text.chars().rev();
        while let Some(' ') = rev.next() {
            text = &text[..text.len() - 1];
            trimmed_after += 1;
        }
        (text, trimmed_before, trimmed_after)
    }

    pub(crate) fn build_commands(&self) -> Vec<TerminalCommand> {
        use TerminalCommand::*;
        let mut commands = vec![];
        if let Some(color) = self.background_color {
            commands.push(SetBackgroundColor(color));
        }
        commands.push(ClearScreen);
        for (row, line) in self.lines.iter().enumerate() {
            let mut column = 0;
            let mut is_in_column = false;
            let mut is_in_row = false;
            for chunk in &line.0 {
                let (text, white_before, white_after) = match chunk.style.colors.background {
                    Some(_) => (chunk.content.as_str(), 0, 0),
                    None => Self::skip_whitespace(&chunk.content),
                };
                // If this is an empty line just skip it
                if text.is_empty() {
                    column += chunk.content.width();
                    is_in_column = false;
                    continue;
                }
                if !is_in_row {
                    commands.push(MoveToRow(row as u16));
                    is_in_row = true;
                }
                if white_before > 0 {
                    column += white_before;
                    is_in_column = false;
                }
                if !is_in_column {
                    commands.push(MoveToColumn(column as u16));
                    is_in_column = true;
                }
                commands.push(PrintText { content: text, style: chunk.style });
                column += text.width();
                if white_after > 0 {
                    column += white_after;
                    is_in_column = false;
                }
            }
        }
        commands
    }
}

/// The scroll position over a [DeckSurface].
#[derive(Debug)]
pub(crate) struct ScrollState {
    offset: usize,
    viewport_rows: usize,
    total_slides: usize,
    snap_delay: Duration,
    pending_snap: Option<Instant>,
}

impl ScrollState {
    pub(crate) fn new(total_slides: usize, viewport_rows: usize, snap_delay: Duration) -> Self {
        Self { offset: 0, viewport_rows, total_slides, snap_delay, pending_snap: None }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn max_offset(&self) -> usize {
        self.total_slides.saturating_sub(1) * self.viewport_rows
    }

    /// The offset at which the given slide sits.
    pub(crate) fn slide_offset(&self, slide_index: usize) -> usize {
        slide_index.min(self.total_slides.saturating_sub(1)) * self.viewport_rows
    }

    /// The slide index the current offset maps to, rounding to the nearest boundary.
    pub(crate) fn derived_index(&self) -> usize {
        if self.viewport_rows == 0 {
            return 0;
        }
        let index = (self.offset + self.viewport_rows / 2) / self.viewport_rows;
        index.min(self.total_slides.saturating_sub(1))
    }

    pub(crate) fn is_aligned_to(&self, slide_index: usize) -> bool {
        self.offset == self.slide_offset(slide_index)
    }

    /// Move the offset by a row delta, clamping at the surface's edges, and arm the snap timer.
    pub(crate) fn scroll_by(&mut self, delta: isize) {
        let offset = self.offset.saturating_add_signed(delta);
        self.offset = offset.min(self.max_offset());
        self.pending_snap = Some(Instant::now() + self.snap_delay);
    }

    /// Set the offset directly, without arming the snap timer.
    pub(crate) fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
    }

    pub(crate) fn cancel_snap(&mut self) {
        self.pending_snap = None;
    }

    /// Take the snap target if the timer is due and we're off a slide boundary.
    pub(crate) fn take_due_snap(&mut self, now: Instant) -> Option<usize> {
        let deadline = self.pending_snap?;
        if now < deadline {
            return None;
        }
        self.pending_snap = None;
        let target = self.slide_offset(self.derived_index());
        match target == self.offset {
            true => None,
            false => Some(target),
        }
    }

    /// Adopt a new viewport size, re-aligning the offset to the given slide.
    pub(crate) fn resize(&mut self, viewport_rows: usize, slide_index: usize) {
        self.viewport_rows = viewport_rows;
        self.offset = self.slide_offset(slide_index);
        self.pending_snap = None;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        terminal::virt::StyledChar,
        text::{Text, style::Color},
    };
    use rstest::rstest;

    fn build_grid(rows: &[&str]) -> TerminalGrid {
        let rows = rows
            .iter()
            .map(|row| row.chars().map(|character| StyledChar { character, style: Default::default() }).collect())
            .collect();
        TerminalGrid { rows, background_color: None }
    }

    fn build_surface() -> DeckSurface {
        let grids = vec![build_grid(&["AB", "CD"]), build_grid(&["EF", "GH"])];
        DeckSurface::new(grids, WindowSize { rows: 2, columns: 2 })
    }

    fn frame_text(frame: &LinesFrame) -> Vec<String> {
        frame.lines.iter().map(|line| line.0.iter().map(|text| text.content.as_str()).collect()).collect()
    }

    #[rstest]
    #[case::top(0, &["AB", "CD"])]
    #[case::straddling(1, &["CD", "EF"])]
    #[case::bottom(2, &["EF", "GH"])]
    #[case::past_the_end(100, &["EF", "GH"])]
    fn frame_extraction(#[case] offset: usize, #[case] expected: &[&str]) {
        let surface = build_surface();
        assert_eq!(frame_text(&surface.frame_at(offset)), expected);
    }

    #[test]
    fn surface_offsets() {
        let surface = build_surface();
        assert_eq!(surface.max_offset(), 2);
    }

    #[test]
    fn commands() {
        let frame = LinesFrame {
            lines: vec![
                Line(vec![Text::from("  hi  "), Text::from("bye"), Text::from("s")]),
                Line(vec![Text::from("hello"), Text::from(" wor"), Text::from("s")]),
            ],
            background_color: Some(Color::Red),
        };
        let commands = frame.build_commands();
        use TerminalCommand::*;
        let expected = &[
            SetBackgroundColor(Color::Red),
            ClearScreen,
            MoveToRow(0),
            MoveToColumn(2),
            PrintText { content: "hi", style: Default::default() },
            MoveToColumn(6),
            PrintText { content: "bye", style: Default::default() },
            PrintText { content: "s", style: Default::default() },
            MoveToRow(1),
            MoveToColumn(0),
            PrintText { content: "hello", style: Default::default() },
            MoveToColumn(6),
            PrintText { content: "wor", style: Default::default() },
            PrintText { content: "s", style: Default::default() },
        ];
        assert_eq!(commands, expected);
    }

    fn build_state() -> ScrollState {
        ScrollState::new(10, 20, Duration::from_millis(250))
    }

    #[rstest]
    #[case::at_the_top(0, 0)]
    #[case::just_below_a_boundary(9, 0)]
    #[case::halfway(10, 1)]
    #[case::exact_boundary(60, 3)]
    #[case::last_slide(180, 9)]
    fn index_derivation(#[case] offset: usize, #[case] expected: usize) {
        let mut state = build_state();
        state.set_offset(offset);
        assert_eq!(state.derived_index(), expected);
    }

    #[test]
    fn scrolling_clamps() {
        let mut state = build_state();
        state.scroll_by(-3);
        assert_eq!(state.offset(), 0);
        state.scroll_by(10_000);
        assert_eq!(state.offset(), state.max_offset());
    }

    #[test]
    fn wheel_scrolls_arm_the_snap_timer() {
        let mut state = build_state();
        state.scroll_by(3);
        assert_eq!(state.take_due_snap(Instant::now()), None);
        let past_deadline = Instant::now() + Duration::from_secs(1);
        assert_eq!(state.take_due_snap(past_deadline), Some(0));
        // The timer was consumed.
        assert_eq!(state.take_due_snap(past_deadline), None);
    }

    #[test]
    fn aligned_snaps_are_dropped() {
        let mut state = build_state();
        state.scroll_by(20);
        let past_deadline = Instant::now() + Duration::from_secs(1);
        assert_eq!(state.take_due_snap(past_deadline), None);
        assert_eq!(state.derived_index(), 1);
    }

    #[test]
    fn set_offset_does_not_arm_the_timer() {
        let mut state = build_state();
        state.set_offset(5);
        assert_eq!(state.take_due_snap(Instant::now() + Duration::from_secs(1)), None);
    }

    #[test]
    fn resizing_keeps_the_current_slide() {
        let mut state = build_state();
        state.set_offset(60);
        state.resize(30, 3);
        assert_eq!(state.offset(), 90);
        assert_eq!(state.derived_index(), 3);
        assert!(state.is_aligned_to(3));
    }
}
