use crate::{render::properties::WindowSize, theme::Alignment};

/// Positions a line horizontally within the screen, according to an alignment.
#[derive(Debug)]
pub(crate) struct Layout {
    alignment: Alignment,
    start_column_offset: u16,
}

impl Layout {
    pub(crate) fn new(alignment: Alignment) -> Self {
        Self { alignment, start_column_offset: 0 }
    }

    pub(crate) fn with_start_column(mut self, column: u16) -> Self {
        self.start_column_offset = column;
        self
    }

    pub(crate) fn compute(&self, dimensions: &WindowSize, text_length: u16) -> Positioning {
        let mut positioning = match &self.alignment {
            Alignment::Left { margin } => Self::align_left(dimensions, margin.as_characters(dimensions.columns)),
            Alignment::Right { margin } => {
                Self::align_right(dimensions, text_length, margin.as_characters(dimensions.columns))
            }
            Alignment::Center { minimum_margin, minimum_size } => Self::align_center(
                dimensions,
                text_length,
                minimum_margin.as_characters(dimensions.columns),
                *minimum_size,
            ),
        };
        positioning.start_column += self.start_column_offset;
        positioning
    }

    fn align_left(dimensions: &WindowSize, margin: u16) -> Positioning {
        let margin = Self::applicable_margin(dimensions, margin.saturating_mul(2), margin);
        Positioning { max_line_length: dimensions.columns - margin.saturating_mul(2), start_column: margin }
    }

    fn align_right(dimensions: &WindowSize, text_length: u16, margin: u16) -> Positioning {
        let margin = Self::applicable_margin(dimensions, margin.saturating_mul(2), margin);
        let start_column = dimensions.columns.saturating_sub(margin).saturating_sub(text_length).max(margin);
        Positioning { max_line_length: (dimensions.columns - margin) - start_column, start_column }
    }

    fn align_center(dimensions: &WindowSize, text_length: u16, minimum_margin: u16, minimum_size: u16) -> Positioning {
        // Respect the minimum size as much as we can if margin and size together overflow.
        let minimum_size = dimensions.columns.min(minimum_size);
        let minimum_margin = Self::applicable_margin(
            dimensions,
            minimum_margin.saturating_mul(2).saturating_add(minimum_size),
            minimum_margin,
        );
        let max_line_length =
            text_length.min(dimensions.columns - minimum_margin.saturating_mul(2)).max(minimum_size);
        let start_column = match max_line_length > dimensions.columns {
            true => minimum_margin,
            false => ((dimensions.columns - max_line_length) / 2).max(minimum_margin),
        };
        Positioning { max_line_length, start_column }
    }

    // A margin that can't fit on screen is ignored entirely: we can't satisfy it so we might as
    // well not do anything about it.
    fn applicable_margin(dimensions: &WindowSize, required_fit: u16, margin: u16) -> u16 {
        if required_fit > dimensions.columns { 0 } else { margin }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Positioning {
    pub(crate) max_line_length: u16,
    pub(crate) start_column: u16,
}
