use crate::{
    render::properties::WindowSize,
    text::{Line, Text, style::TextStyle},
};

const PREVIOUS_ARROW: &str = "‹";
const NEXT_ARROW: &str = "›";
const ACTIVE_DOT: &str = "●";
const INACTIVE_DOT: &str = "○";

/// The geometry of the slide indicator bar.
///
/// The bar sits on the bottom row and looks like `‹ ● ○ ○ ›`: a previous arrow, one dot per
/// slide, and a next arrow, all separated by single spaces. Drawing and click handling share this
/// type so the two can't drift apart.
#[derive(Clone, Debug)]
pub(crate) struct IndicatorLayout {
    total_slides: usize,
}

impl IndicatorLayout {
    pub(crate) fn new(total_slides: usize) -> Self {
        Self { total_slides }
    }

    /// The total width of the bar in columns.
    pub(crate) fn width(&self) -> u16 {
        self.total_slides as u16 * 2 + 3
    }

    fn start_column(&self, dimensions: &WindowSize) -> u16 {
        dimensions.columns.saturating_sub(self.width()) / 2
    }

    /// Find what lives under the given screen position, if anything.
    pub(crate) fn hit_test(&self, column: u16, row: u16, dimensions: &WindowSize) -> Option<IndicatorTarget> {
        if row.saturating_add(1) != dimensions.rows {
            return None;
        }
        let offset = column.checked_sub(self.start_column(dimensions))?;
        if offset >= self.width() {
            None
        } else if offset == 0 {
            Some(IndicatorTarget::Previous)
        } else if offset == self.width() - 1 {
            Some(IndicatorTarget::Next)
        } else if offset % 2 == 0 {
            Some(IndicatorTarget::Slide((offset / 2 - 1) as usize))
        } else {
            None
        }
    }

    /// Build the bar's contents for the given slide.
    pub(crate) fn render_line(&self, current_slide: usize, styles: &IndicatorStyles) -> Line {
        let mut chunks = Vec::with_capacity(self.total_slides * 2 + 3);
        let previous_style = if current_slide == 0 { styles.disabled } else { styles.arrows };
        chunks.push(Text::new(PREVIOUS_ARROW, previous_style));
        for index in 0..self.total_slides {
            chunks.push(Text::from(" "));
            let (dot, style) = match index == current_slide {
                true => (ACTIVE_DOT, styles.active),
                false => (INACTIVE_DOT, styles.inactive),
            };
            chunks.push(Text::new(dot, style));
        }
        chunks.push(Text::from(" "));
        let next_style = if current_slide + 1 >= self.total_slides { styles.disabled } else { styles.arrows };
        chunks.push(Text::new(NEXT_ARROW, next_style));
        Line(chunks)
    }
}

/// The styles for each part of the indicator bar.
#[derive(Clone, Debug, Default)]
pub(crate) struct IndicatorStyles {
    pub(crate) active: TextStyle,
    pub(crate) inactive: TextStyle,
    pub(crate) arrows: TextStyle,
    pub(crate) disabled: TextStyle,
}

/// What a click on the indicator bar landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IndicatorTarget {
    Previous,
    Slide(usize),
    Next,
}
