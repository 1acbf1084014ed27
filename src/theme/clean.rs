use super::{AuthorPositioning, FooterTemplate, Margin, raw};
use crate::text::style::{Color, TextStyle, UndefinedPaletteColorError};
use std::collections::BTreeMap;

const DEFAULT_FOOTER_HEIGHT: u16 = 3;
const DEFAULT_CHART_HEIGHT: u16 = 10;

#[derive(Clone, Debug)]
pub(crate) struct DeckTheme {
    pub(crate) slide_title: SlideTitleStyle,
    pub(crate) default_style: DefaultStyle,
    pub(crate) headings: HeadingStyles,
    pub(crate) intro_slide: IntroSlideStyle,
    pub(crate) footer: FooterStyle,
    pub(crate) chart: ChartStyle,
    pub(crate) modals: ModalStyle,
    pub(crate) palette: ColorPalette,
}

impl DeckTheme {
    pub(crate) fn new(raw: &raw::DeckTheme) -> Result<Self, ProcessingThemeError> {
        let raw::DeckTheme {
            slide_title,
            default_style,
            headings,
            intro_slide,
            footer,
            chart,
            modals,
            palette,
            extends: _,
        } = raw;

        let palette = ColorPalette::try_from(palette)?;
        let default_style = DefaultStyle::new(default_style, &palette)?;
        Ok(Self {
            slide_title: SlideTitleStyle::new(slide_title, &palette)?,
            default_style: default_style.clone(),
            headings: HeadingStyles::new(headings, &palette)?,
            intro_slide: IntroSlideStyle::new(intro_slide, &palette)?,
            footer: FooterStyle::new(&footer.clone().unwrap_or_default(), &palette)?,
            chart: ChartStyle::new(chart, &palette)?,
            modals: ModalStyle::new(modals, &default_style, &palette)?,
            palette,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingThemeError {
    #[error(transparent)]
    Palette(#[from] UndefinedPaletteColorError),

    #[error("palette cannot contain other palette colors")]
    PaletteColorInPalette,
}

#[derive(Clone, Debug)]
pub(crate) struct SlideTitleStyle {
    pub(crate) alignment: Alignment,
    pub(crate) separator: bool,
    pub(crate) padding_top: u8,
    pub(crate) padding_bottom: u8,
    pub(crate) style: TextStyle,
}

impl SlideTitleStyle {
    fn new(raw: &raw::SlideTitleStyle, palette: &ColorPalette) -> Result<Self, ProcessingThemeError> {
        let raw::SlideTitleStyle { alignment, separator, padding_top, padding_bottom, colors, bold, italics, underlined } =
            raw;
        let mut style = TextStyle::colored(colors.resolve(palette)?);
        if bold.unwrap_or_default() {
            style = style.bold();
        }
        if italics.unwrap_or_default() {
            style = style.italics();
        }
        if underlined.unwrap_or_default() {
            style = style.underlined();
        }
        Ok(Self {
            alignment: alignment.clone().unwrap_or_default().into(),
            separator: *separator,
            padding_top: padding_top.unwrap_or_default(),
            padding_bottom: padding_bottom.unwrap_or_default(),
            style,
        })
    }
}

#[derive(Clone, Debug)]
pub(crate) struct HeadingStyles {
    pub(crate) h1: HeadingStyle,
    pub(crate) h2: HeadingStyle,
}

impl HeadingStyles {
    fn new(raw: &raw::HeadingStyles, palette: &ColorPalette) -> Result<Self, ProcessingThemeError> {
        let raw::HeadingStyles { h1, h2 } = raw;
        Ok(Self { h1: HeadingStyle::new(h1, palette)?, h2: HeadingStyle::new(h2, palette)? })
    }
}

#[derive(Clone, Debug)]
pub(crate) struct HeadingStyle {
    pub(crate) alignment: Alignment,
    pub(crate) prefix: Option<String>,
    pub(crate) style: TextStyle,
}

impl HeadingStyle {
    fn new(raw: &raw::HeadingStyle, palette: &ColorPalette) -> Result<Self, ProcessingThemeError> {
        let raw::HeadingStyle { alignment, prefix, colors } = raw;
        let alignment = alignment.clone().unwrap_or_default().into();
        let style = TextStyle::colored(colors.resolve(palette)?);
        Ok(Self { alignment, prefix: prefix.clone(), style })
    }
}

#[derive(Clone, Debug)]
pub(crate) struct IntroSlideStyle {
    pub(crate) title: IntroSlideLabelStyle,
    pub(crate) subtitle: IntroSlideLabelStyle,
    pub(crate) date: IntroSlideLabelStyle,
    pub(crate) author: AuthorStyle,
    pub(crate) footer: bool,
}

impl IntroSlideStyle {
    fn new(raw: &raw::IntroSlideStyle, palette: &ColorPalette) -> Result<Self, ProcessingThemeError> {
        let raw::IntroSlideStyle { title, subtitle, author, date, footer } = raw;
        Ok(Self {
            title: IntroSlideLabelStyle::new(title, palette)?,
            subtitle: IntroSlideLabelStyle::new(subtitle, palette)?,
            date: IntroSlideLabelStyle::new(date, palette)?,
            author: AuthorStyle::new(author, palette)?,
            footer: footer.unwrap_or(true),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct IntroSlideLabelStyle {
    pub(crate) alignment: Alignment,
    pub(crate) style: TextStyle,
}

impl IntroSlideLabelStyle {
    fn new(raw: &raw::BasicStyle, palette: &ColorPalette) -> Result<Self, ProcessingThemeError> {
        let raw::BasicStyle { alignment, colors } = raw;
        let style = TextStyle::colored(colors.resolve(palette)?);
        Ok(Self { alignment: alignment.clone().unwrap_or_default().into(), style })
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct AuthorStyle {
    pub(crate) alignment: Alignment,
    pub(crate) style: TextStyle,
    pub(crate) positioning: AuthorPositioning,
}

impl AuthorStyle {
    fn new(raw: &raw::AuthorStyle, palette: &ColorPalette) -> Result<Self, ProcessingThemeError> {
        let raw::AuthorStyle { alignment, colors, positioning } = raw;
        let style = TextStyle::colored(colors.resolve(palette)?);
        Ok(Self { alignment: alignment.clone().unwrap_or_default().into(), style, positioning: positioning.clone() })
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct DefaultStyle {
    pub(crate) margin: Margin,
    pub(crate) style: TextStyle,
}

impl DefaultStyle {
    fn new(raw: &raw::DefaultStyle, palette: &ColorPalette) -> Result<Self, ProcessingThemeError> {
        let raw::DefaultStyle { margin, colors } = raw;
        let margin = margin.clone().unwrap_or_default();
        let style = TextStyle::colored(colors.resolve(palette)?);
        Ok(Self { margin, style })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Alignment {
    Left { margin: Margin },
    Right { margin: Margin },
    Center { minimum_margin: Margin, minimum_size: u16 },
}

impl From<raw::Alignment> for Alignment {
    fn from(alignment: raw::Alignment) -> Self {
        match alignment {
            raw::Alignment::Left { margin } => Self::Left { margin },
            raw::Alignment::Right { margin } => Self::Right { margin },
            raw::Alignment::Center { minimum_margin, minimum_size } => Self::Center { minimum_margin, minimum_size },
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::Left { margin: Margin::Fixed(0) }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum FooterStyle {
    Indicators { active: TextStyle, inactive: TextStyle, arrows: TextStyle, disabled: TextStyle },
    Template { left: Option<FooterTemplate>, center: Option<FooterTemplate>, right: Option<FooterTemplate>, style: TextStyle },
    Empty,
}

impl FooterStyle {
    fn new(raw: &raw::FooterStyle, palette: &ColorPalette) -> Result<Self, ProcessingThemeError> {
        match raw {
            raw::FooterStyle::Indicators { active, inactive, arrows, disabled } => {
                let resolve = |color: &Option<Color>, default| -> Result<Color, ProcessingThemeError> {
                    Ok(color.as_ref().map(|c| c.resolve(palette)).transpose()?.unwrap_or(default))
                };
                let active = TextStyle::default().fg_color(resolve(active, Color::White)?);
                let inactive = TextStyle::default().fg_color(resolve(inactive, Color::DarkGrey)?);
                let arrows = TextStyle::default().fg_color(resolve(arrows, Color::Grey)?);
                let disabled = TextStyle::default().fg_color(resolve(disabled, Color::DarkGrey)?).dimmed();
                Ok(Self::Indicators { active, inactive, arrows, disabled })
            }
            raw::FooterStyle::Template { left, center, right, colors } => {
                let style = TextStyle::colored(colors.resolve(palette)?);
                Ok(Self::Template { left: left.clone(), center: center.clone(), right: right.clone(), style })
            }
            raw::FooterStyle::Empty => Ok(Self::Empty),
        }
    }

    pub(crate) fn height(&self) -> u16 {
        match self {
            Self::Empty => 0,
            _ => DEFAULT_FOOTER_HEIGHT,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ChartStyle {
    pub(crate) primary_style: TextStyle,
    pub(crate) secondary_style: TextStyle,
    pub(crate) axis_style: TextStyle,
    pub(crate) height: u16,
}

impl ChartStyle {
    fn new(raw: &raw::ChartStyle, palette: &ColorPalette) -> Result<Self, ProcessingThemeError> {
        let raw::ChartStyle { primary_color, secondary_color, axis_color, height } = raw;
        let resolve = |color: &Option<Color>, default| -> Result<Color, ProcessingThemeError> {
            Ok(color.as_ref().map(|c| c.resolve(palette)).transpose()?.unwrap_or(default))
        };
        Ok(Self {
            primary_style: TextStyle::default().fg_color(resolve(primary_color, Color::Cyan)?),
            secondary_style: TextStyle::default().fg_color(resolve(secondary_color, Color::Magenta)?),
            axis_style: TextStyle::default().fg_color(resolve(axis_color, Color::Grey)?),
            height: height.unwrap_or(DEFAULT_CHART_HEIGHT),
        })
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ModalStyle {
    pub(crate) style: TextStyle,
    pub(crate) selection_style: TextStyle,
}

impl ModalStyle {
    fn new(
        raw: &raw::ModalStyle,
        default_style: &DefaultStyle,
        palette: &ColorPalette,
    ) -> Result<Self, ProcessingThemeError> {
        let raw::ModalStyle { colors, selection_colors } = raw;
        let mut style = default_style.style;
        style.merge(&TextStyle::colored(colors.resolve(palette)?));

        let mut selection_style = style.bold();
        selection_style.merge(&TextStyle::colored(selection_colors.resolve(palette)?));
        Ok(Self { style, selection_style })
    }
}

/// The color palette.
#[derive(Clone, Debug, Default)]
pub(crate) struct ColorPalette {
    pub(crate) colors: BTreeMap<String, Color>,
}

impl TryFrom<&raw::ColorPalette> for ColorPalette {
    type Error = ProcessingThemeError;

    fn try_from(palette: &raw::ColorPalette) -> Result<Self, Self::Error> {
        let mut colors = BTreeMap::new();
        for (name, color) in &palette.colors {
            if matches!(color, Color::Palette(_)) {
                return Err(ProcessingThemeError::PaletteColorInPalette);
            }
            colors.insert(name.to_string(), *color);
        }
        Ok(Self { colors })
    }
}
