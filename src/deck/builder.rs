use super::{
    Deck, DeckState, Modals, Slide,
    content::{
        ASK, BUSINESS_MODEL_HEADLINE, COMPANY, COMPETITION_HEADLINE, COMPETITORS, MARKET_DATA, MARKET_HEADLINE,
        POSITIONING, PRICING_TIERS, PROBLEM, PRODUCT, PitchSection, ROUND_DATE, SOLUTION, SectionCopy, TAGLINE, TEAM,
        TEAM_HEADLINE, TRACTION_HEADLINE, TRACTION_METRICS,
    },
};
use crate::{
    config::KeyBindingsConfig,
    render::operation::{BlockLine, MarginProperties, RenderOperation},
    text::{Line, Text, style::TextStyle},
    theme::{Alignment, AuthorPositioning, DeckTheme, HeadingStyle, Margin},
    ui::{
        chart::MarketChart,
        footer::{FooterContext, FooterGenerator},
        modals::{IndexBuilder, KeyBindingsModalBuilder},
        separator::RenderSeparator,
    },
};
use std::{cell::RefCell, mem, rc::Rc};
use strum::IntoEnumIterator;
use unicode_width::UnicodeWidthStr;

const BULLET_PREFIX: &str = "   • ";

/// Builds a [Deck], one render operation at a time.
pub(crate) struct DeckBuilder<'a> {
    theme: &'a DeckTheme,
    bindings: &'a KeyBindingsConfig,
    operations: Vec<RenderOperation>,
    slides: Vec<Slide>,
    footer_context: Rc<RefCell<FooterContext>>,
    index_builder: IndexBuilder,
    state: DeckState,
    ignore_footer: bool,
}

impl<'a> DeckBuilder<'a> {
    pub(crate) fn new(theme: &'a DeckTheme, bindings: &'a KeyBindingsConfig) -> Self {
        Self {
            theme,
            bindings,
            operations: Vec::new(),
            slides: Vec::new(),
            footer_context: Default::default(),
            index_builder: Default::default(),
            state: Default::default(),
            ignore_footer: false,
        }
    }

    pub(crate) fn build(mut self) -> Deck {
        for section in PitchSection::iter() {
            self.push_section(section);
        }
        self.footer_context.replace(FooterContext {
            total_slides: self.slides.len(),
            company: COMPANY.into(),
            title: TAGLINE.into(),
            date: ROUND_DATE.into(),
        });
        let modals = Modals {
            slide_index: self.index_builder.build(self.theme, self.state.clone()),
            bindings: KeyBindingsModalBuilder.build(self.theme, self.bindings),
        };
        Deck::new(self.slides, modals, self.state)
    }

    fn push_section(&mut self, section: PitchSection) {
        self.push_slide_prelude();
        match section {
            PitchSection::Title => self.push_intro_slide(),
            PitchSection::Problem => self.push_copy_slide(section, &PROBLEM),
            PitchSection::Solution => self.push_copy_slide(section, &SOLUTION),
            PitchSection::Product => self.push_copy_slide(section, &PRODUCT),
            PitchSection::Market => self.push_market_slide(section),
            PitchSection::BusinessModel => self.push_business_model_slide(section),
            PitchSection::Traction => self.push_traction_slide(section),
            PitchSection::Competition => self.push_competition_slide(section),
            PitchSection::Team => self.push_team_slide(section),
            PitchSection::Ask => self.push_copy_slide(section, &ASK),
        };
        self.terminate_slide(section);
    }

    fn push_slide_prelude(&mut self) {
        let style = self.theme.default_style.style;
        self.operations.extend([
            RenderOperation::SetColors(style.colors),
            RenderOperation::ClearScreen,
            RenderOperation::ApplyMargin(MarginProperties {
                horizontal: self.theme.default_style.margin.clone(),
                top: 0,
                bottom: self.theme.footer.height(),
            }),
        ]);
        self.push_line_break();
    }

    fn push_intro_slide(&mut self) {
        let styles = &self.theme.intro_slide;
        let title = Text::new(COMPANY, styles.title.style);
        let subtitle = Text::new(TAGLINE, styles.subtitle.style);
        let date = Text::new(ROUND_DATE, styles.date.style);
        self.operations.push(RenderOperation::JumpToVerticalCenter);
        self.push_text(Line::from(title), styles.title.alignment.clone());
        self.push_line_break();
        self.push_text(Line::from(subtitle), styles.subtitle.alignment.clone());
        self.push_line_breaks(2);
        self.push_text(Line::from(date), styles.date.alignment.clone());

        let authors: Vec<_> = TEAM.iter().map(|member| format!("{}, {}", member.name, member.role)).collect();
        match styles.author.positioning {
            AuthorPositioning::BelowTitle => self.push_line_breaks(3),
            AuthorPositioning::PageBottom => {
                self.operations
                    .push(RenderOperation::JumpToBottomRow { index: authors.len().saturating_sub(1) as u16 });
            }
        };
        for author in authors {
            let author = Text::new(author, styles.author.style);
            self.push_text(Line::from(author), styles.author.alignment.clone());
            self.push_line_break();
        }
        if !styles.footer {
            self.ignore_footer = true;
        }
    }

    fn push_copy_slide(&mut self, section: PitchSection, copy: &SectionCopy) {
        self.push_slide_title(section);
        self.push_heading(&self.theme.headings.h2, copy.headline);
        self.push_line_break();
        for bullet in copy.bullets {
            self.push_bullet(Line::from(*bullet));
        }
    }

    fn push_market_slide(&mut self, section: PitchSection) {
        self.push_slide_title(section);
        self.push_heading(&self.theme.headings.h2, MARKET_HEADLINE);
        self.push_line_break();
        let chart = MarketChart::new(&MARKET_DATA, self.theme.chart.clone());
        self.operations.push(chart.into());
    }

    fn push_business_model_slide(&mut self, section: PitchSection) {
        self.push_slide_title(section);
        self.push_heading(&self.theme.headings.h2, BUSINESS_MODEL_HEADLINE);
        self.push_line_break();
        for (tier, description) in PRICING_TIERS {
            let line = Line(vec![
                Text::new(*tier, TextStyle::default().bold()),
                Text::from(": "),
                Text::from(*description),
            ]);
            self.push_bullet(line);
        }
    }

    fn push_traction_slide(&mut self, section: PitchSection) {
        self.push_slide_title(section);
        self.push_heading(&self.theme.headings.h2, TRACTION_HEADLINE);
        self.push_line_break();
        for (label, value) in TRACTION_METRICS {
            let line = Line(vec![
                Text::new(*value, TextStyle::default().bold()),
                Text::from("  "),
                Text::from(*label),
            ]);
            self.push_bullet(line);
        }
    }

    fn push_competition_slide(&mut self, section: PitchSection) {
        self.push_slide_title(section);
        self.push_heading(&self.theme.headings.h2, COMPETITION_HEADLINE);
        self.push_line_break();
        for (competitor, weakness) in COMPETITORS {
            let line = Line(vec![
                Text::new(*competitor, TextStyle::default().bold()),
                Text::from(": "),
                Text::from(*weakness),
            ]);
            self.push_bullet(line);
        }
        self.push_line_break();
        let positioning = Text::new(POSITIONING, TextStyle::default().italics());
        self.push_text(Line::from(positioning), Self::centered());
        self.push_line_break();
    }

    fn push_team_slide(&mut self, section: PitchSection) {
        self.push_slide_title(section);
        self.push_heading(&self.theme.headings.h2, TEAM_HEADLINE);
        self.push_line_break();
        self.operations.push(RenderOperation::InitColumnLayout { columns: vec![1; TEAM.len()] });
        for (column, member) in TEAM.iter().enumerate() {
            self.operations.push(RenderOperation::EnterColumn { column });
            let name = Text::new(member.name, TextStyle::default().bold());
            self.push_text(Line::from(name), Self::centered());
            self.push_line_break();
            let role = Text::new(member.role, self.theme.headings.h2.style);
            self.push_text(Line::from(role), Self::centered());
            self.push_line_breaks(2);
            self.push_text(Line::from(member.background), Self::centered());
            self.push_line_break();
        }
        self.operations.push(RenderOperation::ExitLayout);
    }

    fn push_slide_title(&mut self, section: PitchSection) {
        let styles = &self.theme.slide_title;
        let text = Text::new(section.to_string(), styles.style);
        for _ in 0..styles.padding_top {
            self.push_line_break();
        }
        self.push_text(Line::from(text), styles.alignment.clone());
        self.push_line_break();
        for _ in 0..styles.padding_bottom {
            self.push_line_break();
        }
        if styles.separator {
            self.operations.push(RenderSeparator::default().into());
            self.push_line_break();
        }
        self.push_line_break();
    }

    fn push_heading(&mut self, style: &HeadingStyle, content: &str) {
        let mut line = Line::from(content);
        if let Some(prefix) = &style.prefix {
            line.0.insert(0, prefix.clone().into());
        }
        line.apply_style(&style.style);
        self.push_text(line, style.alignment.clone());
        self.push_line_break();
    }

    fn push_bullet(&mut self, line: Line) {
        let prefix = Text::from(BULLET_PREFIX);
        let block_length = (prefix.content.width() + line.width()) as u16;
        self.operations.push(RenderOperation::RenderBlockLine(BlockLine {
            prefix: prefix.into(),
            right_padding_length: 0,
            repeat_prefix_on_wrap: false,
            text: line.into(),
            block_length,
            block_color: None,
            alignment: Alignment::Left { margin: Margin::Fixed(0) },
        }));
        self.push_line_breaks(2);
    }

    fn push_text(&mut self, line: Line, alignment: Alignment) {
        self.operations.push(RenderOperation::RenderText { line: line.into(), alignment });
    }

    fn push_line_break(&mut self) {
        self.operations.push(RenderOperation::RenderLineBreak);
    }

    fn push_line_breaks(&mut self, count: usize) {
        self.operations.extend(std::iter::repeat_n(RenderOperation::RenderLineBreak, count));
    }

    fn centered() -> Alignment {
        Alignment::Center { minimum_margin: Margin::Fixed(1), minimum_size: 0 }
    }

    fn terminate_slide(&mut self, section: PitchSection) {
        self.index_builder.add_title(Line::from(section.to_string()));
        let footer = match mem::take(&mut self.ignore_footer) {
            true => Vec::new(),
            false => self.generate_footer(),
        };
        let operations = mem::take(&mut self.operations);
        self.slides.push(Slide::new(operations, footer));
    }

    fn generate_footer(&mut self) -> Vec<RenderOperation> {
        let generator = FooterGenerator::new(self.slides.len(), self.footer_context.clone(), self.theme.footer.clone());
        vec![
            // Exit any layout we're in and pop the default margin so the footer can use the whole
            // screen's width.
            RenderOperation::ExitLayout,
            RenderOperation::PopMargin,
            RenderOperation::RenderDynamic(Rc::new(generator)),
        ]
    }
}
