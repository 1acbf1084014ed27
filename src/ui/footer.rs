use super::indicator::{IndicatorLayout, IndicatorStyles};
use crate::{
    render::{
        operation::{AsRenderOperations, MarginProperties, RenderOperation},
        properties::WindowSize,
    },
    text::{Line, Text, style::TextStyle},
    theme::{Alignment, FooterStyle, FooterTemplate, FooterTemplateChunk, Margin},
};
use std::{
    cell::RefCell,
    io::{BufWriter, Write},
    rc::Rc,
};

#[derive(Debug, Default)]
pub(crate) struct FooterContext {
    pub(crate) total_slides: usize,
    pub(crate) company: String,
    pub(crate) title: String,
    pub(crate) date: String,
}

#[derive(Debug)]
pub(crate) struct FooterGenerator {
    current_slide: usize,
    context: Rc<RefCell<FooterContext>>,
    style: FooterStyle,
}

impl FooterGenerator {
    pub(crate) fn new(current_slide: usize, context: Rc<RefCell<FooterContext>>, style: FooterStyle) -> Self {
        Self { current_slide, context, style }
    }

    fn render_template(
        template: &FooterTemplate,
        current_slide: &str,
        context: &FooterContext,
        style: TextStyle,
        alignment: Alignment,
        operations: &mut Vec<RenderOperation>,
    ) {
        use FooterTemplateChunk::*;
        let mut w = BufWriter::new(Vec::new());
        let FooterContext { total_slides, company, title, date } = context;
        for chunk in &template.0 {
            match chunk {
                Literal(l) => write!(w, "{l}"),
                CurrentSlide => write!(w, "{current_slide}"),
                TotalSlides => write!(w, "{total_slides}"),
                Company => write!(w, "{company}"),
                Title => write!(w, "{title}"),
                Date => write!(w, "{date}"),
            }
            .unwrap();
        }
        let contents = String::from_utf8(w.into_inner().unwrap()).expect("not utf8");
        let text = Text::new(contents, style);
        operations.extend([
            RenderOperation::JumpToBottomRow { index: 1 },
            RenderOperation::RenderText { line: Line::from(text).into(), alignment },
        ]);
    }
}

impl AsRenderOperations for FooterGenerator {
    fn as_render_operations(&self, dimensions: &WindowSize) -> Vec<RenderOperation> {
        let context = self.context.borrow();
        match &self.style {
            FooterStyle::Indicators { active, inactive, arrows, disabled } => {
                let layout = IndicatorLayout::new(context.total_slides);
                let styles =
                    IndicatorStyles { active: *active, inactive: *inactive, arrows: *arrows, disabled: *disabled };
                let line = layout.render_line(self.current_slide, &styles);
                vec![
                    RenderOperation::JumpToBottomRow { index: 0 },
                    RenderOperation::RenderText {
                        line: line.into(),
                        alignment: Alignment::Center { minimum_margin: Margin::Fixed(0), minimum_size: 0 },
                    },
                ]
            }
            FooterStyle::Template { left, center, right, style } => {
                let current_slide = (self.current_slide + 1).to_string();
                // Crate a margin for ourselves so we can jump to top without stepping over slide
                // text.
                let mut operations = vec![RenderOperation::ApplyMargin(MarginProperties {
                    horizontal: Margin::Fixed(1),
                    top: dimensions.rows.saturating_sub(self.style.height()),
                    bottom: 0,
                })];
                // We print this one row below the bottom so there's one row of padding.
                let alignments = [
                    Alignment::Left { margin: Default::default() },
                    Alignment::Center { minimum_size: 0, minimum_margin: Default::default() },
                    Alignment::Right { margin: Default::default() },
                ];
                for (template, alignment) in [left, center, right].into_iter().zip(alignments) {
                    if let Some(template) = template {
                        Self::render_template(template, &current_slide, &context, *style, alignment, &mut operations);
                    }
                }
                operations.push(RenderOperation::PopMargin);
                operations
            }
            FooterStyle::Empty => vec![],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn build_context(total_slides: usize) -> Rc<RefCell<FooterContext>> {
        Rc::new(RefCell::new(FooterContext {
            total_slides,
            company: "Termforge".into(),
            title: "Series A".into(),
            date: "March 2026".into(),
        }))
    }

    #[test]
    fn indicators_render_on_bottom_row() {
        let style = FooterStyle::Indicators {
            active: TextStyle::default(),
            inactive: TextStyle::default(),
            arrows: TextStyle::default(),
            disabled: TextStyle::default(),
        };
        let generator = FooterGenerator::new(0, build_context(10), style);
        let operations = generator.as_render_operations(&WindowSize { rows: 24, columns: 80 });
        assert!(matches!(operations[0], RenderOperation::JumpToBottomRow { index: 0 }));
        let RenderOperation::RenderText { line, .. } = &operations[1] else {
            panic!("not a render text operation");
        };
        assert_eq!(line.width(), IndicatorLayout::new(10).width() as usize);
    }

    #[test]
    fn template_variables_expand() {
        let template: FooterTemplate = "{company} {current_slide}/{total_slides} {date}".parse().expect("bad template");
        let style = FooterStyle::Template {
            left: Some(template),
            center: None,
            right: None,
            style: TextStyle::default(),
        };
        let generator = FooterGenerator::new(2, build_context(10), style);
        let operations = generator.as_render_operations(&WindowSize { rows: 24, columns: 80 });
        let rendered: Vec<_> = operations
            .iter()
            .filter_map(|operation| match operation {
                RenderOperation::RenderText { line, .. } => Some(line),
                _ => None,
            })
            .collect();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].width(), "Termforge 3/10 March 2026".len());
    }

    #[test]
    fn empty_footer_renders_nothing() {
        let generator = FooterGenerator::new(0, build_context(10), FooterStyle::Empty);
        assert!(generator.as_render_operations(&WindowSize { rows: 24, columns: 80 }).is_empty());
    }
}
