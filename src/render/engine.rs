use super::{RenderError, RenderResult, layout::Layout, text::TextDrawer};
use crate::{
    render::{
        layout::Positioning,
        operation::{AsRenderOperations, BlockLine, MarginProperties, RenderOperation},
        properties::WindowSize,
    },
    terminal::printer::{TerminalCommand, TerminalIo},
    text::{style::Colors, weighted::WeightedLine},
    theme::Alignment,
};
use std::mem;

#[derive(Debug)]
pub(crate) struct RenderEngineOptions {
    pub(crate) max_columns: u16,
}

impl Default for RenderEngineOptions {
    fn default() -> Self {
        Self { max_columns: u16::MAX }
    }
}

pub(crate) struct RenderEngine<'a, T>
where
    T: TerminalIo,
{
    terminal: &'a mut T,
    window_rects: Vec<WindowRect>,
    colors: Colors,
    max_modified_row: u16,
    layout: LayoutState,
}

impl<'a, T> RenderEngine<'a, T>
where
    T: TerminalIo,
{
    pub(crate) fn new(terminal: &'a mut T, window_dimensions: WindowSize, options: RenderEngineOptions) -> Self {
        let max_modified_row = terminal.cursor_row();
        let current_rect = Self::starting_rect(window_dimensions, &options);
        let window_rects = vec![current_rect.clone()];
        Self { terminal, window_rects, colors: Default::default(), max_modified_row, layout: Default::default() }
    }

    fn starting_rect(window_dimensions: WindowSize, options: &RenderEngineOptions) -> WindowRect {
        if window_dimensions.columns > options.max_columns {
            let extra_width = window_dimensions.columns - options.max_columns;
            let dimensions = window_dimensions.shrink_columns(extra_width);
            WindowRect { dimensions, start_column: extra_width / 2, start_row: 0 }
        } else {
            WindowRect { dimensions: window_dimensions, start_column: 0, start_row: 0 }
        }
    }

    pub(crate) fn render<'b>(mut self, operations: impl Iterator<Item = &'b RenderOperation>) -> RenderResult {
        self.terminal.execute(&TerminalCommand::BeginUpdate)?;
        for operation in operations {
            self.render_one(operation)?;
        }
        self.terminal.execute(&TerminalCommand::EndUpdate)?;
        self.terminal.execute(&TerminalCommand::Flush)?;
        Ok(())
    }

    fn render_one(&mut self, operation: &RenderOperation) -> RenderResult {
        match operation {
            RenderOperation::ClearScreen => self.clear_screen(),
            RenderOperation::ApplyMargin(properties) => self.apply_margin(properties),
            RenderOperation::PopMargin => self.pop_margin(),
            RenderOperation::SetColors(colors) => self.set_colors(colors),
            RenderOperation::JumpToVerticalCenter => self.jump_to_vertical_center(),
            RenderOperation::JumpToRow { index } => self.jump_to_row(*index),
            RenderOperation::JumpToBottomRow { index } => self.jump_to_bottom(*index),
            RenderOperation::RenderText { line, alignment } => self.render_text(line, alignment),
            RenderOperation::RenderLineBreak => self.render_line_break(),
            RenderOperation::RenderBlockLine(operation) => self.render_block_line(operation),
            RenderOperation::RenderDynamic(generator) => self.render_dynamic(generator.as_ref()),
            RenderOperation::InitColumnLayout { columns } => self.init_column_layout(columns),
            RenderOperation::EnterColumn { column } => self.enter_column(*column),
            RenderOperation::ExitLayout => self.exit_layout(),
        }?;
        if let LayoutState::EnteredColumn { column, columns } = &mut self.layout {
            columns[*column].current_row = self.terminal.cursor_row();
        };
        self.max_modified_row = self.max_modified_row.max(self.terminal.cursor_row());
        Ok(())
    }

    fn current_rect(&self) -> &WindowRect {
        // This invariant is enforced when popping.
        self.window_rects.last().expect("no rects")
    }

    fn current_dimensions(&self) -> &WindowSize {
        &self.current_rect().dimensions
    }

    fn clear_screen(&mut self) -> RenderResult {
        self.terminal.execute(&TerminalCommand::ClearScreen)?;
        self.terminal.execute(&TerminalCommand::MoveTo { column: 0, row: 0 })?;
        self.max_modified_row = 0;
        Ok(())
    }

    fn apply_margin(&mut self, properties: &MarginProperties) -> RenderResult {
        let MarginProperties { horizontal, top, bottom } = properties;
        let current = self.current_rect();
        let margin = horizontal.as_characters(current.dimensions.columns);
        let new_rect = current.apply_horizontal_margin(margin).apply_vertical_margin(*top, *bottom);
        self.window_rects.push(new_rect);
        Ok(())
    }

    fn pop_margin(&mut self) -> RenderResult {
        if self.window_rects.len() == 1 {
            return Err(RenderError::PopDefaultScreen);
        }
        self.window_rects.pop();
        Ok(())
    }

    fn set_colors(&mut self, colors: &Colors) -> RenderResult {
        self.colors = *colors;
        self.apply_colors()
    }

    fn apply_colors(&mut self) -> RenderResult {
        self.terminal.execute(&TerminalCommand::SetColors(self.colors))?;
        Ok(())
    }

    fn jump_to_vertical_center(&mut self) -> RenderResult {
        let rect = self.current_rect();
        let center_row = rect.start_row + rect.dimensions.rows / 2;
        self.terminal.execute(&TerminalCommand::MoveToRow(center_row))?;
        Ok(())
    }

    fn jump_to_row(&mut self, index: u16) -> RenderResult {
        let target_row = self.current_rect().start_row.saturating_add(index);
        self.terminal.execute(&TerminalCommand::MoveToRow(target_row))?;
        Ok(())
    }

    fn jump_to_bottom(&mut self, index: u16) -> RenderResult {
        let rect = self.current_rect();
        let target_row =
            rect.start_row.saturating_add(rect.dimensions.rows).saturating_sub(index).saturating_sub(1);
        self.terminal.execute(&TerminalCommand::MoveToRow(target_row))?;
        Ok(())
    }

    fn render_text(&mut self, text: &WeightedLine, alignment: &Alignment) -> RenderResult {
        let layout = self.build_layout(alignment.clone());
        let dimensions = self.current_dimensions();
        let positioning = layout.compute(dimensions, text.width() as u16);
        let prefix = "".into();
        let text_drawer = TextDrawer::new(&prefix, 0, text, positioning, &self.colors)?;
        text_drawer.draw(self.terminal)?;
        // Restore colors
        self.apply_colors()
    }

    fn render_line_break(&mut self) -> RenderResult {
        self.terminal.execute(&TerminalCommand::MoveToNextLine)?;
        Ok(())
    }

    fn render_block_line(&mut self, operation: &BlockLine) -> RenderResult {
        let BlockLine {
            text,
            block_length,
            alignment,
            block_color,
            prefix,
            right_padding_length,
            repeat_prefix_on_wrap,
        } = operation;
        let layout = self.build_layout(alignment.clone());

        let dimensions = self.current_dimensions();
        let Positioning { max_line_length, start_column } = layout.compute(dimensions, *block_length);
        self.terminal.execute(&TerminalCommand::MoveToColumn(start_column))?;

        let positioning = Positioning { max_line_length, start_column };
        let text_drawer = TextDrawer::new(prefix, *right_padding_length, text, positioning, &self.colors)?
            .with_surrounding_block(*block_color)
            .repeat_prefix_on_wrap(*repeat_prefix_on_wrap);
        text_drawer.draw(self.terminal)?;

        // Restore colors
        self.apply_colors()?;
        Ok(())
    }

    fn render_dynamic(&mut self, generator: &dyn AsRenderOperations) -> RenderResult {
        let operations = generator.as_render_operations(self.current_dimensions());
        for operation in operations {
            self.render_one(&operation)?;
        }
        Ok(())
    }

    fn init_column_layout(&mut self, columns: &[u8]) -> RenderResult {
        if !matches!(self.layout, LayoutState::Default) {
            self.exit_layout()?;
        }
        let columns = columns
            .iter()
            .map(|width| Column { width: *width as u16, current_row: self.terminal.cursor_row() })
            .collect();
        self.layout = LayoutState::InitializedColumn { columns };
        Ok(())
    }

    fn enter_column(&mut self, column_index: usize) -> RenderResult {
        let columns = match mem::take(&mut self.layout) {
            LayoutState::Default => return Err(RenderError::InvalidLayoutEnter),
            LayoutState::InitializedColumn { columns, .. } | LayoutState::EnteredColumn { columns, .. }
                if column_index >= columns.len() =>
            {
                return Err(RenderError::InvalidLayoutEnter);
            }
            LayoutState::InitializedColumn { columns } => columns,
            LayoutState::EnteredColumn { columns, .. } => {
                // Pop this one and start clean
                self.pop_margin()?;
                columns
            }
        };
        let total_column_units: u16 = columns.iter().map(|c| c.width).sum();
        let column_units_before: u16 = columns.iter().take(column_index).map(|c| c.width).sum();
        let current_rect = self.current_rect();
        let unit_width = current_rect.dimensions.columns as f64 / total_column_units as f64;
        let start_column = current_rect.start_column + (unit_width * column_units_before as f64) as u16;
        let new_column_count = (total_column_units - columns[column_index].width) * unit_width as u16;
        let new_size = current_rect.dimensions.shrink_columns(new_column_count);
        let mut rect = WindowRect { dimensions: new_size, start_column, start_row: current_rect.start_row };
        // Shrink every column's right edge except for last
        if column_index < columns.len() - 1 {
            rect = rect.shrink_right(4);
        }
        // Shrink every column's left edge except for first
        if column_index > 0 {
            rect = rect.shrink_left(4);
        }

        self.window_rects.push(rect);
        self.terminal.execute(&TerminalCommand::MoveToRow(columns[column_index].current_row))?;
        self.layout = LayoutState::EnteredColumn { column: column_index, columns };
        Ok(())
    }

    fn exit_layout(&mut self) -> RenderResult {
        match &self.layout {
            LayoutState::Default | LayoutState::InitializedColumn { .. } => Ok(()),
            LayoutState::EnteredColumn { .. } => {
                self.terminal.execute(&TerminalCommand::MoveTo { column: 0, row: self.max_modified_row })?;
                self.layout = LayoutState::Default;
                self.pop_margin()?;
                Ok(())
            }
        }
    }

    fn build_layout(&self, alignment: Alignment) -> Layout {
        Layout::new(alignment).with_start_column(self.current_rect().start_column)
    }
}

#[derive(Default)]
enum LayoutState {
    #[default]
    Default,
    InitializedColumn {
        columns: Vec<Column>,
    },
    EnteredColumn {
        column: usize,
        columns: Vec<Column>,
    },
}

struct Column {
    width: u16,
    current_row: u16,
}

#[derive(Clone, Debug)]
struct WindowRect {
    dimensions: WindowSize,
    start_column: u16,
    start_row: u16,
}

impl WindowRect {
    fn apply_horizontal_margin(&self, margin: u16) -> Self {
        let dimensions = self.dimensions.shrink_columns(margin.saturating_mul(2));
        let start_column = self.start_column + margin;
        Self { dimensions, start_column, start_row: self.start_row }
    }

    fn apply_vertical_margin(&self, top: u16, bottom: u16) -> Self {
        let dimensions = self.dimensions.shrink_rows(top.saturating_add(bottom));
        let start_row = self.start_row.saturating_add(top);
        Self { dimensions, start_column: self.start_column, start_row }
    }

    fn shrink_left(&self, size: u16) -> Self {
        let dimensions = self.dimensions.shrink_columns(size);
        let start_column = self.start_column.saturating_add(size);
        Self { dimensions, start_column, start_row: self.start_row }
    }

    fn shrink_right(&self, size: u16) -> Self {
        let dimensions = self.dimensions.shrink_columns(size);
        Self { dimensions, start_column: self.start_column, start_row: self.start_row }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{terminal::virt::VirtualTerminal, theme::Margin};

    fn render_into_grid(rows: u16, columns: u16, operations: &[RenderOperation]) -> Vec<String> {
        render_with_options(rows, columns, Default::default(), operations)
    }

    fn render_with_options(
        rows: u16,
        columns: u16,
        options: RenderEngineOptions,
        operations: &[RenderOperation],
    ) -> Vec<String> {
        let dimensions = WindowSize { rows, columns };
        let mut terminal = VirtualTerminal::new(dimensions.clone());
        let engine = RenderEngine::new(&mut terminal, dimensions, options);
        engine.render(operations.iter()).expect("render failed");
        terminal.into_contents().rows.iter().map(|row| row.iter().map(|c| c.character).collect()).collect()
    }

    fn left_aligned(text: &str) -> RenderOperation {
        RenderOperation::RenderText {
            line: text.to_string().into(),
            alignment: Alignment::Left { margin: Margin::Fixed(0) },
        }
    }

    #[test]
    fn top_margin_offsets_row_jumps() {
        let operations = [
            RenderOperation::ApplyMargin(MarginProperties { horizontal: Margin::Fixed(0), top: 1, bottom: 0 }),
            RenderOperation::JumpToRow { index: 0 },
            left_aligned("hi"),
            RenderOperation::PopMargin,
        ];
        let grid = render_into_grid(3, 4, &operations);
        assert_eq!(grid, vec!["    ", "hi  ", "    "]);
    }

    #[test]
    fn bottom_margin_shrinks_bottom_row() {
        let operations = [
            RenderOperation::ApplyMargin(MarginProperties { horizontal: Margin::Fixed(0), top: 0, bottom: 1 }),
            RenderOperation::JumpToBottomRow { index: 0 },
            left_aligned("hi"),
            RenderOperation::PopMargin,
        ];
        let grid = render_into_grid(3, 4, &operations);
        assert_eq!(grid, vec!["    ", "hi  ", "    "]);
    }

    #[test]
    fn max_columns_centers_content() {
        let options = RenderEngineOptions { max_columns: 2 };
        let grid = render_with_options(1, 4, options, &[left_aligned("hi")]);
        assert_eq!(grid, vec![" hi "]);
    }
}
