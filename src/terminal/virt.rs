use super::printer::{TerminalError, TerminalIo};
use crate::{
    render::properties::WindowSize,
    terminal::printer::TerminalCommand,
    text::{
        Text,
        style::{Color, Colors, TextStyle},
    },
};
use std::io;

/// The contents of a terminal after rendering into it.
pub(crate) struct TerminalGrid {
    pub(crate) rows: Vec<Vec<StyledChar>>,
    pub(crate) background_color: Option<Color>,
}

/// A terminal that renders into a grid of characters in memory.
pub(crate) struct VirtualTerminal {
    row: u16,
    column: u16,
    colors: Colors,
    rows: Vec<Vec<StyledChar>>,
    background_color: Option<Color>,
}

impl VirtualTerminal {
    pub(crate) fn new(dimensions: WindowSize) -> Self {
        let rows = vec![vec![StyledChar::default(); dimensions.columns as usize]; dimensions.rows as usize];
        Self { row: 0, column: 0, colors: Default::default(), rows, background_color: None }
    }

    pub(crate) fn into_contents(self) -> TerminalGrid {
        TerminalGrid { rows: self.rows, background_color: self.background_color }
    }

    fn current_cell_mut(&mut self) -> Option<&mut StyledChar> {
        self.rows.get_mut(self.row as usize).and_then(|row| row.get_mut(self.column as usize))
    }

    fn move_to(&mut self, column: u16, row: u16) -> io::Result<()> {
        self.column = column;
        self.row = row;
        Ok(())
    }

    fn move_to_row(&mut self, row: u16) -> io::Result<()> {
        self.row = row;
        Ok(())
    }

    fn move_to_column(&mut self, column: u16) -> io::Result<()> {
        self.column = column;
        Ok(())
    }

    fn move_down(&mut self, amount: u16) -> io::Result<()> {
        self.row += amount;
        Ok(())
    }

    fn move_to_next_line(&mut self) -> io::Result<()> {
        self.row += 1;
        self.column = 0;
        Ok(())
    }

    fn print_text(&mut self, content: &str, style: &TextStyle) -> io::Result<()> {
        let mut style = *style;
        style.merge(&TextStyle::default().colors(self.colors));
        for c in content.chars() {
            let Some(cell) = self.current_cell_mut() else {
                continue;
            };
            cell.character = c;
            cell.style = style;
            self.column += 1;
        }
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        for row in &mut self.rows {
            for cell in row {
                cell.character = ' ';
            }
        }
        self.background_color = self.colors.background;
        Ok(())
    }

    fn set_colors(&mut self, colors: Colors) -> io::Result<()> {
        self.colors = colors;
        Ok(())
    }

    fn set_background_color(&mut self, color: Color) -> io::Result<()> {
        self.colors.background = Some(color);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl TerminalIo for VirtualTerminal {
    fn execute(&mut self, command: &TerminalCommand<'_>) -> Result<(), TerminalError> {
        use TerminalCommand::*;
        match command {
            BeginUpdate | EndUpdate => (),
            MoveTo { column, row } => self.move_to(*column, *row)?,
            MoveToRow(row) => self.move_to_row(*row)?,
            MoveToColumn(column) => self.move_to_column(*column)?,
            MoveDown(amount) => self.move_down(*amount)?,
            MoveToNextLine => self.move_to_next_line()?,
            PrintText { content, style } => self.print_text(content, style)?,
            ClearScreen => self.clear_screen()?,
            SetColors(colors) => self.set_colors(*colors)?,
            SetBackgroundColor(color) => self.set_background_color(*color)?,
            Flush => self.flush()?,
        };
        Ok(())
    }

    fn cursor_row(&self) -> u16 {
        self.row
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StyledChar {
    pub(crate) character: char,
    pub(crate) style: TextStyle,
}

impl Default for StyledChar {
    fn default() -> Self {
        Self { character: ' ', style: Default::default() }
    }
}

/// An iterator over a grid row that groups runs of equally styled characters.
pub(crate) struct TerminalRowIterator<'a> {
    row: &'a [StyledChar],
}

impl<'a> TerminalRowIterator<'a> {
    pub(crate) fn new(row: &'a [StyledChar]) -> Self {
        Self { row }
    }
}

impl Iterator for TerminalRowIterator<'_> {
    type Item = Text;

    fn next(&mut self) -> Option<Self::Item> {
        let head = self.row.first()?;
        let mut content = String::from(head.character);
        let style = head.style;
        let mut consumed = 1;
        for cell in &self.row[1..] {
            if cell.style != style {
                break;
            }
            content.push(cell.character);
            consumed += 1;
        }
        self.row = &self.row[consumed..];
        Some(Text::new(content, style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) trait TerminalGridExt {
        fn assert_contents(&self, lines: &[&str]);
    }

    impl TerminalGridExt for TerminalGrid {
        fn assert_contents(&self, lines: &[&str]) {
            assert_eq!(self.rows.len(), lines.len());
            for (line, expected) in self.rows.iter().zip(lines) {
                let line: String = line.iter().map(|c| c.character).collect();
                assert_eq!(line, *expected);
            }
        }
    }

    #[test]
    fn text() {
        let dimensions = WindowSize { rows: 2, columns: 3 };
        let mut term = VirtualTerminal::new(dimensions);
        for c in "abc".chars() {
            term.print_text(&c.to_string(), &Default::default()).expect("print failed");
        }
        term.move_to_next_line().unwrap();
        term.print_text("A", &Default::default()).expect("print failed");
        let grid = term.into_contents();
        grid.assert_contents(&["abc", "A  "]);
    }

    #[test]
    fn movement() {
        let dimensions = WindowSize { rows: 2, columns: 3 };
        let mut term = VirtualTerminal::new(dimensions);
        term.print_text("A", &Default::default()).unwrap();
        term.move_down(1).unwrap();
        term.print_text("B", &Default::default()).unwrap();
        term.move_to(2, 0).unwrap();
        term.print_text("C", &Default::default()).unwrap();
        term.move_to_row(1).unwrap();
        term.move_to_column(2).unwrap();
        term.print_text("D", &Default::default()).unwrap();

        let grid = term.into_contents();
        grid.assert_contents(&["A C", " BD"]);
    }

    #[test]
    fn row_runs() {
        let styled = TextStyle::default().bold();
        let row = vec![
            StyledChar { character: 'a', style: Default::default() },
            StyledChar { character: 'b', style: Default::default() },
            StyledChar { character: 'c', style: styled },
            StyledChar { character: ' ', style: Default::default() },
        ];
        let chunks: Vec<_> = TerminalRowIterator::new(&row).collect();
        let expected =
            vec![Text::from("ab"), Text::new("c", styled), Text::from(" ")];
        assert_eq!(chunks, expected);
    }
}
