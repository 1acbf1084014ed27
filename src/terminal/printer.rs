use crate::text::style::{Color, Colors, PaletteColorError, TextStyle};
use crossterm::{
    QueueableCommand, cursor, event, style,
    terminal::{self},
};
use std::io::{self, Write};

#[derive(Debug, PartialEq)]
pub(crate) enum TerminalCommand<'a> {
    BeginUpdate,
    EndUpdate,
    MoveTo { column: u16, row: u16 },
    MoveToRow(u16),
    MoveToColumn(u16),
    MoveDown(u16),
    MoveToNextLine,
    PrintText { content: &'a str, style: TextStyle },
    ClearScreen,
    SetColors(Colors),
    SetBackgroundColor(Color),
    Flush,
}

pub(crate) trait TerminalIo {
    fn execute(&mut self, command: &TerminalCommand<'_>) -> Result<(), TerminalError>;
    fn cursor_row(&self) -> u16;
}

#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("style: {0}")]
    Style(#[from] PaletteColorError),
}

/// A wrapper over the terminal write handle.
pub(crate) struct Terminal<I: TerminalWrite> {
    writer: I,
    cursor_row: u16,
    background_color: Option<Color>,
}

impl<I: TerminalWrite> Terminal<I> {
    pub(crate) fn new(mut writer: I) -> io::Result<Self> {
        writer.init()?;
        Ok(Self { writer, cursor_row: 0, background_color: None })
    }

    fn begin_update(&mut self) -> io::Result<()> {
        self.writer.queue(terminal::BeginSynchronizedUpdate)?;
        Ok(())
    }

    fn end_update(&mut self) -> io::Result<()> {
        self.writer.queue(terminal::EndSynchronizedUpdate)?;
        Ok(())
    }

    fn move_to(&mut self, column: u16, row: u16) -> io::Result<()> {
        self.writer.queue(cursor::MoveTo(column, row))?;
        self.cursor_row = row;
        Ok(())
    }

    fn move_to_row(&mut self, row: u16) -> io::Result<()> {
        self.writer.queue(cursor::MoveToRow(row))?;
        self.cursor_row = row;
        Ok(())
    }

    fn move_to_column(&mut self, column: u16) -> io::Result<()> {
        self.writer.queue(cursor::MoveToColumn(column))?;
        Ok(())
    }

    fn move_down(&mut self, amount: u16) -> io::Result<()> {
        self.writer.queue(cursor::MoveDown(amount))?;
        self.cursor_row += amount;
        Ok(())
    }

    fn move_to_next_line(&mut self) -> io::Result<()> {
        self.writer.queue(cursor::MoveToNextLine(1))?;
        self.cursor_row += 1;
        Ok(())
    }

    fn print_text(&mut self, content: &str, style: &TextStyle) -> Result<(), TerminalError> {
        let content = style.apply(content)?;
        self.writer.queue(style::PrintStyledContent(content))?;
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.writer.queue(terminal::Clear(terminal::ClearType::All))?;
        self.cursor_row = 0;
        Ok(())
    }

    fn set_colors(&mut self, colors: Colors) -> Result<(), TerminalError> {
        let crossterm_colors = colors.try_into()?;
        self.writer.queue(style::ResetColor)?;
        self.writer.queue(style::SetColors(crossterm_colors))?;
        if self.background_color != colors.background {
            match (self.background_color, colors.background) {
                (_, Some(Color::Rgb { r, g, b })) => {
                    // Set background via OSC 11 if we have an RGB color
                    write!(self.writer, "\x1b]11;#{r:02x}{g:02x}{b:02x}\x1b\\")?;
                }
                // If it was RGB and it no longer is, or we have no background now, clear it.
                (Some(Color::Rgb { .. }), Some(_)) | (_, None) => write!(self.writer, "\x1b]111\x1b\\")?,
                _ => (),
            };
            self.background_color = colors.background;
        }
        Ok(())
    }

    fn set_background_color(&mut self, color: Color) -> Result<(), TerminalError> {
        let color = color.try_into()?;
        self.writer.queue(style::SetBackgroundColor(color))?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub(crate) fn suspend(&mut self) {
        self.writer.deinit();
    }

    pub(crate) fn resume(&mut self) {
        let _ = self.writer.init();
    }
}

impl<I: TerminalWrite> TerminalIo for Terminal<I> {
    fn execute(&mut self, command: &TerminalCommand<'_>) -> Result<(), TerminalError> {
        use TerminalCommand::*;
        match command {
            BeginUpdate => self.begin_update()?,
            EndUpdate => self.end_update()?,
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
        self.cursor_row
    }
}

impl<I: TerminalWrite> Drop for Terminal<I> {
    fn drop(&mut self) {
        if let Some(Color::Rgb { .. }) = self.background_color {
            let _ = write!(self.writer, "\x1b]111\x1b\\");
        }
        self.writer.deinit();
    }
}

pub(crate) trait TerminalWrite: io::Write {
    fn init(&mut self) -> io::Result<()>;
    fn deinit(&mut self);
}

impl TerminalWrite for io::Stdout {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.queue(cursor::Hide)?;
        self.queue(terminal::EnterAlternateScreen)?;
        self.queue(event::EnableMouseCapture)?;
        Ok(())
    }

    fn deinit(&mut self) {
        let _ = self.queue(event::DisableMouseCapture);
        let _ = self.queue(terminal::LeaveAlternateScreen);
        let _ = self.queue(cursor::Show);
        let _ = self.flush();
        let _ = terminal::disable_raw_mode();
    }
}
