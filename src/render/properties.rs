use crossterm::terminal::window_size;
use std::io;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct WindowSize {
    pub(crate) rows: u16,
    pub(crate) columns: u16,
}

impl WindowSize {
    pub(crate) fn current() -> io::Result<Self> {
        let size = window_size()?;
        Ok(size.into())
    }

    pub(crate) fn shrink_columns(&self, amount: u16) -> Self {
        Self { rows: self.rows, columns: self.columns.saturating_sub(amount) }
    }

    pub(crate) fn shrink_rows(&self, amount: u16) -> Self {
        Self { rows: self.rows.saturating_sub(amount), columns: self.columns }
    }
}

impl From<crossterm::terminal::WindowSize> for WindowSize {
    fn from(size: crossterm::terminal::WindowSize) -> Self {
        Self { rows: size.rows, columns: size.columns }
    }
}
