//! Crossterm terminal output.
//!
//! The `Driver` wraps a buffered stdout writer. Entering takes over the
//! terminal (alternate screen, raw mode, hidden cursor); leaving gives it
//! back. Dropping an entered driver leaves as well, so an error inside the
//! event loop still restores the terminal.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Terminal output using crossterm.
pub struct Driver {
    writer: BufWriter<Stdout>,
    entered: bool,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            writer: BufWriter::new(io::stdout()),
            entered: false,
        }
    }

    /// Enter alternate screen, enable raw mode and hide the cursor.
    pub fn enter(&mut self) -> io::Result<()> {
        execute!(self.writer, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        self.entered = true;
        Ok(())
    }

    /// Undo [`Driver::enter`]. Does nothing if not entered.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        terminal::disable_raw_mode()?;
        execute!(self.writer, cursor::Show, LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Redraw the whole screen from `lines`, clipped to the terminal size.
    pub fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        let (width, height) = Self::terminal_size()?;
        queue!(self.writer, Clear(ClearType::All))?;
        for (row, line) in lines.iter().take(usize::from(height)).enumerate() {
            let clipped: String = line.chars().take(usize::from(width)).collect();
            // `take(height)` keeps `row` below u16::MAX.
            queue!(self.writer, cursor::MoveTo(0, row as u16), Print(clipped))?;
        }
        self.writer.flush()
    }

    /// Get the terminal size (columns, rows) via crossterm.
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            log::warn!("failed to restore the terminal: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_driver_is_not_entered() {
        let mut driver = Driver::new();
        assert!(!driver.is_entered());
        // Leaving without entering never touches the terminal.
        assert!(driver.leave().is_ok());
    }

    #[test]
    fn terminal_size_does_not_panic() {
        // May fail without a terminal, but must not panic.
        let _ = Driver::terminal_size();
    }
}
