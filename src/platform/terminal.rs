//! Raw-mode terminal guard
//!
//! Raw mode and a hidden cursor for the lifetime of the guard; both are
//! restored on drop, including when the driver unwinds.

use std::io::{self, Stdout, Write};

use crossterm::{cursor, execute, terminal};

pub struct RawTerminal {
    out: Stdout,
}

impl RawTerminal {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(err) = execute!(out, cursor::Hide, terminal::DisableLineWrap) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(Self { out })
    }

    /// Frame sink
    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if let Err(err) = execute!(self.out, cursor::Show, terminal::EnableLineWrap) {
            log::error!("Failed to restore cursor: {err}");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            log::error!("Failed to disable raw mode: {err}");
        }
        let _ = self.out.flush();
    }
}
