//! Capability contract for a playable simulation
//!
//! The driver only talks to the game through this trait: deliver an input,
//! advance one tick, fetch a frame, and ask for the final report.

use std::io::{self, Write};

use crossterm::{cursor::MoveToColumn, queue, style::Print};

use crate::sim::SessionReport;

pub trait Game {
    /// Render the current state as one glyph per track cell
    fn get_board(&self) -> Vec<char>;

    /// Engage the left gear
    fn move_left(&mut self);

    /// Engage the right gear
    fn move_right(&mut self);

    /// Advance the simulation by one fixed tick
    fn tick(&mut self);

    /// End the session and produce the final statistics
    fn quit(&mut self) -> SessionReport;

    /// Redraw the board in place on a single line
    fn draw<W: Write>(&self, out: &mut W) -> io::Result<()>
    where
        Self: Sized,
    {
        let line: String = self.get_board().into_iter().collect();
        queue!(out, MoveToColumn(0), Print(line))?;
        out.flush()
    }
}
