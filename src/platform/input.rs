//! Keyboard input collection
//!
//! A background thread blocks on terminal key events and drops the latest
//! symbol into an `InputSlot`. The tick driver takes whatever is pending once
//! per tick; keys pressed faster than the tick rate overwrite each other.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::Input;

/// Single-slot, overwrite-on-write handoff between the reader and the driver
#[derive(Debug, Clone, Default)]
pub struct InputSlot {
    pending: Arc<Mutex<Option<Input>>>,
}

impl InputSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any unconsumed symbol with `input`
    pub fn put(&self, input: Input) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(input);
    }

    /// Consume and clear the pending symbol
    pub fn take(&self) -> Input {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_default()
    }
}

/// Map a key press to an input symbol. Unbound keys map to `Input::None`,
/// which still overwrites whatever was pending.
pub fn map_key(key: KeyEvent) -> Input {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Input::Quit;
    }
    match key.code {
        KeyCode::Char('q') => Input::Quit,
        KeyCode::Char('h') => Input::Left,
        KeyCode::Char('l') => Input::Right,
        _ => Input::None,
    }
}

/// Start the blocking key reader. It exits after delivering `Quit` or when
/// the terminal stops producing events.
pub fn spawn_reader(slot: InputSlot) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("input-reader".into())
        .spawn(move || {
            loop {
                let key = match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                    Ok(_) => continue,
                    Err(err) => {
                        log::error!("Input reader stopped: {err}");
                        slot.put(Input::Quit);
                        return;
                    }
                };
                let input = map_key(key);
                slot.put(input);
                if input == Input::Quit {
                    return;
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Input::Quit);
        assert_eq!(map_key(press(KeyCode::Char('h'))), Input::Left);
        assert_eq!(map_key(press(KeyCode::Char('l'))), Input::Right);
        assert_eq!(map_key(press(KeyCode::Char('x'))), Input::None);
        assert_eq!(map_key(press(KeyCode::Left)), Input::None);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Input::Quit
        );
    }

    #[test]
    fn test_slot_keeps_latest_only() {
        let slot = InputSlot::new();
        assert_eq!(slot.take(), Input::None);

        slot.put(Input::Left);
        slot.put(Input::Right);
        assert_eq!(slot.take(), Input::Right);
        assert_eq!(slot.take(), Input::None);
    }

    #[test]
    fn test_unbound_key_overwrites_pending() {
        let slot = InputSlot::new();
        slot.put(Input::Left);
        slot.put(map_key(press(KeyCode::Char('z'))));
        assert_eq!(slot.take(), Input::None);
    }

    #[test]
    fn test_slot_shared_across_threads() {
        let slot = InputSlot::new();
        let writer = slot.clone();
        thread::spawn(move || writer.put(Input::Quit))
            .join()
            .unwrap();
        assert_eq!(slot.take(), Input::Quit);
    }
}
