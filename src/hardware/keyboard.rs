use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::VecDeque;
use std::io;
use std::io::Read;
use std::sync::mpsc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

/// Providing Keyboard Input independent of an implementation.
pub trait KeyboardInputProvider {
    /// Takes the next character if one is available, does not block.
    ///
    /// # Errors
    /// - the underlying input could not be queried
    fn poll_input_character(&mut self) -> io::Result<Option<u8>>;
    /// Takes the next character, blocking until one is available.
    ///
    /// # Errors
    /// - the underlying input failed or is exhausted
    /// - `io::ErrorKind::Interrupted` if CTRL-C was pressed while waiting
    fn read_input_character(&mut self) -> io::Result<u8>;
    /// True if CTRL-C was triggered. Does not block and does not drop pending input.
    ///
    /// # Errors
    /// - the underlying input could not be queried
    fn check_interrupted(&mut self) -> io::Result<bool>;
}

/// Keyboard input from a terminal in raw mode, read as crossterm key events.
#[derive(Debug, Default)]
pub struct TerminalInputProvider {
    pending: VecDeque<u8>,
    is_interrupted: bool,
}

impl TerminalInputProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            is_interrupted: false,
        }
    }

    /// Records a key event, returns the character it produced, if any.
    fn handle_key_event(&mut self, event: &KeyEvent) -> Option<u8> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            self.is_interrupted = true;
            return None;
        }
        key_code_to_ascii(event.code)
    }

    /// Moves all events that are available without blocking into the pending queue.
    fn drain_events(&mut self) -> io::Result<()> {
        while event::poll(Duration::from_secs(0))? {
            if let Event::Key(key) = event::read()?
                && let Some(c) = self.handle_key_event(&key)
            {
                self.pending.push_back(c);
            }
        }
        Ok(())
    }

    fn interrupted_error() -> io::Error {
        io::Error::new(io::ErrorKind::Interrupted, "CTRL-C pressed")
    }
}

impl KeyboardInputProvider for TerminalInputProvider {
    fn poll_input_character(&mut self) -> io::Result<Option<u8>> {
        self.drain_events()?;
        Ok(self.pending.pop_front())
    }
    fn read_input_character(&mut self) -> io::Result<u8> {
        if let Some(c) = self.pending.pop_front() {
            return Ok(c);
        }
        loop {
            if self.is_interrupted {
                return Err(Self::interrupted_error());
            }
            if let Event::Key(key) = event::read()?
                && let Some(c) = self.handle_key_event(&key)
            {
                return Ok(c);
            }
        }
    }
    fn check_interrupted(&mut self) -> io::Result<bool> {
        self.drain_events()?;
        Ok(self.is_interrupted)
    }
}

const fn key_code_to_ascii(code: KeyCode) -> Option<u8> {
    match code {
        KeyCode::Char(c) if c.is_ascii() => Some(c as u8),
        KeyCode::Enter => Some(b'\n'),
        KeyCode::Tab => Some(b'\t'),
        KeyCode::Backspace => Some(0x08),
        KeyCode::Esc => Some(0x1B),
        _ => None,
    }
}

/// Keyboard input fed through a channel, used for piped stdin and tests.
///
/// Once the sending side is gone and all characters are consumed, polling reports no
/// input and a blocking read fails with `io::ErrorKind::UnexpectedEof`.
#[derive(Debug)]
pub struct ChannelInputProvider {
    receiver: Receiver<u8>,
}

impl ChannelInputProvider {
    #[must_use]
    pub const fn new(receiver: Receiver<u8>) -> Self {
        Self { receiver }
    }
    /// Provider that never has input available.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_bytes(b"")
    }
    /// Provider delivering exactly `data`, then end of input.
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        let (sender, receiver) = mpsc::channel();
        for b in data {
            // receiver is still alive, sending cannot fail
            let _ = sender.send(*b);
        }
        Self::new(receiver)
    }
    /// Pumps bytes from stdin into the channel on a background thread.
    #[must_use]
    pub fn spawn_stdin_reader() -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            for byte in stdin.lock().bytes() {
                match byte {
                    Ok(b) => {
                        if sender.send(b).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Reading stdin failed: {e}");
                        break;
                    }
                }
            }
        });
        Self::new(receiver)
    }
}

impl KeyboardInputProvider for ChannelInputProvider {
    fn poll_input_character(&mut self) -> io::Result<Option<u8>> {
        match self.receiver.try_recv() {
            Ok(c) => Ok(Some(c)),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => Ok(None),
        }
    }
    fn read_input_character(&mut self) -> io::Result<u8> {
        self.receiver
            .recv()
            .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "end of keyboard input"))
    }
    fn check_interrupted(&mut self) -> io::Result<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    pub fn test_channel_provider_poll_and_read() {
        let mut kip = ChannelInputProvider::from_bytes(b"ab");
        expect_that!(kip.poll_input_character().unwrap(), eq(Some(b'a')));
        expect_that!(kip.read_input_character().unwrap(), eq(b'b'));
        expect_that!(kip.poll_input_character().unwrap(), eq(None));
        expect_that!(kip.check_interrupted().unwrap(), eq(false));
    }
    #[gtest]
    pub fn test_channel_provider_exhausted() {
        let mut kip = ChannelInputProvider::empty();
        let err = kip.read_input_character().unwrap_err();
        expect_that!(err.kind(), eq(io::ErrorKind::UnexpectedEof));
    }
    #[gtest]
    pub fn test_terminal_key_events() {
        let mut kip = TerminalInputProvider::new();
        let press = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        expect_that!(kip.handle_key_event(&press), eq(Some(b'x')));
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        expect_that!(kip.handle_key_event(&enter), eq(Some(b'\n')));
        let arrow = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        expect_that!(kip.handle_key_event(&arrow), eq(None));
        expect_that!(kip.is_interrupted, eq(false));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        expect_that!(kip.handle_key_event(&ctrl_c), eq(None));
        expect_that!(kip.is_interrupted, eq(true));
    }
    #[gtest]
    pub fn test_terminal_pending_input_is_read_first() {
        let mut kip = TerminalInputProvider::new();
        kip.pending.push_back(b'q');
        expect_that!(kip.read_input_character().unwrap(), eq(b'q'));
    }
}
