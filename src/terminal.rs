//! Console mode handling around a program run.
use crossterm::terminal;
use std::io;
use std::io::Write;

/// Terminal is in raw mode for as long as this lives.
pub struct RawLock {}

impl Drop for RawLock {
    fn drop(&mut self) {
        // terminal stays in raw mode but no means to repair
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Error resetting terminal {e}");
        }
    }
}

/// Switches the terminal to raw mode: no line buffering, no echo and CTRL-C delivered as key.
///
/// # Errors
/// - terminal mode cannot be changed, e.g. because stdin is no terminal
pub fn set_terminal_raw() -> io::Result<RawLock> {
    terminal::enable_raw_mode()?;
    Ok(RawLock {})
}

/// Raw mode turns off output post-processing, so line feeds need an explicit carriage return.
pub struct RawModeWriter<W: Write> {
    inner: W,
}

impl<W: Write> RawModeWriter<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for RawModeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for (idx, part) in buf.split(|b| *b == b'\n').enumerate() {
            if idx > 0 {
                self.inner.write_all(b"\r\n")?;
            }
            self.inner.write_all(part)?;
        }
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    pub fn test_raw_mode_writer_adds_carriage_returns() {
        let mut out = RawModeWriter::new(Vec::new());
        write!(out, "\nHALT\nok").unwrap();
        expect_that!(out.inner, eq(&b"\r\nHALT\r\nok".to_vec()));
    }
    #[gtest]
    pub fn test_raw_mode_writer_without_line_feed() {
        let mut out = RawModeWriter::new(Vec::new());
        out.write_all(b"abc").unwrap();
        expect_that!(out.inner, eq(&b"abc".to_vec()));
    }
}
