use crate::errors::ExecutionError;
use crate::hardware::keyboard::KeyboardInputProvider;
use std::fmt::{Debug, Formatter};

pub const PROGRAM_SECTION_START: u16 = 0x3000;
pub const MEMORY_SIZE_U16: usize = 1 << 16;

/// Memory regions mapped to IO functionality.
#[repr(u16)]
#[derive(enumn::N, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMappedIOLocations {
    /// Keyboard Status Register
    Kbsr = 0xFE00,
    /// Keyboard Data Register
    Kbdr = 0xFE02,
}

/// An abstraction for the LC-3 memory, the full 16-bit address space excluding registers.
pub struct Memory {
    /// Index equals memory address
    data: Box<[u16]>,
    keyboard: Box<dyn KeyboardInputProvider>,
}

impl Debug for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Memory {{ KBSR: {:#06X}, KBDR: {:#06X} }}",
            self.peek(MemoryMappedIOLocations::Kbsr as u16),
            self.peek(MemoryMappedIOLocations::Kbdr as u16)
        )
    }
}

impl Memory {
    pub const KEYBOARD_STATUS_REGISTER_SET: u16 = 1 << 15;
    pub const KEYBOARD_STATUS_REGISTER_UNSET: u16 = 0;

    #[must_use]
    pub fn new(keyboard: Box<dyn KeyboardInputProvider>) -> Self {
        Self {
            data: vec![0x0u16; MEMORY_SIZE_U16].into_boxed_slice(),
            keyboard,
        }
    }

    /// Reads the word at `address`.
    ///
    /// Reading the keyboard status register polls the keyboard first: if a character is
    /// available the status register gets its top bit set and the data register receives the
    /// character, otherwise the status register is cleared.
    ///
    /// # Errors
    /// - polling the keyboard failed
    pub fn read(&mut self, address: u16) -> Result<u16, ExecutionError> {
        if MemoryMappedIOLocations::n(address) == Some(MemoryMappedIOLocations::Kbsr) {
            self.poll_keyboard()?;
        }
        Ok(self.peek(address))
    }

    fn poll_keyboard(&mut self) -> Result<(), ExecutionError> {
        if let Some(c) = self.keyboard.poll_input_character()? {
            self.write(
                MemoryMappedIOLocations::Kbsr as u16,
                Self::KEYBOARD_STATUS_REGISTER_SET,
            );
            self.write(MemoryMappedIOLocations::Kbdr as u16, u16::from(c));
        } else {
            self.write(
                MemoryMappedIOLocations::Kbsr as u16,
                Self::KEYBOARD_STATUS_REGISTER_UNSET,
            );
        }
        Ok(())
    }

    /// Reads the word at `address` without triggering device side effects.
    #[must_use]
    pub fn peek(&self, address: u16) -> u16 {
        self.data[usize::from(address)]
    }

    pub fn write(&mut self, address: u16, value: u16) {
        self.data[usize::from(address)] = value;
    }

    /// Copies `words` into memory starting at `origin`.
    ///
    /// Words that would not fit below the end of the address space are dropped,
    /// returns the number of words loaded.
    pub fn load_image(&mut self, origin: u16, words: &[u16]) -> usize {
        let start = usize::from(origin);
        let count = words.len().min(MEMORY_SIZE_U16 - start);
        if count < words.len() {
            tracing::warn!(
                "Image at {origin:#06X} exceeds the address space, dropped {} words",
                words.len() - count
            );
        }
        self.data[start..start + count].copy_from_slice(&words[..count]);
        count
    }

    pub fn set_keyboard(&mut self, keyboard: Box<dyn KeyboardInputProvider>) {
        self.keyboard = keyboard;
    }
    pub fn keyboard_mut(&mut self) -> &mut dyn KeyboardInputProvider {
        self.keyboard.as_mut()
    }
}
