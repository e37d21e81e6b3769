use crate::emulator::{Config, Emulator};
use crate::hardware::keyboard::ChannelInputProvider;
use crate::hardware::memory::{Memory, PROGRAM_SECTION_START};
use crate::hardware::registers::Registers;
use std::io;
use std::io::Write;

pub struct StringWriter {
    vec: Vec<u8>,
}
impl Write for StringWriter {
    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        self.vec.write(data)
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}
impl StringWriter {
    pub fn new() -> Self {
        let vec = Vec::<u8>::with_capacity(120);
        Self { vec }
    }
    pub fn get_string(&self) -> String {
        String::from_utf8(self.vec.clone()).unwrap()
    }
}

/// Emulator with a program loaded at `0x3000`, scripted keyboard input and captured output.
pub struct FakeEmulator<'a> {
    inner: Emulator,
    stdin_data: &'a [u8],
    stdout: StringWriter,
}
impl<'a> FakeEmulator<'a> {
    pub fn new(program_no_header: &[u16]) -> Self {
        let mut program = Vec::with_capacity(program_no_header.len() + 1);
        program.push(PROGRAM_SECTION_START);
        program.extend_from_slice(program_no_header);

        let mut emu = Emulator::new(Box::new(ChannelInputProvider::empty()), Config::default());
        emu.load_program(program.as_slice()).unwrap();
        Self {
            inner: emu,
            stdin_data: b"",
            stdout: StringWriter::new(),
        }
    }
    pub fn add_stdin_input(&'_ mut self, input: &'a [u8]) -> &mut Self {
        self.stdin_data = input;
        self
    }
    pub fn get_parts(&mut self) -> (&mut Registers, &mut Memory, &mut StringWriter) {
        self.inner
            .set_keyboard(Box::new(ChannelInputProvider::from_bytes(self.stdin_data)));
        (
            &mut self.inner.registers,
            &mut self.inner.memory,
            &mut self.stdout,
        )
    }
}
