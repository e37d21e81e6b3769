pub mod image;
pub mod instruction;
pub mod opcodes;
#[cfg(test)]
pub(crate) mod test_helpers;
pub mod trap_routines;

use crate::emulator::instruction::{Instruction, Opcode};
use crate::errors::{ExecutionError, LoadProgramError};
use crate::hardware::keyboard::{ChannelInputProvider, KeyboardInputProvider, TerminalInputProvider};
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;

/// Number of executed instructions between two checks for an operator interrupt.
const INTERRUPT_CHECK_INTERVAL: u64 = 4096;

/// Console texts of the trap routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Written by the IN trap before reading a character.
    pub input_prompt: String,
    /// Written by the HALT trap, nothing is written for `None`.
    pub halt_notice: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_prompt: "Enter a character: ".to_owned(),
            halt_notice: Some("HALT\n".to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Entered by the HALT trap only, terminal.
    Halted,
}

/// The public facing emulator used to run LC-3 programs.
pub struct Emulator {
    pub(crate) registers: Registers,
    pub(crate) memory: Memory,
    state: RunState,
    config: Config,
    origin: Option<u16>,
    steps: u64,
}

impl Emulator {
    /// Machine with zeroed memory and registers, PC at `0x3000` until a program is loaded.
    #[must_use]
    pub fn new(keyboard: Box<dyn KeyboardInputProvider>, config: Config) -> Self {
        Self {
            registers: Registers::default(),
            memory: Memory::new(keyboard),
            state: RunState::Running,
            config,
            origin: None,
            steps: 0,
        }
    }

    /// Loads a program image given as words, the first word is the `.ORIG` address the rest
    /// is loaded at. The origin of the first loaded program becomes the initial PC,
    /// programs loaded later only add to memory.
    ///
    /// Returns the origin of the program.
    ///
    /// # Errors
    /// - Program is missing valid .ORIG header (because it is shorter than one `u16` instruction)
    pub fn load_program(&mut self, program: &[u16]) -> Result<u16, LoadProgramError> {
        let Some((&origin, rest)) = program.split_first() else {
            return Err(LoadProgramError::ProgramMissingOrigHeader);
        };
        let loaded = self.memory.load_image(origin, rest);
        tracing::info!("Loaded {loaded} words at {origin:#06X}");
        if self.origin.is_none() {
            self.origin = Some(origin);
            self.registers.set_pc(origin);
        }
        Ok(origin)
    }

    /// Replaces the keyboard behind the memory mapped keyboard registers and the input traps.
    pub fn set_keyboard(&mut self, keyboard: Box<dyn KeyboardInputProvider>) {
        self.memory.set_keyboard(keyboard);
    }

    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Fetches, decodes and executes one instruction.
    ///
    /// Unused opcodes and unknown trap vectors do nothing. Once halted, stepping does nothing.
    ///
    /// # Errors
    /// - reading from the keyboard or writing to `stdout` failed
    /// - the operator interrupted a blocking keyboard read
    pub fn step(&mut self, stdout: &mut impl Write) -> Result<RunState, ExecutionError> {
        if self.state == RunState::Halted {
            return Ok(self.state);
        }
        let i = Instruction::from(self.memory.read(self.registers.pc().as_binary())?);
        tracing::trace!(pc = self.registers.pc().as_binary(), instruction = ?i);
        self.registers.increment_pc();
        self.steps += 1;

        let r = &mut self.registers;
        let m = &mut self.memory;
        match i.opcode() {
            Opcode::Br => opcodes::br(i, r),
            Opcode::Add => opcodes::add(i, r),
            Opcode::Ld => opcodes::ld(i, r, m)?,
            Opcode::St => opcodes::st(i, r, m),
            Opcode::Jsr => opcodes::jsr(i, r),
            Opcode::And => opcodes::and(i, r),
            Opcode::Ldr => opcodes::ldr(i, r, m)?,
            Opcode::Str => opcodes::str(i, r, m),
            Opcode::Not => opcodes::not(i, r),
            Opcode::Ldi => opcodes::ldi(i, r, m)?,
            Opcode::Sti => opcodes::sti(i, r, m)?,
            Opcode::Jmp => opcodes::jmp_or_ret(i, r),
            Opcode::Lea => opcodes::lea(i, r),
            Opcode::Trap => {
                if let ControlFlow::Break(result) =
                    trap_routines::trap(i, r, m, stdout, &self.config)
                {
                    result?;
                    self.state = RunState::Halted;
                }
            }
            Opcode::Rti | Opcode::Res => opcodes::reserved(i),
        }
        Ok(self.state)
    }

    /// Runs the loaded program until it halts.
    ///
    /// # Errors
    /// - reading from the keyboard or writing to `stdout` failed
    /// - the operator pressed CTRL-C
    pub fn execute(&mut self, stdout: &mut impl Write) -> Result<(), ExecutionError> {
        while self.state == RunState::Running {
            if self.steps % INTERRUPT_CHECK_INTERVAL == 0
                && self.memory.keyboard_mut().check_interrupted()?
            {
                return Err(ExecutionError::Interrupted);
            }
            self.step(stdout)?;
        }
        tracing::info!("Executed {} instructions", self.steps);
        Ok(())
    }
}

/// Creates an emulator reading the keyboard from the terminal with the program at `path` loaded.
///
/// # Errors
/// See [`image::read_image_file`]
pub fn from_program(path: impl AsRef<Path>) -> Result<Emulator, LoadProgramError> {
    let program = image::read_image_file(path)?;
    let mut emu = Emulator::new(Box::new(TerminalInputProvider::new()), Config::default());
    emu.load_program(&program)?;
    Ok(emu)
}

/// Creates an emulator without keyboard input with `program` loaded.
///
/// # Errors
/// See [`Emulator::load_program`]
pub fn from_program_bytes(program: &[u16]) -> Result<Emulator, LoadProgramError> {
    let mut emu = Emulator::new(Box::new(ChannelInputProvider::empty()), Config::default());
    emu.load_program(program)?;
    Ok(emu)
}
