//! # LC-3 Virtual Machine.
//!
//! `lc3-vm` runs programs for the LC-3 computer: 64K words of memory, eight general purpose
//! registers, the 15 instructions and the trap routines for console I/O including the memory
//! mapped keyboard.
//! Usage starts with loading a program via [`emulator::from_program`] or
//! [`emulator::Emulator::load_program`].
//!
//!  # Example
//! ```
//! use lc3_vm::emulator;
//! // .ORIG x3000, AND R0, R0, #0, ADD R0, R0, #5, HALT
//! let mut emu = emulator::from_program_bytes(&[0x3000, 0x5020, 0x1025, 0xF025]).unwrap();
//! let mut output = Vec::new();
//! emu.execute(&mut output).unwrap();
//! assert_eq!(emu.registers().get(0).as_decimal(), 5);
//! assert_eq!(output, b"HALT\n");
//! ```
//! # Errors
//! - Program is missing valid .ORIG header (because it is shorter than one `u16` instruction)
//! - Program image cannot be read
//! - Keyboard input or console output fails while running, or the run is interrupted

pub mod emulator;
pub mod errors;
pub mod hardware;
pub mod numbers;
pub mod terminal;
