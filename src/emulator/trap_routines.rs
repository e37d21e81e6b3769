use crate::emulator::Config;
use crate::emulator::instruction::Instruction;
use crate::errors::ExecutionError;
use crate::hardware::keyboard::KeyboardInputProvider;
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Registers, from_binary};
use std::io;
use std::io::Write;
use std::ops::ControlFlow;

/// Trap vectors of the service routines, the low 8 bits of a TRAP instruction.
#[repr(u8)]
#[derive(enumn::N, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapVector {
    GetC = 0x20,
    Out = 0x21,
    PutS = 0x22,
    In = 0x23,
    PutSp = 0x24,
    Halt = 0x25,
}

/// TRAP: saves PC in R7 and runs the service routine selected by `trapvect8`.
/// ```text
///  15__12__11__8___7________0_
/// | 1111 | 0000 | trapvect8 |
///  -------------------------
/// ```
/// Unknown trap vectors are ignored.
pub fn trap(
    i: Instruction,
    regs: &mut Registers,
    mem: &mut Memory,
    stdout: &mut impl Write,
    config: &Config,
) -> ControlFlow<Result<(), ExecutionError>> {
    regs.set(7, regs.pc());
    let Some(vector) = TrapVector::n(i.trap_vector()) else {
        tracing::debug!("Ignoring unknown trap vector {:#04X}", i.trap_vector());
        return ControlFlow::Continue(());
    };
    match vector {
        TrapVector::GetC => get_c(regs, mem.keyboard_mut()),
        TrapVector::Out => out(regs, stdout),
        TrapVector::PutS => put_s(regs, mem, stdout),
        TrapVector::In => in_trap(regs, mem.keyboard_mut(), stdout, &config.input_prompt),
        TrapVector::PutSp => put_sp(regs, mem, stdout),
        TrapVector::Halt => halt(stdout, config.halt_notice.as_deref()),
    }
}

fn read_character_from_keyboard(
    regs: &mut Registers,
    keyboard: &mut dyn KeyboardInputProvider,
) -> Result<u8, ExecutionError> {
    let c = keyboard.read_input_character()?;
    regs.set(0, from_binary(u16::from(c)));
    regs.update_conditional_register(0);
    Ok(c)
}

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0. The high eight bits of R0 are cleared.
pub fn get_c(
    regs: &mut Registers,
    keyboard: &mut dyn KeyboardInputProvider,
) -> ControlFlow<Result<(), ExecutionError>> {
    match read_character_from_keyboard(regs, keyboard) {
        Ok(_) => ControlFlow::Continue(()),
        Err(e) => ControlFlow::Break(Err(e)),
    }
}

/// IN: Print a prompt on the screen and read a single character echoed back from the keyboard.
///
/// Otherwise, like 0x20 GETC.
pub fn in_trap(
    regs: &mut Registers,
    keyboard: &mut dyn KeyboardInputProvider,
    stdout: &mut impl Write,
    prompt: &str,
) -> ControlFlow<Result<(), ExecutionError>> {
    write_out(prompt.as_bytes(), stdout)?;
    match read_character_from_keyboard(regs, keyboard) {
        Ok(c) => write_out(&[c], stdout),
        Err(e) => ControlFlow::Break(Err(e)),
    }
}

/// OUT: Write a character in R0[7:0] to the console display.
pub fn out(regs: &Registers, stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    let [low, _high] = regs.get(0).as_binary().to_le_bytes();
    write_out(&[low], stdout)
}

fn put_one_char_per_u16(input: u16, append_to: &mut Vec<u8>) {
    let [low, _high] = input.to_le_bytes();
    append_to.push(low);
}

fn put_two_chars_per_u16(input: u16, append_to: &mut Vec<u8>) {
    let [low, high] = input.to_le_bytes();
    append_to.push(low);
    if high != 0 {
        append_to.push(high);
    }
}

fn put(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
    handle_char: fn(u16, &mut Vec<u8>),
) -> ControlFlow<Result<(), ExecutionError>> {
    let mut address = regs.get(0).as_binary();
    let mut s = Vec::with_capacity(120);
    while mem.peek(address) != 0 {
        handle_char(mem.peek(address), &mut s);
        address = address.wrapping_add(1);
    }
    write_out(&s, stdout)
}

/// PUTS: print null-delimited char* from register 0's address, one character per word
pub fn put_s(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, stdout, put_one_char_per_u16)
}

/// PUTSP: Packed version of PUTS
///
/// The ASCII code contained in bits [7:0] of a memory location is written to the console first.
/// The second character of the last memory location can be 0x00.
/// Writing terminates with a 0x0000 word.
pub fn put_sp(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, stdout, put_two_chars_per_u16)
}

/// HALT: End program and write the halt notice, if any
pub fn halt(
    stdout: &mut impl Write,
    notice: Option<&str>,
) -> ControlFlow<Result<(), ExecutionError>> {
    if let Some(notice) = notice {
        write_out(notice.as_bytes(), stdout)?;
    }
    tracing::info!("Program halted");
    ControlFlow::Break(Ok(()))
}

fn write_out(data: &[u8], stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    match stdout.write_all(data).and_then(|()| stdout.flush()) {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(e),
    }
}

fn wrap_io_error_in_cf(error: io::Error) -> ControlFlow<Result<(), ExecutionError>, ()> {
    ControlFlow::Break(Err(ExecutionError::from(error)))
}
