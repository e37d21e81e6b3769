//! Implemented operations for the LC 3.
//!
//! All address computations wrap around at the end of the 16-bit address space and use the
//! already incremented PC.
use crate::emulator::instruction::Instruction;
use crate::errors::ExecutionError;
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Registers, from_binary};

/// ADD: Mathematical addition in 2 variants
/// - DR is set with result of SR 1 + SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0001 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 + sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0001 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn add(i: Instruction, r: &mut Registers) {
    let operand = second_operand(i, r);
    r.set(
        i.dr_number(),
        from_binary(r.get(i.sr1_number()).as_binary().wrapping_add(operand)),
    );
    r.update_conditional_register(i.dr_number());
}
/// AND: bit-wise AND in 2 variants
/// - DR is set with result of SR 1 AND SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0101 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 AND sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0101 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn and(i: Instruction, r: &mut Registers) {
    let operand = second_operand(i, r);
    r.set(
        i.dr_number(),
        from_binary(r.get(i.sr1_number()).as_binary() & operand),
    );
    r.update_conditional_register(i.dr_number());
}

fn second_operand(i: Instruction, r: &Registers) -> u16 {
    if i.is_immediate() {
        i.get_immediate()
    } else {
        r.get(i.sr2_number()).as_binary()
    }
}

/// NOT: bit-wise complement of the value in SR 1
/// ```text
///  15__12__11_9__8_6___5___0_
/// | 1001 |  DR | SR1 | 11111 |
///  --------------------------
/// ```
pub fn not(i: Instruction, r: &mut Registers) {
    r.set(
        i.dr_number(),
        from_binary(!r.get(i.sr1_number()).as_binary()),
    );
    r.update_conditional_register(i.dr_number());
}
/// BR: Conditional Branch
/// This opcode adds the value of the sign extended offset to PC if the current state of the
/// `ConditionFlag` matches a set bit of `n`, `z` or `p`. With none of the bits set the branch
/// is never taken.
/// ```text
///  15__12__11_9___8_______0_
/// | 0000 |  nzp | PCoffset9 |
///  -------------------------
/// ```
/// See [`crate::hardware::registers::ConditionFlag`]
pub fn br(i: Instruction, r: &mut Registers) {
    if i.nzp() & r.get_conditional_register().bits() != 0 {
        r.set_pc(address_by_pc_offset(i, r));
    }
}
/// JSR: Jump to Sub-Routine.
/// Two variants:
/// - JSR to `PCOffset11`
/// ```text
///  15__12__11_10_________0
/// | 0100 | 1 | PCOffset11 |
///  -----------------------
/// ```
/// - JSRR: JSR to location in `BaseR`
/// ```text
///  15__12__11_9__8___6___5____0_
/// | 0100 | 000 | BaseR | 000000 |
///  -----------------------------
/// ```
/// The former PC is saved in R7.
pub fn jsr(i: Instruction, r: &mut Registers) {
    let temp_pc = r.pc();
    r.set_pc(if i.get_bit(11) {
        r.pc().as_binary().wrapping_add(i.offset(11))
    } else {
        // read before R7 is overwritten, JSRR R7 jumps to the old R7
        r.get(i.base_r_number()).as_binary()
    });
    r.set(7, temp_pc);
}
/// JMP or RET operation. Does not touch the condition register.
/// - JMP sets the PC to the value of register `BaseR`
/// ```text
///  15__12__11_9___8_6____5____0_
/// | 1100 | 000 | BaseR | 000000 |
///  -----------------------------
/// ```
/// - RET same as JMP, but special case for returning from JSR where former PC is saved in R7.
/// ```text
///  15__12__11_9__8_6___5____0_
/// | 1100 | 000 | 111 | 000000 |
///  ---------------------------
/// ```
pub fn jmp_or_ret(i: Instruction, r: &mut Registers) {
    r.set_pc(r.get(i.base_r_number()).as_binary());
}

/// LD: Loads content of memory address of PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 0010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
///
/// # Errors
/// - reading a memory mapped device failed
pub fn ld(i: Instruction, r: &mut Registers, memory: &mut Memory) -> Result<(), ExecutionError> {
    let value = memory.read(address_by_pc_offset(i, r))?;
    r.set(i.dr_number(), from_binary(value));
    r.update_conditional_register(i.dr_number());
    Ok(())
}

/// LDI: Load indirect.
/// Calculates memory address of PC + sign extended offset and reads another address from there,
/// the content of the memory at that indirectly loaded address is put into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
///
/// # Errors
/// - reading a memory mapped device failed
pub fn ldi(i: Instruction, r: &mut Registers, memory: &mut Memory) -> Result<(), ExecutionError> {
    let address_address = address_by_pc_offset(i, r);
    let value_address = memory.read(address_address)?;
    r.set(i.dr_number(), from_binary(memory.read(value_address)?));
    r.update_conditional_register(i.dr_number());
    Ok(())
}
/// LDR: Load address from base register and adds sign extended offset to load the memory content
/// from there into DR.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0110 |  DR | BaseR | offset6 |
///  ------------------------------
/// ```
///
/// # Errors
/// - reading a memory mapped device failed
pub fn ldr(i: Instruction, r: &mut Registers, memory: &mut Memory) -> Result<(), ExecutionError> {
    let value_address = address_by_baser_offset(i, r);
    r.set(i.dr_number(), from_binary(memory.read(value_address)?));
    r.update_conditional_register(i.dr_number());
    Ok(())
}

fn address_by_pc_offset(i: Instruction, r: &Registers) -> u16 {
    r.pc().as_binary().wrapping_add(i.offset(9))
}
fn address_by_baser_offset(i: Instruction, r: &Registers) -> u16 {
    r.get(i.base_r_number()).as_binary().wrapping_add(i.offset(6))
}

/// LEA: Load Effective Address loads PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1110 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn lea(i: Instruction, r: &mut Registers) {
    r.set(i.dr_number(), from_binary(address_by_pc_offset(i, r)));
    r.update_conditional_register(i.dr_number());
}
/// ST: Store. The contents of the SR are written to memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 0011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
pub fn st(i: Instruction, r: &Registers, memory: &mut Memory) {
    let store_address = address_by_pc_offset(i, r);
    memory.write(store_address, r.get(i.dr_number()).as_binary());
}
/// STI: Store Indirect. The contents of the SR are written to the address which is loaded from
/// memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 1011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
///
/// # Errors
/// - reading a memory mapped device failed
pub fn sti(i: Instruction, r: &Registers, memory: &mut Memory) -> Result<(), ExecutionError> {
    let address_of_store_address = address_by_pc_offset(i, r);
    let store_address = memory.read(address_of_store_address)?;
    memory.write(store_address, r.get(i.dr_number()).as_binary());
    Ok(())
}
/// STR: Store contents of SR to memory address of base register plus sign extended offset.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0111 |  SR | BaseR | offset6 |
///  ------------------------------
/// ```
pub fn str(i: Instruction, r: &Registers, memory: &mut Memory) {
    let store_address = address_by_baser_offset(i, r);
    memory.write(store_address, r.get(i.dr_number()).as_binary());
}
/// RTI and the reserved opcode: ignored, registers and memory stay unchanged.
pub fn reserved(i: Instruction) {
    tracing::debug!("Ignoring unused opcode {i:?}");
}
