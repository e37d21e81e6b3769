use crate::numbers;
use std::fmt::{Debug, Formatter};

/// The 16 LC-3 operation codes, bits `[15:12]` of an instruction.
#[repr(u8)]
#[derive(enumn::N, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Br = 0b0000,
    Add = 0b0001,
    Ld = 0b0010,
    St = 0b0011,
    Jsr = 0b0100,
    And = 0b0101,
    Ldr = 0b0110,
    Str = 0b0111,
    /// Return from interrupt, unused without privilege levels.
    Rti = 0b1000,
    Not = 0b1001,
    Ldi = 0b1010,
    Sti = 0b1011,
    /// JMP and RET
    Jmp = 0b1100,
    /// Reserved
    Res = 0b1101,
    Lea = 0b1110,
    Trap = 0b1111,
}

/// Wrapper for LC-3 u16 instruction.
/// format is: `OOOO_DDD_P_PPPP_PPPP`
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Instruction(u16);

impl Instruction {
    /// Gives the value of only the specified bit range.
    ///
    /// # Parameters
    /// - `from`: starting index
    /// - `to`: end index (inclusive), mut be greater or equal to `from`
    ///
    /// # Panics
    /// - asserts that to is greater or equal from and both are valid indexes
    #[must_use]
    pub fn get_bit_range(self, from: u8, to: u8) -> u16 {
        debug_assert!(
            to >= from,
            "wrong direction of from: {from:?} and to: {to:?}"
        );
        debug_assert!(
            (0..u16::BITS).contains(&u32::from(to)),
            "index: {to:?} to u16 is greater than maximum value {:?}",
            u16::BITS - 1
        );
        (self.0 >> from) & (u16::MAX >> (15 - (to - from)))
    }
    /// Gives the value of only the specified bit range and converts that to u8.
    /// See [`Instruction::get_bit_range()`]
    /// # Panics
    /// - value does not fit into u8 with message from `expect`
    #[must_use]
    pub fn get_bit_range_u8(self, from: u8, to: u8, expect: &str) -> u8 {
        u8::try_from(self.get_bit_range(from, to)).expect(expect)
    }
    #[must_use]
    pub fn get_bit(self, index: u8) -> bool {
        self.get_bit_range(index, index) & 1 != 0
    }
    #[must_use]
    pub fn op_code(self) -> u8 {
        self.get_bit_range_u8(12, 15, "Error parsing op_code")
    }
    /// # Panics
    /// - never, every 4 bit value is an opcode
    #[must_use]
    pub fn opcode(self) -> Opcode {
        Opcode::n(self.op_code()).expect("every 4 bit value is an opcode")
    }
    /// Destination register, also the source register of the store operations.
    #[must_use]
    pub fn dr_number(self) -> u8 {
        self.get_bit_range_u8(9, 11, "Error parsing dr")
    }
    #[must_use]
    pub fn sr1_number(self) -> u8 {
        self.get_bit_range_u8(6, 8, "Error parsing sr1")
    }
    #[must_use]
    pub fn sr2_number(self) -> u8 {
        self.get_bit_range_u8(0, 2, "Error parsing sr2")
    }
    #[must_use]
    pub fn base_r_number(self) -> u8 {
        self.get_bit_range_u8(6, 8, "Error parsing BaseR")
    }
    #[must_use]
    pub fn is_immediate(self) -> bool {
        self.get_bit(5)
    }
    /// Sign extended `imm5` of ADD and AND.
    #[must_use]
    pub fn get_immediate(self) -> u16 {
        numbers::sign_extend(self.get_bit_range(0, 4), 5)
    }
    /// Sign extended offset in the lowest `len` bits, to be added with wrapping to PC or a
    /// base register.
    #[must_use]
    pub fn offset(self, len: u8) -> u16 {
        numbers::sign_extend(self.get_bit_range(0, len - 1), len)
    }
    /// The `nzp` condition mask of BR.
    #[must_use]
    pub fn nzp(self) -> u16 {
        self.get_bit_range(9, 11)
    }
    #[must_use]
    pub fn trap_vector(self) -> u8 {
        self.get_bit_range_u8(0, 7, "Error parsing trap vector")
    }
}

impl Debug for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} ({:#06X}), DR: {:03b}, PC_Off: {:09b}",
            self.opcode(),
            self.0,
            self.dr_number(),
            self.get_bit_range(0, 8)
        )
    }
}

impl From<u16> for Instruction {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}
