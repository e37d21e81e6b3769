use std::fmt::{Debug, Formatter};

/// One 16-bit register value, interpretable as raw bits or two's complement number.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct Register(u16);

impl Register {
    #[must_use]
    pub const fn from_binary(value: u16) -> Self {
        Self(value)
    }
    #[must_use]
    pub const fn from_decimal(value: i16) -> Self {
        Self(value.cast_unsigned())
    }
    #[must_use]
    pub const fn as_binary(self) -> u16 {
        self.0
    }
    #[must_use]
    pub const fn as_decimal(self) -> i16 {
        self.0.cast_signed()
    }
}

impl Debug for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06X} ({})", self.0, self.as_decimal())
    }
}

#[must_use]
pub const fn from_binary(value: u16) -> Register {
    Register::from_binary(value)
}
#[must_use]
pub const fn from_decimal(value: i16) -> Register {
    Register::from_decimal(value)
}

/// The LC-3 register file: general purpose registers R0 to R7, program counter and
/// condition register.
#[derive(Clone, PartialEq, Eq)]
pub struct Registers {
    general_purpose: [Register; 8],
    /// Address of the next instruction to fetch.
    pc: Register,
    cond: ConditionFlag,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new(crate::hardware::memory::PROGRAM_SECTION_START)
    }
}

impl Debug for Registers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (idx, r) in self.general_purpose.iter().enumerate() {
            write!(f, "R{idx}: {:#06X}, ", r.as_binary())?;
        }
        write!(f, "PC: {:#06X}, COND: {:?}", self.pc.as_binary(), self.cond)
    }
}

impl Registers {
    /// All general purpose registers are zero and the condition register is `Zero`,
    /// so exactly one flag is set from the start.
    #[must_use]
    pub const fn new(origin: u16) -> Self {
        Self {
            general_purpose: [Register(0); 8],
            pc: Register(origin),
            cond: ConditionFlag::Zero,
        }
    }

    /// # Panics
    /// - `r` is not a valid general purpose register index
    #[must_use]
    pub fn get(&self, r: u8) -> Register {
        assert!(r <= 7, "Invalid general purpose register get: {r}");
        self.general_purpose[usize::from(r)]
    }
    /// # Panics
    /// - `r` is not a valid general purpose register index
    pub fn set(&mut self, r: u8, value: Register) {
        assert!(r <= 7, "Invalid general purpose register set: {r}");
        self.general_purpose[usize::from(r)] = value;
    }
    #[must_use]
    pub const fn pc(&self) -> Register {
        self.pc
    }
    pub const fn set_pc(&mut self, address: u16) {
        self.pc = Register(address);
    }
    /// Moves PC to the following word, wrapping at the end of the address space.
    pub const fn increment_pc(&mut self) {
        self.pc = Register(self.pc.0.wrapping_add(1));
    }

    #[must_use]
    pub const fn get_conditional_register(&self) -> ConditionFlag {
        self.cond
    }
    /// Sets the condition register according to the current value of register `r`.
    pub fn update_conditional_register(&mut self, r: u8) {
        self.cond = ConditionFlag::from(self.get(r).as_binary());
    }
}

/// Condition register, always exactly one of these.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFlag {
    /// Positive
    Pos = 1 << 0,
    Zero = 1 << 1,
    /// Negative
    Neg = 1 << 2,
}

impl ConditionFlag {
    /// The `nzp` bit pattern used by BR.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self as u16
    }
}

impl From<u16> for ConditionFlag {
    fn from(value: u16) -> Self {
        if value == 0 {
            Self::Zero
        } else if value >> 15 == 1 {
            // leftmost bit is 1 for negative numbers
            Self::Neg
        } else {
            Self::Pos
        }
    }
}
