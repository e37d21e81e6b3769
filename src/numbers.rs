/// Implements sign extension as described at [Sign extension](https://en.wikipedia.org/wiki/Sign_extension).
///
/// `bits` holds a two's complement number `valid_bits` wide, the result is the same number
/// widened to 16 bits.
#[must_use]
pub const fn sign_extend(bits: u16, valid_bits: u8) -> u16 {
    debug_assert!(valid_bits > 0 && valid_bits < 16, "invalid bit count");
    let most_significant_bit = (bits >> (valid_bits - 1)) & 1;
    if most_significant_bit == 1 {
        // negative: 1-extend
        bits | (0xFFFF << valid_bits)
    } else {
        // positive, already 0-extended
        bits
    }
}
