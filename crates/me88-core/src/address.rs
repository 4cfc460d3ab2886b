//! Segmented address arithmetic and byte-pair helpers.

/// Width mask of the 20-bit physical address space.
pub const PHYSICAL_ADDRESS_MASK: u32 = 0x000F_FFFF;

/// Translates a `selector:offset` pair into a 20-bit physical address.
///
/// The result is `(selector * 16 + offset) mod 2^20`; pairs that run past the
/// top of the address space wrap to the bottom.
#[must_use]
pub const fn physical_address(selector: u16, offset: u16) -> u32 {
    ((selector as u32) * 16 + offset as u32) & PHYSICAL_ADDRESS_MASK
}

/// Joins two bytes into a 16-bit word (`hi:lo`).
#[must_use]
pub const fn concat(hi: u8, lo: u8) -> u16 {
    ((hi as u16) << 8) | lo as u16
}

/// Upper byte of a 16-bit word.
#[must_use]
pub const fn high_byte(word: u16) -> u8 {
    (word >> 8) as u8
}

/// Lower byte of a 16-bit word.
#[must_use]
pub const fn low_byte(word: u16) -> u8 {
    (word & 0x00FF) as u8
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{concat, high_byte, low_byte, physical_address, PHYSICAL_ADDRESS_MASK};

    #[test]
    fn reset_vector_lands_on_eprom_base() {
        assert_eq!(physical_address(0xF000, 0x0000), 0xF0000);
    }

    #[test]
    fn addresses_past_the_top_wrap_around() {
        assert_eq!(physical_address(0xFFFF, 0x0010), 0x00000);
        assert_eq!(physical_address(0xFFFF, 0xFFFF), 0x0FFEF);
    }

    #[test]
    fn byte_helpers_split_and_join() {
        assert_eq!(concat(0x12, 0x34), 0x1234);
        assert_eq!(high_byte(0xBEEF), 0xBE);
        assert_eq!(low_byte(0xBEEF), 0xEF);
    }

    proptest! {
        #[test]
        fn physical_address_matches_modular_formula(selector in any::<u16>(), offset in any::<u16>()) {
            let expected = (u64::from(selector) * 16 + u64::from(offset)) % (1 << 20);
            prop_assert_eq!(u64::from(physical_address(selector, offset)), expected);
            prop_assert!(physical_address(selector, offset) <= PHYSICAL_ADDRESS_MASK);
        }

        #[test]
        fn split_then_concat_is_identity(word in any::<u16>()) {
            prop_assert_eq!(concat(high_byte(word), low_byte(word)), word);
        }
    }
}
