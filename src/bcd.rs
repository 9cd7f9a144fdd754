// Copyright (c) 2017-2021 Rene van der Meer
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
// THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Binary-coded decimal (BCD) conversion.
//!
//! The time-keeping registers of both supported clock chips store each
//! decimal digit in its own nibble, with the tens digit in the upper nibble
//! and the units digit in the lower nibble. `0x59` represents 59.

/// Decodes a packed BCD byte into its decimal value.
///
/// `bcd_to_dec` doesn't check whether `bcd` holds valid digits. Use
/// [`is_valid_bcd`] first when the input comes from the device.
///
/// [`is_valid_bcd`]: fn.is_valid_bcd.html
pub fn bcd_to_dec(bcd: u8) -> u8 {
    ((bcd >> 4) * 10) + (bcd & 0x0F)
}

/// Encodes a decimal value between 0 and 99 as a packed BCD byte.
pub fn dec_to_bcd(dec: u8) -> u8 {
    ((dec / 10) << 4) | (dec % 10)
}

/// Returns `true` if both nibbles of `value` hold a decimal digit (0-9).
pub fn is_valid_bcd(value: u8) -> bool {
    (value >> 4) <= 9 && (value & 0x0F) <= 9
}

// Decodes a masked register value, rejecting nibbles above 9.
pub(crate) fn checked_bcd_to_dec(value: u8) -> Option<u8> {
    if is_valid_bcd(value) {
        Some(bcd_to_dec(value))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_values() {
        assert_eq!(bcd_to_dec(0x00), 0);
        assert_eq!(bcd_to_dec(0x09), 9);
        assert_eq!(bcd_to_dec(0x10), 10);
        assert_eq!(bcd_to_dec(0x59), 59);
        assert_eq!(bcd_to_dec(0x99), 99);
    }

    #[test]
    fn encodes_known_values() {
        assert_eq!(dec_to_bcd(0), 0x00);
        assert_eq!(dec_to_bcd(7), 0x07);
        assert_eq!(dec_to_bcd(23), 0x23);
        assert_eq!(dec_to_bcd(99), 0x99);
    }

    #[test]
    fn every_decimal_survives_encoding() {
        for dec in 0..=99u8 {
            let bcd = dec_to_bcd(dec);
            assert!(is_valid_bcd(bcd));
            assert_eq!(bcd_to_dec(bcd), dec);
        }
    }

    #[test]
    fn rejects_invalid_nibbles() {
        assert!(!is_valid_bcd(0x0A));
        assert!(!is_valid_bcd(0xA0));
        assert!(!is_valid_bcd(0xFF));
        assert_eq!(checked_bcd_to_dec(0x3F), None);
        assert_eq!(checked_bcd_to_dec(0x31), Some(31));
    }
}
