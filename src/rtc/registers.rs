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

// Register maps for the DS1307 and DS3231, based on their datasheets.
//
// Both chips share the layout of the seven time-keeping registers at
// 0x00-0x06. Everything past that differs, so each chip gets a RegisterMap
// that lists where its features live, and which ones it lacks.

use super::{SquareWaveFrequency, Variant};

// Time-keeping block
pub const SECONDS: u8 = 0x00;
pub const TIME_LEN: usize = 7;
pub const HMS_LEN: usize = 3;

// Offsets within the time-keeping block
pub const IDX_SECONDS: usize = 0;
pub const IDX_MINUTES: usize = 1;
pub const IDX_HOURS: usize = 2;
pub const IDX_WEEKDAY: usize = 3;
pub const IDX_DATE: usize = 4;
pub const IDX_MONTH: usize = 5;
pub const IDX_YEAR: usize = 6;

// Value bits for each register in the time-keeping block. The hours
// register is handled separately, because its layout depends on the mode.
pub const MASK_SECONDS: u8 = 0x7F;
pub const MASK_MINUTES: u8 = 0x7F;
pub const MASK_WEEKDAY: u8 = 0x07;
pub const MASK_DATE: u8 = 0x3F;
pub const MASK_MONTH: u8 = 0x1F;
pub const MASK_YEAR: u8 = 0xFF;

// Hours register layout, shared by both chips and the DS3231 alarm
pub const HOURS_12H: u8 = 0x40; // bit 6
pub const HOURS_PM: u8 = 0x20; // bit 5
pub const HOURS_MASK_12H: u8 = 0x1F; // bits 4-0 in 12-hour mode
pub const HOURS_MASK_24H: u8 = 0x3F; // bits 5-0 in 24-hour mode

// Alarm match bits (AxMx) occupy bit 7 of each alarm register
pub const ALARM_MATCH_BIT: u8 = 0x80;

// The DS1307 control register only implements bits 7, 4, 1 and 0. The same
// address holds the DS3231's alarm 1 seconds register, which stores all 8 bits.
pub const PROBE_REGISTER: u8 = 0x07;
pub const PROBE_SENTINEL: u8 = 0b0110_1100;

/// A single control or status bit that can be switched on or off.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Switch {
    pub register: u8,
    pub mask: u8,
    // The feature is on when the bit is cleared
    pub active_low: bool,
}

impl Switch {
    pub fn is_on(&self, value: u8) -> bool {
        (value & self.mask != 0) != self.active_low
    }

    pub fn apply(&self, value: u8, on: bool) -> u8 {
        if on != self.active_low {
            value | self.mask
        } else {
            value & !self.mask
        }
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Sram {
    pub start: u8,
    pub len: usize,
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Alarm {
    // Seconds, minutes, hours and day/date registers, in that order
    pub seconds: u8,
    pub flag: Switch,
    // Bits set in the control register to route the alarm to the INT pin
    pub interrupt_enable: (u8, u8),
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Temperature {
    pub msb: u8,
    pub lsb: u8,
    pub conversion: Switch,
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct SquareWave {
    pub enable: Switch,
    pub rate_mask: u8,
    // Rate select bits, indexed by SquareWaveFrequency
    pub rates: [Option<u8>; 5],
}

impl SquareWave {
    pub fn rate(&self, frequency: SquareWaveFrequency) -> Option<u8> {
        self.rates[frequency as usize]
    }
}

/// Describes where a chip keeps each of its features.
#[derive(Debug, PartialEq)]
pub struct RegisterMap {
    pub variant: Variant,
    // Bits in the time-keeping block that aren't part of the time itself,
    // and have to survive a time update
    pub preserve: [u8; TIME_LEN],
    pub clock_running: Option<Switch>,
    pub sram: Option<Sram>,
    pub alarm: Option<Alarm>,
    pub temperature: Option<Temperature>,
    pub square_wave: SquareWave,
    pub output_32khz: Option<Switch>,
}

pub static DS1307: RegisterMap = RegisterMap {
    variant: Variant::Ds1307,
    // CH (clock halt)
    preserve: [0x80, 0, 0, 0, 0, 0, 0],
    clock_running: Some(Switch {
        register: 0x00,
        mask: 0x80,
        active_low: true,
    }),
    sram: Some(Sram {
        start: 0x08,
        len: 56,
    }),
    alarm: None,
    temperature: None,
    square_wave: SquareWave {
        // SQWE
        enable: Switch {
            register: 0x07,
            mask: 0x10,
            active_low: false,
        },
        rate_mask: 0x03,
        rates: [Some(0b00), None, Some(0b01), Some(0b10), Some(0b11)],
    },
    output_32khz: None,
};

pub static DS3231: RegisterMap = RegisterMap {
    variant: Variant::Ds3231,
    // Century
    preserve: [0, 0, 0, 0, 0, 0x80, 0],
    clock_running: None,
    sram: None,
    alarm: Some(Alarm {
        seconds: 0x07,
        // A1F
        flag: Switch {
            register: 0x0F,
            mask: 0x01,
            active_low: false,
        },
        // INTCN | A1IE
        interrupt_enable: (0x0E, 0x05),
    }),
    temperature: Some(Temperature {
        msb: 0x11,
        lsb: 0x12,
        // CONV
        conversion: Switch {
            register: 0x0E,
            mask: 0x20,
            active_low: false,
        },
    }),
    square_wave: SquareWave {
        // INTCN selects the interrupt output when set
        enable: Switch {
            register: 0x0E,
            mask: 0x04,
            active_low: true,
        },
        rate_mask: 0x18,
        rates: [Some(0x00), Some(0x08), Some(0x10), Some(0x18), None],
    },
    // EN32kHz
    output_32khz: Some(Switch {
        register: 0x0F,
        mask: 0x08,
        active_low: false,
    }),
};

impl Variant {
    pub(crate) fn registers(self) -> &'static RegisterMap {
        match self {
            Variant::Ds1307 => &DS1307,
            Variant::Ds3231 => &DS3231,
        }
    }
}
