// Register-level model of the DS1307 and DS3231, used to exercise the driver
// without hardware.

#![allow(dead_code)]

use dsrtc::bus::Bus;
use dsrtc::rtc::Variant;

pub const DS1307_CONTROL: u8 = 0x07;
pub const DS3231_CONTROL: u8 = 0x0E;
pub const DS3231_STATUS: u8 = 0x0F;

// DS1307 control register bits that can be written: OUT, SQWE, RS1 and RS0
const DS1307_CONTROL_MASK: u8 = 0x93;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Nack;

#[derive(Debug)]
pub struct SimulatedChip {
    pub variant: Variant,
    pub regs: [u8; 64],
    pub writes: Vec<(u8, u8)>,
    pub offline: bool,
    // Number of control register reads before a temperature conversion
    // finishes. None never finishes.
    pub conversion_reads: Option<u32>,
    remaining: Option<u32>,
}

impl SimulatedChip {
    fn with_variant(variant: Variant) -> SimulatedChip {
        let mut regs = [0u8; 64];
        // 2000-01-01 00:00:00, Saturday
        regs[..7].copy_from_slice(&[0x00, 0x00, 0x00, 0x07, 0x01, 0x01, 0x00]);

        SimulatedChip {
            variant,
            regs,
            writes: Vec::new(),
            offline: false,
            conversion_reads: Some(2),
            remaining: None,
        }
    }

    pub fn ds1307() -> SimulatedChip {
        let mut chip = SimulatedChip::with_variant(Variant::Ds1307);
        chip.regs[DS1307_CONTROL as usize] = 0x03;

        chip
    }

    pub fn ds3231() -> SimulatedChip {
        let mut chip = SimulatedChip::with_variant(Variant::Ds3231);
        // Power-on defaults: INTCN, RS2 and RS1 set; OSF and EN32kHz set
        chip.regs[DS3231_CONTROL as usize] = 0x1C;
        chip.regs[DS3231_STATUS as usize] = 0x88;
        // 25.25 °C
        chip.regs[0x11] = 0x19;
        chip.regs[0x12] = 0x40;

        chip
    }

    pub fn reg(&self, register: u8) -> u8 {
        self.regs[register as usize]
    }

    fn store(&mut self, register: u8, value: u8) {
        let old = self.regs[register as usize];

        let new = match (self.variant, register) {
            (Variant::Ds1307, DS1307_CONTROL) => value & DS1307_CONTROL_MASK,
            // Temperature registers are read-only
            (Variant::Ds3231, 0x11) | (Variant::Ds3231, 0x12) => old,
            // BSY is read-only, alarm flags can only be cleared
            (Variant::Ds3231, DS3231_STATUS) => {
                (value & 0x88) | (value & old & 0x03) | (old & 0x04)
            }
            (Variant::Ds3231, DS3231_CONTROL) => {
                if value & 0x20 != 0 && old & 0x20 == 0 {
                    self.remaining = self.conversion_reads;
                }

                value
            }
            _ => value,
        };

        self.regs[register as usize] = new;
    }

    fn load(&mut self, register: u8) -> u8 {
        if self.variant == Variant::Ds3231
            && register == DS3231_CONTROL
            && self.regs[register as usize] & 0x20 != 0
        {
            match self.remaining {
                Some(0) => self.regs[register as usize] &= !0x20,
                Some(reads) => self.remaining = Some(reads - 1),
                None => (),
            }
        }

        self.regs[register as usize]
    }
}

impl Bus for SimulatedChip {
    type Error = Nack;

    fn read_byte(&mut self, register: u8) -> Result<u8, Nack> {
        if self.offline {
            return Err(Nack);
        }

        Ok(self.load(register % 64))
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Nack> {
        if self.offline {
            return Err(Nack);
        }

        self.writes.push((register, value));
        self.store(register % 64, value);

        Ok(())
    }
}

// Passes transactions through to a SimulatedChip, except for the ones listed
// in failing, counted from 0.
pub struct FlakyBus<'a> {
    chip: &'a mut SimulatedChip,
    failing: Vec<usize>,
    transactions: usize,
}

impl<'a> FlakyBus<'a> {
    pub fn new(chip: &'a mut SimulatedChip, failing: &[usize]) -> FlakyBus<'a> {
        FlakyBus {
            chip,
            failing: failing.to_vec(),
            transactions: 0,
        }
    }

    fn next_fails(&mut self) -> bool {
        let index = self.transactions;
        self.transactions += 1;

        self.failing.contains(&index)
    }
}

impl Bus for FlakyBus<'_> {
    type Error = Nack;

    fn read_byte(&mut self, register: u8) -> Result<u8, Nack> {
        if self.next_fails() {
            return Err(Nack);
        }

        self.chip.read_byte(register)
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Nack> {
        if self.next_fails() {
            return Err(Nack);
        }

        self.chip.write_byte(register, value)
    }
}
