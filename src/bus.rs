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

//! Register access to a clock chip.
//!
//! [`Rtc`] talks to the clock through the [`Bus`] trait, which only needs to
//! know how to read and write the chip's 8-bit registers. DSRTC includes
//! implementations for the Linux `i2cdev` interface ([`I2c`]), and for any
//! `embedded-hal` I2C peripheral ([`I2cDevice`]).
//!
//! [`Rtc`]: ../rtc/struct.Rtc.html
//! [`Bus`]: trait.Bus.html
//! [`I2c`]: ../i2c/struct.I2c.html
//! [`I2cDevice`]: ../hal/struct.I2cDevice.html

use std::fmt;

/// Byte-addressable register access.
///
/// Implementations are expected to target a single slave device. Clock
/// generation, acknowledgment handling and arbitration are the
/// implementation's responsibility. Any failure should be reported as an
/// error, rather than silently ignored.
pub trait Bus {
    /// Error type returned by failed transactions.
    type Error: fmt::Debug;

    /// Reads the value of `register`.
    ///
    /// Sequence: START → Address + Write Bit → Register → Repeated START
    /// → Address + Read Bit → Incoming Byte → STOP
    fn read_byte(&mut self, register: u8) -> Result<u8, Self::Error>;

    /// Writes `value` to `register`.
    ///
    /// Sequence: START → Address + Write Bit → Register → Outgoing Byte → STOP
    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Fills `buffer` with the values of consecutive registers, starting at
    /// `register`.
    ///
    /// The default implementation calls [`read_byte`] for each register.
    /// Implementations that support auto-incrementing block transfers should
    /// override it, so multi-byte values are read atomically.
    ///
    /// [`read_byte`]: #tymethod.read_byte
    fn read_block(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        for (offset, byte) in buffer.iter_mut().enumerate() {
            *byte = self.read_byte(register.wrapping_add(offset as u8))?;
        }

        Ok(())
    }

    /// Writes `bytes` to consecutive registers, starting at `register`.
    ///
    /// The default implementation calls [`write_byte`] for each register.
    ///
    /// [`write_byte`]: #tymethod.write_byte
    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        for (offset, byte) in bytes.iter().enumerate() {
            self.write_byte(register.wrapping_add(offset as u8), *byte)?;
        }

        Ok(())
    }
}

impl<B: Bus + ?Sized> Bus for &mut B {
    type Error = B::Error;

    fn read_byte(&mut self, register: u8) -> Result<u8, Self::Error> {
        B::read_byte(self, register)
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        B::write_byte(self, register, value)
    }

    fn read_block(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        B::read_block(self, register, buffer)
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        B::write_block(self, register, bytes)
    }
}
