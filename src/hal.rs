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

//! `Bus` implementations for `embedded-hal` I2C peripherals.
//!
//! [`I2cDevice`] binds an `embedded-hal` v1.0.0 [`i2c::I2c`] implementation
//! and a slave address, so any platform with an `embedded-hal` I2C driver
//! can talk to the clock. [`I2cDevice0`] does the same for `embedded-hal`
//! v0.2.7's [`blocking::i2c::Write`] and [`blocking::i2c::WriteRead`].
//!
//! `I2cDevice` is only included when the `embedded-hal` feature flag is
//! enabled (default). `I2cDevice0` requires the `embedded-hal-0` feature flag.
//!
//! [`I2cDevice`]: struct.I2cDevice.html
//! [`I2cDevice0`]: struct.I2cDevice0.html
//! [`i2c::I2c`]: https://docs.rs/embedded-hal/1/embedded_hal/i2c/trait.I2c.html
//! [`blocking::i2c::Write`]: https://docs.rs/embedded-hal/0.2/embedded_hal/blocking/i2c/trait.Write.html
//! [`blocking::i2c::WriteRead`]: https://docs.rs/embedded-hal/0.2/embedded_hal/blocking/i2c/trait.WriteRead.html

#[cfg(feature = "embedded-hal-0")]
use std::fmt;

use crate::bus::Bus;

/// Register access through an `embedded-hal` v1.0.0 I2C peripheral.
#[cfg(feature = "embedded-hal")]
#[derive(Debug)]
pub struct I2cDevice<I2C> {
    i2c: I2C,
    address: u8,
}

#[cfg(feature = "embedded-hal")]
impl<I2C> I2cDevice<I2C> {
    /// Constructs a new `I2cDevice` targeting the 7-bit `address`.
    ///
    /// Both the DS1307 and the DS3231 use [`DEFAULT_ADDRESS`].
    ///
    /// [`DEFAULT_ADDRESS`]: ../rtc/constant.DEFAULT_ADDRESS.html
    pub fn new(i2c: I2C, address: u8) -> I2cDevice<I2C> {
        I2cDevice { i2c, address }
    }

    /// Returns the slave address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Consumes the `I2cDevice`, and returns the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// `Bus` trait implementation for `embedded-hal` v1.0.0.
#[cfg(feature = "embedded-hal")]
impl<I2C: embedded_hal::i2c::I2c> Bus for I2cDevice<I2C> {
    type Error = I2C::Error;

    fn read_byte(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut buffer = [0u8];
        self.i2c.write_read(self.address, &[register], &mut buffer)?;

        Ok(buffer[0])
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_block(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[register], buffer)
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        let mut frame = Vec::with_capacity(bytes.len() + 1);
        frame.push(register);
        frame.extend_from_slice(bytes);

        self.i2c.write(self.address, &frame)
    }
}

/// Register access through an `embedded-hal` v0.2.7 I2C peripheral.
#[cfg(feature = "embedded-hal-0")]
#[derive(Debug)]
pub struct I2cDevice0<I2C> {
    i2c: I2C,
    address: u8,
}

#[cfg(feature = "embedded-hal-0")]
impl<I2C> I2cDevice0<I2C> {
    /// Constructs a new `I2cDevice0` targeting the 7-bit `address`.
    pub fn new(i2c: I2C, address: u8) -> I2cDevice0<I2C> {
        I2cDevice0 { i2c, address }
    }

    /// Consumes the `I2cDevice0`, and returns the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// `Bus` trait implementation for `embedded-hal` v0.2.7.
#[cfg(feature = "embedded-hal-0")]
impl<I2C, E> Bus for I2cDevice0<I2C>
where
    I2C: embedded_hal_0::blocking::i2c::Write<Error = E>
        + embedded_hal_0::blocking::i2c::WriteRead<Error = E>,
    E: fmt::Debug,
{
    type Error = E;

    fn read_byte(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut buffer = [0u8];
        self.i2c.write_read(self.address, &[register], &mut buffer)?;

        Ok(buffer[0])
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_block(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[register], buffer)
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        let mut frame = Vec::with_capacity(bytes.len() + 1);
        frame.push(register);
        frame.extend_from_slice(bytes);

        self.i2c.write(self.address, &frame)
    }
}


#[cfg(all(test, feature = "embedded-hal-0"))]
mod tests_0 {
    use embedded_hal_mock::eh0::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    use super::*;
    use crate::rtc::{Rtc, Variant, DEFAULT_ADDRESS};

    #[test]
    fn reads_temperature() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEFAULT_ADDRESS, vec![0x11], vec![0x19]),
            I2cTrans::write_read(DEFAULT_ADDRESS, vec![0x12], vec![0x40]),
        ]);
        let mut rtc = Rtc::new(I2cDevice0::new(mock, DEFAULT_ADDRESS));
        rtc.set_variant(Variant::Ds3231);

        assert_eq!(rtc.temperature().unwrap(), (25, 25));
        rtc.release().release().done();
    }
}
