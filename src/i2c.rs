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

//! Linux `i2cdev` bus for clock chips.
//!
//! [`I2c`] opens one of the `/dev/i2c-N` character devices, targets the
//! clock's slave address, and implements [`Bus`] on top of the SMBus
//! Read/Write Byte Data and I2C Block Read/Write ioctl requests.
//!
//! ## Enabling I2C
//!
//! On a Raspberry Pi, the I2C bus connected to physical pins 3 (SDA) and
//! 5 (SCL) is bus 1, and is disabled by default. You can enable it through
//! `sudo raspi-config`, or by manually adding `dtparam=i2c_arm=on` to
//! `/boot/config.txt`. Remember to reboot afterwards.
//!
//! The DS1307 supports I2C clock speeds up to 100 kHz (Standard-mode). The
//! DS3231 also supports 400 kHz (Fast-mode).
//!
//! ## Troubleshooting
//!
//! ### Permission denied
//!
//! If [`new`] or [`with_bus`] returns an `io::ErrorKind::PermissionDenied`
//! error, make sure the file permissions for `/dev/i2c-1` are correct, and
//! the current user is a member of the `i2c` group.
//!
//! ### Timed out
//!
//! Transactions return an `io::ErrorKind::TimedOut` error when their duration
//! exceeds the timeout value. You can change the timeout using [`set_timeout`].
//!
//! [`I2c`]: struct.I2c.html
//! [`Bus`]: ../bus/trait.Bus.html
//! [`new`]: struct.I2c.html#method.new
//! [`with_bus`]: struct.I2c.html#method.with_bus
//! [`set_timeout`]: struct.I2c.html#method.set_timeout

use std::error;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::marker::PhantomData;
use std::os::unix::io::AsRawFd;
use std::result;

use libc::c_ulong;

use crate::bus::Bus;
use crate::rtc::DEFAULT_ADDRESS;

mod ioctl;

pub use self::ioctl::Capabilities;

/// Errors that can occur when accessing the I2C bus.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(io::Error),
    /// Invalid slave address.
    ///
    /// Only 7-bit addresses are supported. Several 7-bit addresses
    /// are reserved, and can't be used as slave addresses. A list of
    /// those reserved addresses can be found [here].
    ///
    /// [here]: https://en.wikipedia.org/wiki/I%C2%B2C#Reserved_addresses_in_7-bit_address_space
    InvalidSlaveAddress(u16),
    /// I2C/SMBus feature not supported.
    ///
    /// The underlying drivers don't support the SMBus protocols needed to
    /// access the clock.
    FeatureNotSupported,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Io(ref err) => write!(f, "I/O error: {}", err),
            Error::InvalidSlaveAddress(address) => write!(f, "Invalid slave address: {}", address),
            Error::FeatureNotSupported => write!(f, "I2C/SMBus feature not supported"),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

/// Result type returned from methods that can have `i2c::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// Provides access to a clock chip through the Linux `i2cdev` interface.
///
/// `I2c` targets a single slave device, [`DEFAULT_ADDRESS`] unless changed
/// with [`set_slave_address`].
///
/// [`DEFAULT_ADDRESS`]: ../rtc/constant.DEFAULT_ADDRESS.html
/// [`set_slave_address`]: #method.set_slave_address
#[derive(Debug)]
pub struct I2c {
    bus: u8,
    funcs: Capabilities,
    i2cdev: File,
    address: u16,
    // The not_sync field is a workaround to force !Sync. I2c isn't safe for
    // Sync because of ioctl() and the underlying drivers. This avoids needing
    // #![feature(optin_builtin_traits)] to manually add impl !Sync for I2c.
    not_sync: PhantomData<*const ()>,
}

impl I2c {
    /// Constructs a new `I2c` on bus 1, targeting [`DEFAULT_ADDRESS`].
    ///
    /// [`DEFAULT_ADDRESS`]: ../rtc/constant.DEFAULT_ADDRESS.html
    pub fn new() -> Result<I2c> {
        I2c::with_bus(1)
    }

    /// Constructs a new `I2c` using the specified bus, targeting
    /// [`DEFAULT_ADDRESS`].
    ///
    /// [`DEFAULT_ADDRESS`]: ../rtc/constant.DEFAULT_ADDRESS.html
    pub fn with_bus(bus: u8) -> Result<I2c> {
        // bus is a u8, because any 8-bit bus ID could potentially
        // be configured for bit banging I2C using i2c-gpio.
        let i2cdev = OpenOptions::new()
            .read(true)
            .write(true)
            .open(format!("/dev/i2c-{}", bus))?;

        let capabilities = ioctl::funcs(i2cdev.as_raw_fd())?;

        if !capabilities.smbus_read_byte() || !capabilities.smbus_write_byte() {
            return Err(Error::FeatureNotSupported);
        }

        // Disable PEC if it's supported
        if capabilities.smbus_pec() {
            ioctl::set_pec(i2cdev.as_raw_fd(), 0)?;
        }

        let mut i2c = I2c {
            bus,
            funcs: capabilities,
            i2cdev,
            address: 0,
            not_sync: PhantomData,
        };

        i2c.set_slave_address(u16::from(DEFAULT_ADDRESS))?;

        Ok(i2c)
    }

    /// Returns information on the functionality supported by the underlying drivers.
    pub fn capabilities(&self) -> Capabilities {
        self.funcs
    }

    /// Returns the I2C bus ID.
    pub fn bus(&self) -> u8 {
        self.bus
    }

    /// Returns the current slave address.
    pub fn slave_address(&self) -> u16 {
        self.address
    }

    /// Sets a 7-bit slave address.
    ///
    /// `slave_address` refers to the slave device you're communicating with.
    /// The specified address shouldn't include the R/W bit.
    pub fn set_slave_address(&mut self, slave_address: u16) -> Result<()> {
        // Filter out reserved, invalid and unsupported addresses
        if slave_address < 8 || (slave_address >> 3) == 0b1111 || slave_address > 0x7F {
            return Err(Error::InvalidSlaveAddress(slave_address));
        }

        ioctl::set_slave_address(self.i2cdev.as_raw_fd(), c_ulong::from(slave_address))?;

        self.address = slave_address;

        Ok(())
    }

    /// Sets the maximum duration of a transaction in milliseconds (ms).
    ///
    /// Transactions that take longer than `timeout` return an
    /// `io::ErrorKind::TimedOut` error.
    ///
    /// `timeout` has a resolution of 10ms.
    pub fn set_timeout(&self, timeout: u32) -> Result<()> {
        // Contrary to the i2cdev documentation, this seems to
        // be used as a timeout for (part of?) the I2C transaction.
        ioctl::set_timeout(self.i2cdev.as_raw_fd(), timeout as c_ulong)?;

        Ok(())
    }

    /// Sends an 8-bit `command`, and receives an 8-bit value.
    ///
    /// Sequence: START → Address + Write Bit → Command → Repeated START
    /// → Address + Read Bit → Incoming Byte → STOP
    pub fn smbus_read_byte(&self, command: u8) -> Result<u8> {
        Ok(ioctl::smbus_read_byte(self.i2cdev.as_raw_fd(), command)?)
    }

    /// Sends an 8-bit `command` and an 8-bit `value`.
    ///
    /// Sequence: START → Address + Write Bit → Command → Outgoing Byte → STOP
    pub fn smbus_write_byte(&self, command: u8, value: u8) -> Result<()> {
        ioctl::smbus_write_byte(self.i2cdev.as_raw_fd(), command, value)?;

        Ok(())
    }

    /// Sends an 8-bit `command`, and then fills a multi-byte `buffer` with
    /// incoming data.
    ///
    /// `block_read` can read a maximum of 32 bytes.
    ///
    /// Sequence: START → Address + Write Bit → Command → Repeated START
    /// → Address + Read Bit → Incoming Bytes → STOP
    pub fn block_read(&self, command: u8, buffer: &mut [u8]) -> Result<()> {
        if !self.funcs.i2c_block_read() {
            return Err(Error::FeatureNotSupported);
        }

        ioctl::i2c_block_read(self.i2cdev.as_raw_fd(), command, buffer)?;

        Ok(())
    }

    /// Sends an 8-bit `command` followed by a multi-byte `buffer`.
    ///
    /// `block_write` can write a maximum of 32 bytes. Any additional data contained
    /// in `buffer` is ignored.
    ///
    /// Sequence: START → Address + Write Bit → Command → Outgoing Bytes → STOP
    pub fn block_write(&self, command: u8, buffer: &[u8]) -> Result<()> {
        if !self.funcs.i2c_block_write() {
            return Err(Error::FeatureNotSupported);
        }

        ioctl::i2c_block_write(self.i2cdev.as_raw_fd(), command, buffer)?;

        Ok(())
    }
}

// Send is safe for I2c, but we're marked !Send because of the dummy pointer that's
// needed to force !Sync.
unsafe impl Send for I2c {}

/// `Bus` trait implementation.
///
/// Block transfers are split into chunks of up to 32 bytes. If the
/// underlying drivers don't support I2C block transfers, each register is
/// accessed separately.
impl Bus for I2c {
    type Error = Error;

    fn read_byte(&mut self, register: u8) -> Result<u8> {
        self.smbus_read_byte(register)
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<()> {
        self.smbus_write_byte(register, value)
    }

    fn read_block(&mut self, register: u8, buffer: &mut [u8]) -> Result<()> {
        if !self.funcs.i2c_block_read() {
            for (offset, byte) in buffer.iter_mut().enumerate() {
                *byte = self.smbus_read_byte(register.wrapping_add(offset as u8))?;
            }

            return Ok(());
        }

        for (index, chunk) in buffer.chunks_mut(ioctl::BLOCK_MAX).enumerate() {
            let offset = (index * ioctl::BLOCK_MAX) as u8;
            self.block_read(register.wrapping_add(offset), chunk)?;
        }

        Ok(())
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<()> {
        if !self.funcs.i2c_block_write() {
            for (offset, byte) in bytes.iter().enumerate() {
                self.smbus_write_byte(register.wrapping_add(offset as u8), *byte)?;
            }

            return Ok(());
        }

        for (index, chunk) in bytes.chunks(ioctl::BLOCK_MAX).enumerate() {
            let offset = (index * ioctl::BLOCK_MAX) as u8;
            self.block_write(register.wrapping_add(offset), chunk)?;
        }

        Ok(())
    }
}
