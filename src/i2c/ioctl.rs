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

use std::io;
use std::result;

use libc::{c_int, c_ulong, ioctl};

pub type Result<T> = result::Result<T, io::Error>;

fn parse_retval(retval: c_int) -> Result<i32> {
    if retval == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(retval)
    }
}

// Based on i2c.h, i2c-dev.h and the documentation at https://www.kernel.org/doc/Documentation/i2c
// and http://smbus.org/specs/SMBus_3_1_20180319.pdf

// Capabilities returned by REQ_FUNCS
const FUNC_SMBUS_PEC: c_ulong = 0x08;
const FUNC_SMBUS_READ_BYTE_DATA: c_ulong = 0x08_0000;
const FUNC_SMBUS_WRITE_BYTE_DATA: c_ulong = 0x10_0000;
const FUNC_SMBUS_READ_I2C_BLOCK: c_ulong = 0x0400_0000;
const FUNC_SMBUS_WRITE_I2C_BLOCK: c_ulong = 0x0800_0000;

/// Lists the SMBus protocols supported by the underlying drivers.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Capabilities {
    funcs: c_ulong,
}

impl Capabilities {
    fn new(funcs: c_ulong) -> Capabilities {
        Capabilities { funcs }
    }

    /// Indicates whether single registers can be read.
    pub fn smbus_read_byte(&self) -> bool {
        (self.funcs & FUNC_SMBUS_READ_BYTE_DATA) > 0
    }

    /// Indicates whether single registers can be written.
    pub fn smbus_write_byte(&self) -> bool {
        (self.funcs & FUNC_SMBUS_WRITE_BYTE_DATA) > 0
    }

    /// Indicates whether consecutive registers can be read in a single transaction.
    pub fn i2c_block_read(&self) -> bool {
        (self.funcs & FUNC_SMBUS_READ_I2C_BLOCK) > 0
    }

    /// Indicates whether consecutive registers can be written in a single transaction.
    pub fn i2c_block_write(&self) -> bool {
        (self.funcs & FUNC_SMBUS_WRITE_I2C_BLOCK) > 0
    }

    /// Indicates whether Packet Error Checking is supported.
    pub fn smbus_pec(&self) -> bool {
        (self.funcs & FUNC_SMBUS_PEC) > 0
    }
}

// ioctl() requests supported by i2cdev
const REQ_TIMEOUT: c_ulong = 0x0702; // Timeout in 10ms units
const REQ_SLAVE: c_ulong = 0x0706; // Set slave address
const REQ_FUNCS: c_ulong = 0x0705; // Read I2C bus capabilities
const REQ_PEC: c_ulong = 0x0708; // SMBus: Use Packet Error Checking
const REQ_SMBUS: c_ulong = 0x0720; // SMBus: Transfer

pub const BLOCK_MAX: usize = 32; // Maximum bytes per block transfer

// SMBus read or write request
#[derive(Debug, PartialEq, Copy, Clone)]
enum SmbusReadWrite {
    Read = 1,
    Write = 0,
}

// Size/Type identifiers for the data contained in SmbusBuffer
#[derive(Debug, PartialEq, Copy, Clone)]
enum SmbusSize {
    ByteData = 2,
    I2cBlockData = 8,
}

// Holds data transferred by REQ_SMBUS requests. Data can either consist of a
// single byte, or a block, where the first byte contains the length,
// followed by up to 32 bytes of data, with the final byte used as padding.
#[derive(Copy, Clone)]
#[repr(C)]
struct SmbusBuffer {
    data: [u8; BLOCK_MAX + 2],
}

impl SmbusBuffer {
    fn new() -> SmbusBuffer {
        SmbusBuffer {
            data: [0u8; BLOCK_MAX + 2],
        }
    }

    fn with_byte(value: u8) -> SmbusBuffer {
        let mut buffer = SmbusBuffer::new();
        buffer.data[0] = value;

        buffer
    }

    fn with_block_len(len: usize) -> SmbusBuffer {
        let mut buffer = SmbusBuffer::new();
        buffer.data[0] = len.min(BLOCK_MAX) as u8;

        buffer
    }

    fn with_block(bytes: &[u8]) -> SmbusBuffer {
        let len = bytes.len().min(BLOCK_MAX);
        let mut buffer = SmbusBuffer::with_block_len(len);
        buffer.data[1..=len].copy_from_slice(&bytes[..len]);

        buffer
    }
}

// Specifies SMBus request parameters
#[repr(C)]
struct SmbusRequest<'a> {
    read_write: u8,
    command: u8,
    size: u32,
    data: &'a mut SmbusBuffer,
}

fn smbus_request(
    fd: c_int,
    read_write: SmbusReadWrite,
    command: u8,
    size: SmbusSize,
    data: &mut SmbusBuffer,
) -> Result<i32> {
    let mut request = SmbusRequest {
        read_write: read_write as u8,
        command,
        size: size as u32,
        data,
    };

    parse_retval(unsafe { ioctl(fd, REQ_SMBUS, &mut request) })
}

pub fn smbus_read_byte(fd: c_int, command: u8) -> Result<u8> {
    let mut buffer = SmbusBuffer::new();
    smbus_request(
        fd,
        SmbusReadWrite::Read,
        command,
        SmbusSize::ByteData,
        &mut buffer,
    )?;

    Ok(buffer.data[0])
}

pub fn smbus_write_byte(fd: c_int, command: u8, value: u8) -> Result<i32> {
    let mut buffer = SmbusBuffer::with_byte(value);
    smbus_request(
        fd,
        SmbusReadWrite::Write,
        command,
        SmbusSize::ByteData,
        &mut buffer,
    )
}

pub fn i2c_block_read(fd: c_int, command: u8, value: &mut [u8]) -> Result<()> {
    // The requested length is passed through the first byte of the buffer
    let mut buffer = SmbusBuffer::with_block_len(value.len());
    smbus_request(
        fd,
        SmbusReadWrite::Read,
        command,
        SmbusSize::I2cBlockData,
        &mut buffer,
    )?;

    copy_block(&buffer, value)
}

// Copies the data returned by an I2C block read into value. A short read
// leaves part of value unfilled, and is reported as an error.
fn copy_block(buffer: &SmbusBuffer, value: &mut [u8]) -> Result<()> {
    let received = (buffer.data[0] as usize).min(BLOCK_MAX);
    if received < value.len() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Block read returned {} of {} bytes", received, value.len()),
        ));
    }

    value.copy_from_slice(&buffer.data[1..=value.len()]);

    Ok(())
}

pub fn i2c_block_write(fd: c_int, command: u8, value: &[u8]) -> Result<i32> {
    let mut buffer = SmbusBuffer::with_block(value);
    smbus_request(
        fd,
        SmbusReadWrite::Write,
        command,
        SmbusSize::I2cBlockData,
        &mut buffer,
    )
}

// All ioctl commands take an unsigned long parameter, except for
// REQ_FUNCS and REQ_SMBUS

pub fn set_slave_address(fd: c_int, value: c_ulong) -> Result<i32> {
    parse_retval(unsafe { ioctl(fd, REQ_SLAVE, value) })
}

pub fn set_timeout(fd: c_int, value: c_ulong) -> Result<i32> {
    // Timeout is specified in units of 10ms
    let timeout: c_ulong = if value > 0 && value < 10 {
        1
    } else {
        value / 10
    };

    parse_retval(unsafe { ioctl(fd, REQ_TIMEOUT, timeout) })
}

pub fn set_pec(fd: c_int, value: c_ulong) -> Result<i32> {
    parse_retval(unsafe { ioctl(fd, REQ_PEC, value) })
}

pub fn funcs(fd: c_int) -> Result<Capabilities> {
    let mut funcs: c_ulong = 0;

    parse_retval(unsafe { ioctl(fd, REQ_FUNCS, &mut funcs) })?;

    Ok(Capabilities::new(funcs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_flags() {
        let funcs = Capabilities::new(FUNC_SMBUS_READ_BYTE_DATA | FUNC_SMBUS_READ_I2C_BLOCK);

        assert!(funcs.smbus_read_byte());
        assert!(!funcs.smbus_write_byte());
        assert!(funcs.i2c_block_read());
        assert!(!funcs.i2c_block_write());
        assert!(!funcs.smbus_pec());
    }

    #[test]
    fn block_buffer_is_length_prefixed() {
        let buffer = SmbusBuffer::with_block(&[0x10, 0x20, 0x30]);
        assert_eq!(&buffer.data[..5], &[3, 0x10, 0x20, 0x30, 0]);

        let buffer = SmbusBuffer::with_block(&[0xAA; 40]);
        assert_eq!(buffer.data[0] as usize, BLOCK_MAX);
        assert_eq!(buffer.data[BLOCK_MAX + 1], 0);
    }

    #[test]
    fn block_read_copies_received_bytes() {
        let buffer = SmbusBuffer::with_block(&[0x30, 0x15, 0x08]);
        let mut value = [0u8; 3];

        copy_block(&buffer, &mut value).unwrap();
        assert_eq!(value, [0x30, 0x15, 0x08]);
    }

    #[test]
    fn short_block_read_is_an_error() {
        let buffer = SmbusBuffer::with_block(&[0x30, 0x15]);
        let mut value = [0xAAu8; 3];

        let err = copy_block(&buffer, &mut value).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
