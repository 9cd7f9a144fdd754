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

//! Driver for the DS1307 and DS3231 real-time clocks.
//!
//! Both chips respond to the same slave address, and share the layout of
//! their time-keeping registers. [`Rtc::initialize`] probes the attached chip
//! to find out which of the two it's talking to, after which every operation
//! uses the register map that belongs to that chip.
//!
//! ## Chip features
//!
//! | Feature                   | DS1307 | DS3231 |
//! |---------------------------|--------|--------|
//! | Time and date             | yes    | yes    |
//! | Clock halt (`run_clock`)  | yes    | no     |
//! | Battery-backed SRAM       | 56 B   | no     |
//! | Alarm                     | no     | yes    |
//! | Temperature sensor        | no     | yes    |
//! | Square-wave output        | yes    | yes    |
//! | 32 kHz output             | no     | yes    |
//!
//! Calling a method for a feature the detected chip doesn't offer returns
//! `Err(`[`Error::UnsupportedOperation`]`)`.
//!
//! ## Thread safety
//!
//! `Rtc` doesn't perform any internal synchronization. If you need to
//! access the clock from multiple threads, wrap it in a `Mutex`.
//!
//! [`Rtc::initialize`]: struct.Rtc.html#method.initialize
//! [`Error::UnsupportedOperation`]: enum.Error.html#variant.UnsupportedOperation

use std::error;
use std::fmt;
use std::result;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::bcd::{checked_bcd_to_dec, dec_to_bcd};
use crate::bus::Bus;
use crate::datetime::{Field, WallClockTime};

mod registers;

use self::registers::*;

/// Default 7-bit slave address shared by the DS1307 and DS3231.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Size of the DS1307's battery-backed SRAM in bytes.
pub const SRAM_SIZE: usize = 56;

const DEFAULT_CONVERSION_POLLS: u32 = 128;
const CONVERSION_POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Supported clock chips.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Variant {
    /// Maxim DS1307 and compatibles.
    Ds1307,
    /// Maxim DS3231 and compatibles.
    Ds3231,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Variant::Ds1307 => write!(f, "DS1307"),
            Variant::Ds3231 => write!(f, "DS3231"),
        }
    }
}

/// Square-wave output frequencies.
///
/// The DS1307 doesn't support `Hz1024`, and the DS3231 doesn't support
/// `Hz32768` on its square-wave pin. Use
/// [`enable_32khz_output`] for the DS3231's dedicated 32 kHz pin instead.
///
/// [`enable_32khz_output`]: struct.Rtc.html#method.enable_32khz_output
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SquareWaveFrequency {
    /// 1 Hz.
    Hz1 = 0,
    /// 1.024 kHz (DS3231 only).
    Hz1024 = 1,
    /// 4.096 kHz.
    Hz4096 = 2,
    /// 8.192 kHz.
    Hz8192 = 3,
    /// 32.768 kHz (DS1307 only).
    Hz32768 = 4,
}

/// Errors that can occur when accessing the clock.
///
/// `E` is the error type of the underlying [`Bus`].
///
/// [`Bus`]: ../bus/trait.Bus.html
#[derive(Debug)]
pub enum Error<E> {
    /// Bus transaction failed.
    Bus(E),
    /// No clock chip responded while probing the bus.
    DeviceNotFound,
    /// The driver hasn't been initialized.
    ///
    /// Call [`initialize`] or [`set_variant`] first.
    ///
    /// [`initialize`]: struct.Rtc.html#method.initialize
    /// [`set_variant`]: struct.Rtc.html#method.set_variant
    NotInitialized,
    /// A value read from the device is out of range.
    ///
    /// This usually indicates a glitch on the bus, or a clock that was
    /// never set after losing power.
    CorruptData(Field),
    /// A caller-supplied value is out of range.
    InvalidField(Field),
    /// The detected chip doesn't offer the requested feature.
    UnsupportedOperation(Variant),
    /// The temperature conversion didn't finish in time.
    Timeout,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Bus(ref err) => write!(f, "Bus error: {:?}", err),
            Error::DeviceNotFound => write!(f, "No clock chip found"),
            Error::NotInitialized => write!(f, "Driver not initialized"),
            Error::CorruptData(field) => write!(f, "Corrupt {} value read from device", field),
            Error::InvalidField(field) => write!(f, "Invalid {} value", field),
            Error::UnsupportedOperation(variant) => {
                write!(f, "Operation not supported by {}", variant)
            }
            Error::Timeout => write!(f, "Timed out waiting for temperature conversion"),
        }
    }
}

impl<E: fmt::Debug> error::Error for Error<E> {}

/// Result type returned from methods that can have `rtc::Error`s.
pub type Result<T, E> = result::Result<T, Error<E>>;

/// Provides access to a DS1307 or DS3231 real-time clock.
///
/// `Rtc` takes ownership of a [`Bus`] that's already configured to
/// talk to the clock's slave address. Call [`initialize`] before using any
/// of the other methods.
///
/// The time retrieved by the last call to [`time`] is cached, and can be
/// retrieved without bus access through [`last_time`].
///
/// [`Bus`]: ../bus/trait.Bus.html
/// [`initialize`]: #method.initialize
/// [`time`]: #method.time
/// [`last_time`]: #method.last_time
#[derive(Debug)]
pub struct Rtc<B> {
    bus: B,
    variant: Option<Variant>,
    last_time: Option<WallClockTime>,
    conversion_polls: u32,
}

impl<B: Bus> Rtc<B> {
    /// Constructs a new `Rtc`.
    ///
    /// `new` doesn't communicate with the device. Call [`initialize`] to
    /// detect the attached chip.
    ///
    /// [`initialize`]: #method.initialize
    pub fn new(bus: B) -> Rtc<B> {
        Rtc {
            bus,
            variant: None,
            last_time: None,
            conversion_polls: DEFAULT_CONVERSION_POLLS,
        }
    }

    /// Detects which clock chip is attached.
    ///
    /// The DS3231's alarm registers overlap with the DS1307's control
    /// register, which only implements half of its bits. `initialize` writes
    /// a test pattern to that address, and checks whether it reads back
    /// unchanged. The original value is restored afterwards, even if the
    /// test pattern couldn't be read back. The time-keeping registers aren't
    /// touched.
    ///
    /// `initialize` can safely be called more than once. If the device
    /// doesn't respond, `Err(`[`Error::DeviceNotFound`]`)` is returned. If
    /// the device stops responding halfway through detection,
    /// `Err(`[`Error::Bus`]`)` is returned. In both cases the driver is left
    /// uninitialized.
    ///
    /// [`Error::DeviceNotFound`]: enum.Error.html#variant.DeviceNotFound
    /// [`Error::Bus`]: enum.Error.html#variant.Bus
    pub fn initialize(&mut self) -> Result<Variant, B::Error> {
        self.variant = None;

        let saved = self.bus.read_byte(PROBE_REGISTER).map_err(|err| {
            debug!("No response while probing for a clock chip: {:?}", err);
            Error::DeviceNotFound
        })?;

        let probed = self.probe(saved);
        let restored = self.write(PROBE_REGISTER, saved);

        let variant = probed?;
        restored?;

        debug!("Detected {}", variant);
        self.variant = Some(variant);

        Ok(variant)
    }

    fn probe(&mut self, saved: u8) -> Result<Variant, B::Error> {
        self.write(PROBE_REGISTER, PROBE_SENTINEL)?;
        let echo = self.read(PROBE_REGISTER)?;

        trace!(
            "Probe register {:#04x}: saved {:#04x}, echo {:#04x}",
            PROBE_REGISTER,
            saved,
            echo
        );

        if echo == PROBE_SENTINEL {
            Ok(Variant::Ds3231)
        } else {
            Ok(Variant::Ds1307)
        }
    }

    /// Returns the detected clock chip, or `None` if the driver hasn't
    /// been initialized.
    pub fn variant(&self) -> Option<Variant> {
        self.variant
    }

    /// Skips detection, and assumes the specified chip is attached.
    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = Some(variant);
    }

    /// Returns the time retrieved by the last successful call to [`time`].
    ///
    /// [`time`]: #method.time
    pub fn last_time(&self) -> Option<WallClockTime> {
        self.last_time
    }

    /// Sets the maximum number of times [`force_temperature_conversion`]
    /// checks whether a conversion has finished, 2 ms apart.
    ///
    /// By default, `polls` is set to 128.
    ///
    /// [`force_temperature_conversion`]: #method.force_temperature_conversion
    pub fn set_conversion_poll_limit(&mut self, polls: u32) {
        self.conversion_polls = polls;
    }

    /// Consumes the `Rtc`, and returns the underlying bus.
    pub fn release(self) -> B {
        self.bus
    }

    /// Reads the value of an arbitrary register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, B::Error> {
        self.read(register)
    }

    /// Writes `value` to an arbitrary register.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), B::Error> {
        self.write(register, value)
    }

    /// Reads the current date and time.
    ///
    /// Both the 24-hour and the 12-hour fields of the returned value are
    /// filled in, regardless of the mode the clock's hours register is in.
    /// The result is also stored in the cache returned by [`last_time`].
    ///
    /// Returns `Err(`[`Error::CorruptData`]`)` if any of the values read from
    /// the device is out of range.
    ///
    /// [`last_time`]: #method.last_time
    /// [`Error::CorruptData`]: enum.Error.html#variant.CorruptData
    pub fn time(&mut self) -> Result<WallClockTime, B::Error> {
        self.registers()?;

        let mut regs = [0u8; TIME_LEN];
        self.read_block(SECONDS, &mut regs)?;

        let time = decode_time(&regs).map_err(|field| {
            warn!("Corrupt {} in time registers {:02x?}", field, regs);
            Error::CorruptData(field)
        })?;

        self.last_time = Some(time);

        Ok(time)
    }

    /// Reads the current time as a tuple of `(hour, minute, second)`, with
    /// `hour` in 24-hour format.
    ///
    /// Only the three time registers are read. The date isn't validated,
    /// and the cache returned by [`last_time`] isn't updated.
    ///
    /// [`last_time`]: #method.last_time
    pub fn time_hms(&mut self) -> Result<(u8, u8, u8), B::Error> {
        self.registers()?;

        let mut regs = [0u8; HMS_LEN];
        self.read_block(SECONDS, &mut regs)?;

        decode_hms(&regs).map_err(Error::CorruptData)
    }

    /// Sets the date and time.
    ///
    /// The 12-hour fields of `time` are ignored. If you've changed those,
    /// call [`translate_twelve_hour`] first. Every field is validated before
    /// the device is accessed. The clock is switched to 24-hour mode, and
    /// control bits sharing the time-keeping registers are left unchanged.
    ///
    /// [`translate_twelve_hour`]: ../datetime/struct.WallClockTime.html#method.translate_twelve_hour
    pub fn set_time(&mut self, time: &WallClockTime) -> Result<(), B::Error> {
        let map = self.registers()?;
        time.validate().map_err(Error::InvalidField)?;

        let mut regs = [0u8; TIME_LEN];
        self.read_block(SECONDS, &mut regs)?;

        let values = [
            dec_to_bcd(time.second),
            dec_to_bcd(time.minute),
            dec_to_bcd(time.hour),
            dec_to_bcd(time.weekday),
            dec_to_bcd(time.day),
            dec_to_bcd(time.month),
            dec_to_bcd(time.year),
        ];

        for ((reg, value), preserve) in regs
            .iter_mut()
            .zip(values.iter())
            .zip(map.preserve.iter())
        {
            *reg = (*reg & preserve) | value;
        }

        debug!("Setting time to {}", time);

        self.write_block(SECONDS, &regs)
    }

    /// Sets the time, leaving the date unchanged.
    ///
    /// `hour` should be specified in 24-hour format.
    pub fn set_time_hms(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), B::Error> {
        let map = self.registers()?;
        validate_hms(hour, minute, second).map_err(Error::InvalidField)?;

        let mut regs = [0u8; HMS_LEN];
        self.read_block(SECONDS, &mut regs)?;

        regs[IDX_SECONDS] = (regs[IDX_SECONDS] & map.preserve[IDX_SECONDS]) | dec_to_bcd(second);
        regs[IDX_MINUTES] = (regs[IDX_MINUTES] & map.preserve[IDX_MINUTES]) | dec_to_bcd(minute);
        regs[IDX_HOURS] = (regs[IDX_HOURS] & map.preserve[IDX_HOURS]) | dec_to_bcd(hour);

        self.write_block(SECONDS, &regs)
    }

    /// Starts or stops the clock (DS1307 only).
    ///
    /// The seconds value is preserved.
    pub fn run_clock(&mut self, run: bool) -> Result<(), B::Error> {
        let map = self.registers()?;
        let switch = map
            .clock_running
            .ok_or(Error::UnsupportedOperation(map.variant))?;

        self.update_switch(switch, run)
    }

    /// Returns `true` if the clock is running (DS1307 only).
    pub fn is_clock_running(&mut self) -> Result<bool, B::Error> {
        let map = self.registers()?;
        let switch = map
            .clock_running
            .ok_or(Error::UnsupportedOperation(map.variant))?;

        Ok(switch.is_on(self.read(switch.register)?))
    }

    /// Sets the alarm (DS3231 only).
    ///
    /// The alarm triggers once a day, when the hour, minute and second of
    /// `time` match the current time. The date fields are validated, but
    /// otherwise ignored. The alarm interrupt is routed to the INT/SQW pin,
    /// which disables the square-wave output.
    pub fn set_alarm(&mut self, time: &WallClockTime) -> Result<(), B::Error> {
        self.alarm_registers()?;
        time.validate().map_err(Error::InvalidField)?;

        self.set_alarm_hms(time.hour, time.minute, time.second)
    }

    /// Sets the alarm to the specified 24-hour time (DS3231 only).
    pub fn set_alarm_hms(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), B::Error> {
        let alarm = self.alarm_registers()?;
        validate_hms(hour, minute, second).map_err(Error::InvalidField)?;

        // A1M1-A1M3 cleared and A1M4 set: match on hours, minutes and seconds
        let regs = [
            dec_to_bcd(second),
            dec_to_bcd(minute),
            dec_to_bcd(hour),
            ALARM_MATCH_BIT | 0x01,
        ];
        self.write_block(alarm.seconds, &regs)?;

        let (control, enable) = alarm.interrupt_enable;
        let value = self.read(control)?;
        self.write(control, value | enable)?;

        debug!("Alarm set to {:02}:{:02}:{:02}", hour, minute, second);

        Ok(())
    }

    /// Reads the alarm time (DS3231 only).
    ///
    /// Only the time fields are read from the device. The date fields are
    /// set to their defaults.
    pub fn alarm(&mut self) -> Result<WallClockTime, B::Error> {
        let (hour, minute, second) = self.alarm_hms()?;

        let mut time = WallClockTime {
            hour,
            minute,
            second,
            ..WallClockTime::default()
        };
        time.update_twelve_hour();

        Ok(time)
    }

    /// Reads the alarm time as a tuple of `(hour, minute, second)`, with
    /// `hour` in 24-hour format (DS3231 only).
    pub fn alarm_hms(&mut self) -> Result<(u8, u8, u8), B::Error> {
        let alarm = self.alarm_registers()?;

        let mut regs = [0u8; HMS_LEN];
        self.read_block(alarm.seconds, &mut regs)?;
        for reg in regs.iter_mut() {
            *reg &= !ALARM_MATCH_BIT;
        }

        decode_hms(&regs).map_err(Error::CorruptData)
    }

    /// Returns `true` if the alarm has triggered (DS3231 only).
    ///
    /// The alarm flag isn't cleared. Call [`reset_alarm`] to clear it.
    ///
    /// [`reset_alarm`]: #method.reset_alarm
    pub fn check_alarm(&mut self) -> Result<bool, B::Error> {
        let alarm = self.alarm_registers()?;

        Ok(alarm.flag.is_on(self.read(alarm.flag.register)?))
    }

    /// Clears the alarm flag (DS3231 only).
    pub fn reset_alarm(&mut self) -> Result<(), B::Error> {
        let alarm = self.alarm_registers()?;

        self.update_switch(alarm.flag, false)
    }

    /// Reads the temperature (DS3231 only).
    ///
    /// Returns a tuple containing the signed integer part in degrees Celsius,
    /// and the fractional part in hundredths of a degree (0, 25, 50 or 75),
    /// which is added to the integer part. -0.25 °C is returned as `(-1, 75)`.
    ///
    /// The DS3231 converts the temperature every 64 seconds. Call
    /// [`force_temperature_conversion`] for a more recent value.
    ///
    /// [`force_temperature_conversion`]: #method.force_temperature_conversion
    pub fn temperature(&mut self) -> Result<(i8, u8), B::Error> {
        let temperature = self.temperature_registers()?;

        let msb = self.read(temperature.msb)?;
        let lsb = self.read(temperature.lsb)?;

        Ok((msb as i8, (lsb >> 6) * 25))
    }

    /// Starts a temperature conversion (DS3231 only).
    ///
    /// If `block` is `true`, `force_temperature_conversion` waits until the
    /// conversion has finished, checking up to the number of times set with
    /// [`set_conversion_poll_limit`]. If the conversion is still in
    /// progress after that, `Err(`[`Error::Timeout`]`)` is returned.
    ///
    /// [`set_conversion_poll_limit`]: #method.set_conversion_poll_limit
    /// [`Error::Timeout`]: enum.Error.html#variant.Timeout
    pub fn force_temperature_conversion(&mut self, block: bool) -> Result<(), B::Error> {
        let conversion = self.temperature_registers()?.conversion;

        self.update_switch(conversion, true)?;

        if !block {
            return Ok(());
        }

        for _ in 0..self.conversion_polls {
            if !conversion.is_on(self.read(conversion.register)?) {
                return Ok(());
            }

            spin_sleep::sleep(CONVERSION_POLL_INTERVAL);
        }

        warn!(
            "Temperature conversion still busy after {} polls",
            self.conversion_polls
        );

        Err(Error::Timeout)
    }

    /// Reads a single byte from SRAM (DS1307 only).
    ///
    /// `offset` should be less than [`SRAM_SIZE`].
    ///
    /// [`SRAM_SIZE`]: constant.SRAM_SIZE.html
    pub fn sram_byte(&mut self, offset: u8) -> Result<u8, B::Error> {
        let register = self.sram_register(offset)?;

        self.read(register)
    }

    /// Writes a single byte to SRAM (DS1307 only).
    ///
    /// `offset` should be less than [`SRAM_SIZE`].
    ///
    /// [`SRAM_SIZE`]: constant.SRAM_SIZE.html
    pub fn set_sram_byte(&mut self, offset: u8, value: u8) -> Result<(), B::Error> {
        let register = self.sram_register(offset)?;

        self.write(register, value)
    }

    /// Reads the entire SRAM contents into `data` (DS1307 only).
    pub fn sram(&mut self, data: &mut [u8; SRAM_SIZE]) -> Result<(), B::Error> {
        let register = self.sram_register(0)?;

        self.read_block(register, data)
    }

    /// Overwrites the entire SRAM contents with `data` (DS1307 only).
    pub fn set_sram(&mut self, data: &[u8; SRAM_SIZE]) -> Result<(), B::Error> {
        let register = self.sram_register(0)?;

        self.write_block(register, data)
    }

    /// Enables or disables the square-wave output.
    ///
    /// On the DS3231, this also controls whether the INT/SQW pin is used for
    /// alarm interrupts. Enabling the square wave disables alarm interrupts,
    /// although [`check_alarm`] keeps working.
    ///
    /// [`check_alarm`]: #method.check_alarm
    pub fn enable_square_wave(&mut self, enable: bool) -> Result<(), B::Error> {
        let map = self.registers()?;

        debug!("Square-wave output enabled: {}", enable);

        self.update_switch(map.square_wave.enable, enable)
    }

    /// Selects the square-wave output frequency.
    pub fn set_square_wave_frequency(
        &mut self,
        frequency: SquareWaveFrequency,
    ) -> Result<(), B::Error> {
        let map = self.registers()?;
        let square_wave = map.square_wave;
        let rate = square_wave
            .rate(frequency)
            .ok_or(Error::UnsupportedOperation(map.variant))?;

        let register = square_wave.enable.register;
        let value = self.read(register)?;
        self.write(register, (value & !square_wave.rate_mask) | rate)
    }

    /// Enables or disables the 32 kHz output pin (DS3231 only).
    pub fn enable_32khz_output(&mut self, enable: bool) -> Result<(), B::Error> {
        let map = self.registers()?;
        let switch = map
            .output_32khz
            .ok_or(Error::UnsupportedOperation(map.variant))?;

        self.update_switch(switch, enable)
    }

    fn registers(&self) -> Result<&'static RegisterMap, B::Error> {
        match self.variant {
            Some(variant) => Ok(variant.registers()),
            None => Err(Error::NotInitialized),
        }
    }

    fn alarm_registers(&self) -> Result<Alarm, B::Error> {
        let map = self.registers()?;

        map.alarm.ok_or(Error::UnsupportedOperation(map.variant))
    }

    fn temperature_registers(&self) -> Result<Temperature, B::Error> {
        let map = self.registers()?;

        map.temperature
            .ok_or(Error::UnsupportedOperation(map.variant))
    }

    fn sram_register(&self, offset: u8) -> Result<u8, B::Error> {
        let map = self.registers()?;
        let sram = map.sram.ok_or(Error::UnsupportedOperation(map.variant))?;

        if usize::from(offset) >= sram.len {
            return Err(Error::InvalidField(Field::SramOffset));
        }

        Ok(sram.start + offset)
    }

    fn update_switch(&mut self, switch: Switch, on: bool) -> Result<(), B::Error> {
        let value = self.read(switch.register)?;

        self.write(switch.register, switch.apply(value, on))
    }

    fn read(&mut self, register: u8) -> Result<u8, B::Error> {
        let value = self.bus.read_byte(register).map_err(Error::Bus)?;
        trace!("Read {:#04x} from {:#04x}", value, register);

        Ok(value)
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), B::Error> {
        trace!("Write {:#04x} to {:#04x}", value, register);

        self.bus.write_byte(register, value).map_err(Error::Bus)
    }

    fn read_block(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), B::Error> {
        self.bus.read_block(register, buffer).map_err(Error::Bus)?;
        trace!("Read {:02x?} from {:#04x}", buffer, register);

        Ok(())
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<(), B::Error> {
        trace!("Write {:02x?} to {:#04x}", bytes, register);

        self.bus.write_block(register, bytes).map_err(Error::Bus)
    }
}

fn validate_hms(hour: u8, minute: u8, second: u8) -> result::Result<(), Field> {
    if second > 59 {
        Err(Field::Second)
    } else if minute > 59 {
        Err(Field::Minute)
    } else if hour > 23 {
        Err(Field::Hour)
    } else {
        Ok(())
    }
}

fn decode(value: u8, mask: u8, field: Field) -> result::Result<u8, Field> {
    checked_bcd_to_dec(value & mask).ok_or(field)
}

// Converts the hours register to 24-hour format, regardless of its mode.
fn decode_hours(value: u8) -> result::Result<u8, Field> {
    if value & HOURS_12H == 0 {
        return decode(value, HOURS_MASK_24H, Field::Hour);
    }

    let twelve_hour = decode(value, HOURS_MASK_12H, Field::Hour)?;
    crate::datetime::from_twelve_hour(twelve_hour, value & HOURS_PM == 0).ok_or(Field::Hour)
}

fn decode_hms(regs: &[u8; HMS_LEN]) -> result::Result<(u8, u8, u8), Field> {
    let second = decode(regs[IDX_SECONDS], MASK_SECONDS, Field::Second)?;
    let minute = decode(regs[IDX_MINUTES], MASK_MINUTES, Field::Minute)?;
    let hour = decode_hours(regs[IDX_HOURS])?;

    validate_hms(hour, minute, second)?;

    Ok((hour, minute, second))
}

fn decode_time(regs: &[u8; TIME_LEN]) -> result::Result<WallClockTime, Field> {
    let mut time = WallClockTime {
        second: decode(regs[IDX_SECONDS], MASK_SECONDS, Field::Second)?,
        minute: decode(regs[IDX_MINUTES], MASK_MINUTES, Field::Minute)?,
        hour: decode_hours(regs[IDX_HOURS])?,
        weekday: decode(regs[IDX_WEEKDAY], MASK_WEEKDAY, Field::Weekday)?,
        day: decode(regs[IDX_DATE], MASK_DATE, Field::Day)?,
        month: decode(regs[IDX_MONTH], MASK_MONTH, Field::Month)?,
        year: decode(regs[IDX_YEAR], MASK_YEAR, Field::Year)?,
        ..WallClockTime::default()
    };

    time.validate()?;
    time.update_twelve_hour();

    Ok(time)
}
