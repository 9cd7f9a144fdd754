//! DSRTC is a driver for the Maxim DS1307 and DS3231 real-time clocks. Both
//! chips are detected automatically, and exposed through a single interface
//! for reading and setting the time, alarm, square-wave output, temperature
//! sensor and battery-backed SRAM, depending on which features the attached
//! chip offers.
//!
//! The driver communicates with the clock through the [`Bus`] trait. DSRTC
//! includes a [`Bus`] implementation for the Linux `i2cdev` interface, and
//! adapters for any `embedded-hal` v0.2.7 or v1.0.0 I2C peripheral.
//!
//! ```no_run
//! use dsrtc::i2c::I2c;
//! use dsrtc::rtc::Rtc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rtc = Rtc::new(I2c::new()?);
//! let variant = rtc.initialize()?;
//!
//! println!("{}: {}", variant, rtc.time()?);
//! # Ok(())
//! # }
//! ```
//!
//! [`Bus`]: bus/trait.Bus.html

// Used by rustdoc to link other crates to dsrtc's docs
#![doc(html_root_url = "https://docs.rs/dsrtc/0.3.0")]

pub mod bcd;
pub mod bus;
pub mod datetime;
#[cfg(any(feature = "embedded-hal", feature = "embedded-hal-0"))]
pub mod hal;
pub mod i2c;
pub mod rtc;
