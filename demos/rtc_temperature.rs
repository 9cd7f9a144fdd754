// rtc_temperature.rs - Reads the temperature sensor of a DS3231 RTC every few
// seconds, with the 32 kHz output enabled while it's running.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use simple_signal::{self, Signal};

use dsrtc::i2c::I2c;
use dsrtc::rtc::{Rtc, Variant};

fn main() -> Result<(), Box<dyn Error>> {
    let mut rtc = Rtc::new(I2c::new()?);

    if rtc.initialize()? != Variant::Ds3231 {
        return Err("Temperature readings require a DS3231".into());
    }

    rtc.enable_32khz_output(true)?;

    let running = Arc::new(AtomicBool::new(true));

    // When a SIGINT (Ctrl-C) or SIGTERM signal is caught, atomically set running to false.
    simple_signal::set_handler(&[Signal::Int, Signal::Term], {
        let running = running.clone();
        move |_| {
            running.store(false, Ordering::SeqCst);
        }
    });

    while running.load(Ordering::SeqCst) {
        // Don't wait for the next automatic conversion.
        rtc.force_temperature_conversion(true)?;

        // The fractional part is added to the integer part, so -0.25 °C is (-1, 75).
        let (degrees, hundredths) = rtc.temperature()?;
        let celsius = f32::from(degrees) + f32::from(hundredths) / 100.0;
        println!("{}: {:.2} °C", rtc.time()?, celsius);

        thread::sleep(Duration::from_secs(5));
    }

    rtc.enable_32khz_output(false)?;

    Ok(())
}
