// rtc_clock.rs - Detects a DS1307 or DS3231 RTC on I2C bus 1, sets the time
// and prints it once a second until interrupted.
//
// Pass a Unix timestamp as the first argument to set the clock. Without an
// argument, the clock is left unchanged.

use std::env;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use simple_signal::{self, Signal};

use dsrtc::datetime;
use dsrtc::i2c::I2c;
use dsrtc::rtc::{Rtc, Variant};

fn main() -> Result<(), Box<dyn Error>> {
    let mut rtc = Rtc::new(I2c::new()?);

    // Find out which chip we're talking to.
    let variant = rtc.initialize()?;
    println!("Detected {}", variant);

    if let Some(arg) = env::args().nth(1) {
        let timestamp: i64 = arg.parse()?;
        let time = datetime::from_unix_time(timestamp).ok_or("Timestamp out of range")?;

        rtc.set_time(&time)?;
    }

    // A DS1307 doesn't keep time after a power loss until it's started.
    if variant == Variant::Ds1307 && !rtc.is_clock_running()? {
        rtc.run_clock(true)?;
    }

    let running = Arc::new(AtomicBool::new(true));

    // When a SIGINT (Ctrl-C) or SIGTERM signal is caught, atomically set running to false.
    simple_signal::set_handler(&[Signal::Int, Signal::Term], {
        let running = running.clone();
        move |_| {
            running.store(false, Ordering::SeqCst);
        }
    });

    while running.load(Ordering::SeqCst) {
        let time = rtc.time()?;

        println!(
            "{} ({:0>2}:{:0>2}:{:0>2} {}, Unix time {})",
            time,
            time.twelve_hour,
            time.minute,
            time.second,
            if time.am { "AM" } else { "PM" },
            datetime::to_unix_time(&time)
        );

        thread::sleep(Duration::from_secs(1));
    }

    Ok(())
}
