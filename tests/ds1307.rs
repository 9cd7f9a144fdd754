mod common;

use common::{SimulatedChip, DS1307_CONTROL};
use dsrtc::datetime::{Field, WallClockTime};
use dsrtc::rtc::{Error, Rtc, SquareWaveFrequency, Variant, SRAM_SIZE};

fn unsupported<T>(result: Result<T, Error<common::Nack>>) -> bool {
    matches!(result, Err(Error::UnsupportedOperation(Variant::Ds1307)))
}

#[test]
fn stop_and_start_clock() {
    let mut chip = SimulatedChip::ds1307();
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();

    rtc.set_time_hms(10, 20, 42).unwrap();
    assert!(rtc.is_clock_running().unwrap());

    rtc.run_clock(false).unwrap();
    assert!(!rtc.is_clock_running().unwrap());
    assert_eq!(rtc.read_register(0x00).unwrap(), 0xC2);
    assert_eq!(rtc.time_hms().unwrap(), (10, 20, 42));

    rtc.run_clock(true).unwrap();
    assert!(rtc.is_clock_running().unwrap());
    assert_eq!(rtc.read_register(0x00).unwrap(), 0x42);
}

#[test]
fn sram_bytes() {
    let mut chip = SimulatedChip::ds1307();
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();

    rtc.set_sram_byte(0, 0xAB).unwrap();
    rtc.set_sram_byte(55, 0xCD).unwrap();

    assert_eq!(rtc.sram_byte(0).unwrap(), 0xAB);
    assert_eq!(rtc.sram_byte(55).unwrap(), 0xCD);
    assert_eq!(rtc.sram_byte(1).unwrap(), 0x00);

    let chip = rtc.release();
    assert_eq!(chip.reg(0x08), 0xAB);
    assert_eq!(chip.reg(0x3F), 0xCD);
}

#[test]
fn sram_offset_out_of_range() {
    let mut chip = SimulatedChip::ds1307();
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();
    let time = rtc.time().unwrap();

    assert!(matches!(
        rtc.sram_byte(56),
        Err(Error::InvalidField(Field::SramOffset))
    ));
    assert!(matches!(
        rtc.set_sram_byte(56, 0xFF),
        Err(Error::InvalidField(Field::SramOffset))
    ));
    assert!(matches!(
        rtc.set_sram_byte(255, 0xFF),
        Err(Error::InvalidField(Field::SramOffset))
    ));

    // Nothing wrapped around into the time registers
    assert_eq!(rtc.time().unwrap(), time);
}

#[test]
fn sram_contents() {
    let mut chip = SimulatedChip::ds1307();
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();
    let time = WallClockTime::new(2040, 8, 12, 7, 7, 7).unwrap();
    rtc.set_time(&time).unwrap();

    let mut data = [0u8; SRAM_SIZE];
    for (index, byte) in data.iter_mut().enumerate() {
        *byte = index as u8 * 3;
    }
    rtc.set_sram(&data).unwrap();

    let mut read = [0u8; SRAM_SIZE];
    rtc.sram(&mut read).unwrap();
    assert_eq!(read, data);
    assert_eq!(rtc.sram_byte(10).unwrap(), 30);
    assert_eq!(rtc.time().unwrap(), time);
}

#[test]
fn square_wave() {
    let mut chip = SimulatedChip::ds1307();
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();

    rtc.enable_square_wave(true).unwrap();
    assert_eq!(rtc.read_register(DS1307_CONTROL).unwrap(), 0x13);

    rtc.set_square_wave_frequency(SquareWaveFrequency::Hz4096)
        .unwrap();
    assert_eq!(rtc.read_register(DS1307_CONTROL).unwrap(), 0x11);

    rtc.set_square_wave_frequency(SquareWaveFrequency::Hz1).unwrap();
    assert_eq!(rtc.read_register(DS1307_CONTROL).unwrap(), 0x10);

    rtc.set_square_wave_frequency(SquareWaveFrequency::Hz32768)
        .unwrap();
    assert_eq!(rtc.read_register(DS1307_CONTROL).unwrap(), 0x13);

    assert!(unsupported(
        rtc.set_square_wave_frequency(SquareWaveFrequency::Hz1024)
    ));
    assert_eq!(rtc.read_register(DS1307_CONTROL).unwrap(), 0x13);

    rtc.enable_square_wave(false).unwrap();
    assert_eq!(rtc.read_register(DS1307_CONTROL).unwrap(), 0x03);
}

#[test]
fn ds3231_features_are_unsupported() {
    let mut chip = SimulatedChip::ds1307();
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();
    let time = WallClockTime::default();
    // Out of range, but the missing feature is reported first
    let invalid = WallClockTime {
        hour: 24,
        ..WallClockTime::default()
    };

    assert!(unsupported(rtc.temperature()));
    assert!(unsupported(rtc.force_temperature_conversion(true)));
    assert!(unsupported(rtc.set_alarm(&time)));
    assert!(unsupported(rtc.set_alarm(&invalid)));
    assert!(unsupported(rtc.set_alarm_hms(6, 0, 0)));
    assert!(unsupported(rtc.alarm()));
    assert!(unsupported(rtc.alarm_hms()));
    assert!(unsupported(rtc.check_alarm()));
    assert!(unsupported(rtc.reset_alarm()));
    assert!(unsupported(rtc.enable_32khz_output(true)));

    let chip = rtc.release();
    // Probe only
    assert_eq!(chip.writes.len(), 2);
}
