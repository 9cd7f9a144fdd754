mod common;

use common::SimulatedChip;
use dsrtc::datetime::{self, Field, WallClockTime};
use dsrtc::rtc::{Error, Rtc};

fn chips() -> [SimulatedChip; 2] {
    [SimulatedChip::ds1307(), SimulatedChip::ds3231()]
}

#[test]
fn set_and_get_time() {
    let times = [
        WallClockTime::new(2000, 1, 1, 0, 0, 0).unwrap(),
        WallClockTime::new(2099, 12, 31, 23, 59, 59).unwrap(),
        WallClockTime::new(2024, 2, 29, 12, 0, 0).unwrap(),
        WallClockTime::new(2023, 10, 17, 8, 15, 30).unwrap(),
    ];

    for mut chip in chips() {
        let mut rtc = Rtc::new(&mut chip);
        rtc.initialize().unwrap();

        for time in times.iter() {
            rtc.set_time(time).unwrap();
            assert_eq!(rtc.time().unwrap(), *time);
        }
    }
}

#[test]
fn set_time_writes_bcd() {
    let mut chip = SimulatedChip::ds3231();
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();

    rtc.set_time(&WallClockTime::new(2023, 10, 17, 20, 15, 30).unwrap())
        .unwrap();

    let chip = rtc.release();
    assert_eq!(&chip.regs[..7], &[0x30, 0x15, 0x20, 0x03, 0x17, 0x10, 0x23]);
}

#[test]
fn invalid_fields_are_rejected_before_writing() {
    let cases = [
        (
            WallClockTime {
                hour: 24,
                ..WallClockTime::default()
            },
            Field::Hour,
        ),
        (
            WallClockTime {
                month: 13,
                ..WallClockTime::default()
            },
            Field::Month,
        ),
        (
            WallClockTime {
                second: 60,
                ..WallClockTime::default()
            },
            Field::Second,
        ),
        (
            WallClockTime {
                month: 2,
                day: 30,
                ..WallClockTime::default()
            },
            Field::Day,
        ),
        (
            WallClockTime {
                year: 100,
                ..WallClockTime::default()
            },
            Field::Year,
        ),
    ];

    for mut chip in chips() {
        let mut rtc = Rtc::new(&mut chip);
        let variant = rtc.initialize().unwrap();

        let chip = rtc.release();
        let writes = chip.writes.len();
        let before = chip.regs;

        let mut rtc = Rtc::new(chip);
        rtc.set_variant(variant);

        for (time, field) in cases.iter() {
            match rtc.set_time(time) {
                Err(Error::InvalidField(f)) => assert_eq!(f, *field),
                other => panic!("Unexpected result: {:?}", other),
            }
        }

        assert!(matches!(
            rtc.set_time_hms(12, 60, 0),
            Err(Error::InvalidField(Field::Minute))
        ));

        let chip = rtc.release();
        assert_eq!(chip.writes.len(), writes);
        assert_eq!(chip.regs, before);
    }
}

#[test]
fn set_time_preserves_clock_halt() {
    let mut chip = SimulatedChip::ds1307();
    chip.regs[0x00] = 0x80;
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();

    rtc.set_time(&WallClockTime::new(2021, 6, 1, 9, 41, 30).unwrap())
        .unwrap();
    assert!(!rtc.is_clock_running().unwrap());
    assert_eq!(rtc.time().unwrap().second, 30);

    assert_eq!(rtc.release().reg(0x00), 0xB0);
}

#[test]
fn set_time_preserves_century() {
    let mut chip = SimulatedChip::ds3231();
    chip.regs[0x05] = 0x81;
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();

    let time = WallClockTime::new(2050, 7, 4, 18, 0, 0).unwrap();
    rtc.set_time(&time).unwrap();
    assert_eq!(rtc.time().unwrap(), time);

    assert_eq!(rtc.release().reg(0x05), 0x87);
}

#[test]
fn reads_12_hour_mode() {
    let mut chip = SimulatedChip::ds3231();
    // 8 PM
    chip.regs[0x02] = 0x40 | 0x20 | 0x08;
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();

    let mut time = rtc.time().unwrap();
    assert_eq!(time.hour, 20);
    assert_eq!(time.twelve_hour, 8);
    assert!(!time.am);
    assert_eq!(rtc.time_hms().unwrap(), (20, 0, 0));

    // Writing switches the clock to 24-hour mode
    time.twelve_hour = 7;
    time.translate_twelve_hour().unwrap();
    rtc.set_time(&time).unwrap();
    assert_eq!(rtc.time().unwrap().hour, 19);

    assert_eq!(rtc.release().reg(0x02), 0x19);
}

#[test]
fn corrupt_time_registers() {
    let mut chip = SimulatedChip::ds1307();
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();

    let time = rtc.time().unwrap();
    assert_eq!(rtc.last_time(), Some(time));

    rtc.write_register(0x01, 0x5A).unwrap();
    assert!(matches!(
        rtc.time(),
        Err(Error::CorruptData(Field::Minute))
    ));
    assert_eq!(rtc.last_time(), Some(time));

    rtc.write_register(0x01, 0x00).unwrap();
    rtc.write_register(0x05, 0x00).unwrap();
    assert!(matches!(rtc.time(), Err(Error::CorruptData(Field::Month))));
}

#[test]
fn time_of_day() {
    for mut chip in chips() {
        let mut rtc = Rtc::new(&mut chip);
        rtc.initialize().unwrap();

        let date = WallClockTime::new(2031, 3, 15, 1, 2, 3).unwrap();
        rtc.set_time(&date).unwrap();
        rtc.set_time_hms(13, 45, 7).unwrap();

        assert_eq!(rtc.time_hms().unwrap(), (13, 45, 7));

        let time = rtc.time().unwrap();
        assert_eq!((time.full_year(), time.month, time.day), (2031, 3, 15));
        assert_eq!((time.hour, time.minute, time.second), (13, 45, 7));
        assert_eq!(time.weekday, date.weekday);
    }
}

#[test]
fn last_time_is_cached() {
    let mut chip = SimulatedChip::ds3231();
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();
    assert_eq!(rtc.last_time(), None);

    rtc.time_hms().unwrap();
    assert_eq!(rtc.last_time(), None);

    let time = rtc.time().unwrap();
    assert_eq!(rtc.last_time(), Some(time));
    assert_eq!(time, WallClockTime::default());
}

#[test]
fn unix_time_through_the_clock() {
    let mut chip = SimulatedChip::ds3231();
    let mut rtc = Rtc::new(&mut chip);
    rtc.initialize().unwrap();

    let timestamp = 1_700_000_000;
    let time = datetime::from_unix_time(timestamp).unwrap();
    rtc.set_time(&time).unwrap();

    assert_eq!(datetime::to_unix_time(&rtc.time().unwrap()), timestamp);
}
