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

//! Calendar time as stored by the clock chips.
//!
//! [`WallClockTime`] mirrors the layout of the time-keeping registers. The
//! 24-hour `hour` field is always authoritative. The 12-hour `twelve_hour`
//! and `am` fields are derived from it, and are only updated when
//! [`update_twelve_hour`] is called (which [`Rtc::time`] does automatically).
//!
//! If you run your clock in 12-hour mode, fill in `twelve_hour` and `am`, call
//! [`translate_twelve_hour`] to store the matching 24-hour value in `hour`,
//! and then pass the result to [`Rtc::set_time`] or [`Rtc::set_alarm`].
//!
//! ## Unix time
//!
//! [`to_unix_time`] and [`from_unix_time`] convert between `WallClockTime`
//! and seconds since 1970-01-01 00:00:00 UTC. The clock chips don't keep track
//! of time zones, so their registers are assumed to hold local time,
//! [`TIME_ZONE_OFFSET`] seconds ahead of UTC. Use the `_with_offset` variants
//! to specify a different offset.
//!
//! [`WallClockTime`]: struct.WallClockTime.html
//! [`update_twelve_hour`]: struct.WallClockTime.html#method.update_twelve_hour
//! [`translate_twelve_hour`]: struct.WallClockTime.html#method.translate_twelve_hour
//! [`Rtc::time`]: ../rtc/struct.Rtc.html#method.time
//! [`Rtc::set_time`]: ../rtc/struct.Rtc.html#method.set_time
//! [`Rtc::set_alarm`]: ../rtc/struct.Rtc.html#method.set_alarm
//! [`to_unix_time`]: fn.to_unix_time.html
//! [`from_unix_time`]: fn.from_unix_time.html
//! [`TIME_ZONE_OFFSET`]: constant.TIME_ZONE_OFFSET.html

use std::fmt;

/// Offset in seconds between the local time kept by the clock and UTC.
pub const TIME_ZONE_OFFSET: i32 = 2 * 60 * 60;

/// First calendar year that can be stored in the year register.
pub const EPOCH_YEAR: u16 = 2000;

/// Highest year offset the year register can hold.
pub const MAX_YEAR_OFFSET: u8 = 99;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const UNIX_EPOCH_YEAR: u16 = 1970;
// 1970-01-01 was a Thursday.
const UNIX_EPOCH_WEEKDAY: i64 = 4;

/// Identifies a `WallClockTime` field, or other caller-supplied value, that
/// failed range validation.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Field {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
    Weekday,
    TwelveHour,
    SramOffset,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Field::Second => write!(f, "second"),
            Field::Minute => write!(f, "minute"),
            Field::Hour => write!(f, "hour"),
            Field::Day => write!(f, "day"),
            Field::Month => write!(f, "month"),
            Field::Year => write!(f, "year"),
            Field::Weekday => write!(f, "weekday"),
            Field::TwelveHour => write!(f, "12-hour"),
            Field::SramOffset => write!(f, "SRAM offset"),
        }
    }
}

/// Date and time as stored by the clock.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct WallClockTime {
    /// Seconds (0-59).
    pub second: u8,
    /// Minutes (0-59).
    pub minute: u8,
    /// Hour in 24-hour format (0-23).
    pub hour: u8,
    /// Day of the month (1-31).
    pub day: u8,
    /// Month (1-12).
    pub month: u8,
    /// Years since 2000 (0-99).
    pub year: u8,
    /// Day of the week (1-7), where 1 is Sunday.
    pub weekday: u8,
    /// Hour in 12-hour format (1-12). Derived from `hour`.
    pub twelve_hour: u8,
    /// `true` before noon. Derived from `hour`.
    pub am: bool,
}

impl WallClockTime {
    /// Constructs a new `WallClockTime`.
    ///
    /// `year` is the full calendar year (2000-2099). The weekday and 12-hour
    /// fields are calculated automatically. Returns `None` if any of the
    /// arguments is out of range.
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Option<WallClockTime> {
        if year < EPOCH_YEAR || year > EPOCH_YEAR + u16::from(MAX_YEAR_OFFSET) {
            return None;
        }

        let mut time = WallClockTime {
            second,
            minute,
            hour,
            day,
            month,
            year: (year - EPOCH_YEAR) as u8,
            weekday: 1,
            twelve_hour: 12,
            am: true,
        };

        time.validate().ok()?;
        time.weekday = weekday(days_since_unix_epoch(&time));
        time.update_twelve_hour();

        Some(time)
    }

    /// Returns the full calendar year.
    pub fn full_year(&self) -> u16 {
        EPOCH_YEAR + u16::from(self.year)
    }

    /// Checks every authoritative field against its legal range.
    ///
    /// The derived 12-hour fields aren't checked. Returns the first field
    /// that's out of range.
    pub fn validate(&self) -> Result<(), Field> {
        if self.second > 59 {
            return Err(Field::Second);
        }

        if self.minute > 59 {
            return Err(Field::Minute);
        }

        if self.hour > 23 {
            return Err(Field::Hour);
        }

        if self.month < 1 || self.month > 12 {
            return Err(Field::Month);
        }

        if self.year > MAX_YEAR_OFFSET {
            return Err(Field::Year);
        }

        if self.day < 1 || self.day > days_in_month(self.full_year(), self.month) {
            return Err(Field::Day);
        }

        if self.weekday < 1 || self.weekday > 7 {
            return Err(Field::Weekday);
        }

        Ok(())
    }

    /// Recalculates `twelve_hour` and `am` based on the 24-hour `hour` field.
    pub fn update_twelve_hour(&mut self) {
        let (twelve_hour, am) = to_twelve_hour(self.hour);
        self.twelve_hour = twelve_hour;
        self.am = am;
    }

    /// Stores the 24-hour equivalent of `twelve_hour` and `am` in `hour`.
    ///
    /// Returns `Err(Field::TwelveHour)` and leaves `hour` untouched if
    /// `twelve_hour` isn't between 1 and 12.
    pub fn translate_twelve_hour(&mut self) -> Result<(), Field> {
        self.hour = from_twelve_hour(self.twelve_hour, self.am).ok_or(Field::TwelveHour)?;

        Ok(())
    }
}

impl Default for WallClockTime {
    /// Returns 2000-01-01 00:00:00, a Saturday.
    fn default() -> WallClockTime {
        WallClockTime {
            second: 0,
            minute: 0,
            hour: 0,
            day: 1,
            month: 1,
            year: 0,
            weekday: 7,
            twelve_hour: 12,
            am: true,
        }
    }
}

impl fmt::Display for WallClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.full_year(),
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// Converts a 24-hour value to its 12-hour equivalent and AM flag.
pub fn to_twelve_hour(hour: u8) -> (u8, bool) {
    match hour {
        0 => (12, true),
        1..=11 => (hour, true),
        12 => (12, false),
        _ => (hour - 12, false),
    }
}

/// Converts a 12-hour value and AM flag to its 24-hour equivalent.
pub fn from_twelve_hour(twelve_hour: u8, am: bool) -> Option<u8> {
    match (twelve_hour, am) {
        (12, true) => Some(0),
        (12, false) => Some(12),
        (1..=11, true) => Some(twelve_hour),
        (1..=11, false) => Some(twelve_hour + 12),
        _ => None,
    }
}

/// Returns `true` if `year` is a leap year in the Gregorian calendar.
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Returns the number of days in `month` (1-12) of `year`, or 0 for an
/// invalid month.
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn days_in_year(year: u16) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

fn days_since_unix_epoch(time: &WallClockTime) -> i64 {
    let full_year = time.full_year();

    let mut days: i64 = (UNIX_EPOCH_YEAR..full_year).map(days_in_year).sum();
    days += (1..time.month)
        .map(|month| i64::from(days_in_month(full_year, month)))
        .sum::<i64>();

    days + i64::from(time.day) - 1
}

fn weekday(days: i64) -> u8 {
    ((days + UNIX_EPOCH_WEEKDAY).rem_euclid(7) + 1) as u8
}

/// Converts `time` to seconds since the Unix epoch, treating it as local
/// time [`TIME_ZONE_OFFSET`] seconds ahead of UTC.
///
/// The weekday and 12-hour fields are ignored.
///
/// [`TIME_ZONE_OFFSET`]: constant.TIME_ZONE_OFFSET.html
pub fn to_unix_time(time: &WallClockTime) -> i64 {
    to_unix_time_with_offset(time, TIME_ZONE_OFFSET)
}

/// Converts `time` to seconds since the Unix epoch, treating it as local
/// time `offset` seconds ahead of UTC.
pub fn to_unix_time_with_offset(time: &WallClockTime, offset: i32) -> i64 {
    days_since_unix_epoch(time) * SECONDS_PER_DAY
        + i64::from(time.hour) * 3600
        + i64::from(time.minute) * 60
        + i64::from(time.second)
        - i64::from(offset)
}

/// Converts seconds since the Unix epoch to local time, [`TIME_ZONE_OFFSET`]
/// seconds ahead of UTC.
///
/// Returns `None` if the resulting local time falls outside of the years
/// 2000-2099.
///
/// [`TIME_ZONE_OFFSET`]: constant.TIME_ZONE_OFFSET.html
pub fn from_unix_time(timestamp: i64) -> Option<WallClockTime> {
    from_unix_time_with_offset(timestamp, TIME_ZONE_OFFSET)
}

/// Converts seconds since the Unix epoch to local time, `offset` seconds
/// ahead of UTC.
pub fn from_unix_time_with_offset(timestamp: i64, offset: i32) -> Option<WallClockTime> {
    let local = timestamp.checked_add(i64::from(offset))?;
    let total_days = local.div_euclid(SECONDS_PER_DAY);
    let seconds_of_day = local.rem_euclid(SECONDS_PER_DAY);

    let mut days = total_days;
    let mut year = UNIX_EPOCH_YEAR;
    if days < 0 {
        return None;
    }

    while days >= days_in_year(year) {
        days -= days_in_year(year);
        year += 1;

        if year > EPOCH_YEAR + u16::from(MAX_YEAR_OFFSET) {
            return None;
        }
    }

    if year < EPOCH_YEAR {
        return None;
    }

    let mut month = 1;
    while days >= i64::from(days_in_month(year, month)) {
        days -= i64::from(days_in_month(year, month));
        month += 1;
    }

    let mut time = WallClockTime {
        second: (seconds_of_day % 60) as u8,
        minute: ((seconds_of_day / 60) % 60) as u8,
        hour: (seconds_of_day / 3600) as u8,
        day: days as u8 + 1,
        month,
        year: (year - EPOCH_YEAR) as u8,
        weekday: weekday(total_days),
        twelve_hour: 12,
        am: true,
    };
    time.update_twelve_hour();

    Some(time)
}
