use core::fmt;

const FAT_EPOCH_YEAR: u16 = 1980;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub shift: u8,
    pub width: u8,
}

impl FieldLayout {
    const fn new(shift: u8, width: u8) -> Self {
        Self { shift, width }
    }

    pub const fn mask(self) -> u16 {
        ((1u32 << self.width) - 1) as u16
    }

    pub const fn extract(self, word: u16) -> u16 {
        (word >> self.shift) & self.mask()
    }
}

pub const YEAR_OFFSET: FieldLayout = FieldLayout::new(9, 7);
pub const MONTH: FieldLayout = FieldLayout::new(5, 4);
pub const DAY: FieldLayout = FieldLayout::new(0, 5);
pub const HOUR: FieldLayout = FieldLayout::new(11, 5);
pub const MINUTE: FieldLayout = FieldLayout::new(5, 6);
pub const SECOND_HALVES: FieldLayout = FieldLayout::new(0, 5);

/// Calendar fields unpacked from a directory entry. Values are not
/// validated: month 0 or February 31 pass through as stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarTimestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CalendarTimestamp {
    pub const fn decode(date: u16, time: u16) -> Self {
        Self {
            year: FAT_EPOCH_YEAR + YEAR_OFFSET.extract(date),
            month: MONTH.extract(date) as u8,
            day: DAY.extract(date) as u8,
            hour: HOUR.extract(time) as u8,
            minute: MINUTE.extract(time) as u8,
            second: (SECOND_HALVES.extract(time) * 2) as u8,
        }
    }
}

pub fn decode(date: u16, time: u16) -> CalendarTimestamp {
    CalendarTimestamp::decode(date, time)
}

impl fmt::Display for CalendarTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{} {}:{}:{}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
