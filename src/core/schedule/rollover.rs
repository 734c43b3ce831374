/// Decides which month a bare day-of-month number belongs to.
///
/// `month_for` is asked before the day is validated, `commit` only after the
/// resulting date was accepted.
pub trait MonthRollover {
    fn month_for(&mut self, day: u32) -> (i32, u32);
    fn commit(&mut self, day: u32);
}

/// Advance one month whenever a day number is lower than the last accepted one.
#[derive(Debug, Clone)]
pub struct DecreasingDayRollover {
    year: i32,
    month: u32,
    last_day: u32,
}

impl DecreasingDayRollover {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            last_day: 0,
        }
    }
}

impl MonthRollover for DecreasingDayRollover {
    fn month_for(&mut self, day: u32) -> (i32, u32) {
        if self.last_day > 0 && day < self.last_day {
            if self.month == 12 {
                self.month = 1;
                self.year += 1;
            } else {
                self.month += 1;
            }
        }
        (self.year, self.month)
    }

    fn commit(&mut self, day: u32) {
        self.last_day = day;
    }
}
