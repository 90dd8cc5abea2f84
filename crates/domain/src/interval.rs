use chrono::{Duration, Local, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl Interval {
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }
}

impl From<std::ops::RangeInclusive<NaiveDate>> for Interval {
    fn from(value: std::ops::RangeInclusive<NaiveDate>) -> Self {
        Interval {
            first: *value.start(),
            last: *value.end(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DefaultInterval {
    All,
    _1Y = 365,
    _6M = 182,
    #[default]
    _3M = 91,
    _1M = 30,
}

impl DefaultInterval {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DefaultInterval::All => "All",
            DefaultInterval::_1Y => "1Y",
            DefaultInterval::_6M => "6M",
            DefaultInterval::_3M => "3M",
            DefaultInterval::_1M => "1M",
        }
    }
}

/// Determine the interval shown initially for a series of dates.
///
/// The interval always ends today. It starts at the beginning of the default interval, unless the
/// most recent date lies before it, in which case all dates are included.
#[must_use]
pub fn init_interval(dates: &[NaiveDate], default_interval: DefaultInterval) -> Interval {
    let today = Local::now().date_naive();
    let mut first = dates.iter().copied().min().unwrap_or(today);
    let last = dates.iter().copied().max().unwrap_or(today);

    if default_interval != DefaultInterval::All
        && last >= today - Duration::days(default_interval as i64)
    {
        first = today - Duration::days(default_interval as i64);
    }

    Interval { first, last: today }
}
