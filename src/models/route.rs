use crate::models::airplane::Airplane;
use crate::models::airport::Airport;
use chrono::{NaiveDate, NaiveTime, Weekday};
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Route {
    pub route_no: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub airplane_code: String,
    #[sqlx(try_from = "i32")]
    pub days_of_week: WeeklySchedule,
    pub scheduled_time: NaiveTime,
    pub duration_minutes: i32,
    pub validity_from: NaiveDate,
    pub validity_to: Option<NaiveDate>,
}

/// Days a route operates, one bit per weekday starting with Monday at bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySchedule(u8);

impl WeeklySchedule {
    pub const EVERY_DAY: WeeklySchedule = WeeklySchedule(0b111_1111);

    pub fn from_days(days: &[Weekday]) -> Self {
        WeeklySchedule(
            days.iter()
                .fold(0u8, |mask, day| mask | 1 << day.num_days_from_monday()),
        )
    }

    pub fn bits(self) -> i32 {
        self.0 as i32
    }

    pub fn operates_on(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn days(self) -> Vec<Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(|day| self.operates_on(*day))
        .collect()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("weekly schedule mask out of range: {0}")]
pub struct InvalidSchedule(i32);

impl TryFrom<i32> for WeeklySchedule {
    type Error = InvalidSchedule;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if (0..=0b111_1111).contains(&value) {
            Ok(WeeklySchedule(value as u8))
        } else {
            Err(InvalidSchedule(value))
        }
    }
}

impl Route {
    pub fn operates_on(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;

        date >= self.validity_from
            && self.validity_to.map_or(true, |to| date <= to)
            && self.days_of_week.operates_on(date.weekday())
    }

    /// Operating dates within `days` days starting at `from`.
    pub fn operating_dates(&self, from: NaiveDate, days: u64) -> Vec<NaiveDate> {
        from.iter_days()
            .take(days as usize)
            .filter(|date| self.operates_on(*date))
            .collect()
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RouteDetail {
    pub route_no: String,
    pub departure: Airport,
    pub arrival: Airport,
    pub airplane: Airplane,
    /// Operating weekdays, e.g. `["Mon", "Wed"]`
    pub operating_days: Vec<String>,
    pub scheduled_time: NaiveTime,
    pub duration_minutes: i32,
    pub validity_from: NaiveDate,
    pub validity_to: Option<NaiveDate>,
    pub next_operating_dates: Vec<NaiveDate>,
}
