use super::domain::BookingRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Optional inclusive window over arrival dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub const fn unbounded() -> Self {
        Self::new(None, None)
    }

    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a booking arriving on `arrival` falls inside the window. An
    /// invalid arrival only passes an unbounded window.
    pub fn admits(&self, arrival: Option<NaiveDate>) -> bool {
        if self.is_unbounded() {
            return true;
        }

        let Some(arrival) = arrival else {
            return false;
        };

        let after_start = self.start.map_or(true, |start| arrival >= start);
        let before_end = self.end.map_or(true, |end| arrival <= end);
        after_start && before_end
    }

    /// Returns the bookings whose arrival lies inside the window, preserving
    /// input order.
    pub fn apply(&self, bookings: &[BookingRecord]) -> Vec<BookingRecord> {
        if self.is_unbounded() {
            return bookings.to_vec();
        }

        bookings
            .iter()
            .filter(|booking| self.admits(booking.arrival_date()))
            .cloned()
            .collect()
    }
}

/// Free-function form of [`DateRange::apply`].
pub fn filter_bookings(
    bookings: &[BookingRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<BookingRecord> {
    DateRange::new(start, end).apply(bookings)
}
