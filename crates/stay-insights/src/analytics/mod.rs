mod aggregate;
pub mod domain;
mod filter;
pub mod views;

pub use aggregate::aggregate;
pub use domain::{BookingRecord, BookingStatus, UNKNOWN_CHANNEL};
pub use filter::{filter_bookings, DateRange};
pub use views::{BookingMetrics, ChannelRevenue, MonthlyBookings};

/// Filters `bookings` to `range` and aggregates the result.
pub fn summarize(bookings: &[BookingRecord], range: &DateRange) -> BookingMetrics {
    aggregate(&range.apply(bookings))
}
