use crate::analytics::{BookingRecord, BookingStatus};
use chrono::{NaiveDate, NaiveDateTime};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn stamp(year: i32, month: u32, dom: u32) -> NaiveDateTime {
    day(year, month, dom).and_hms_opt(10, 0, 0).unwrap_or_default()
}

/// Fixed demonstration portfolio shown when the reservation platform is down.
pub fn sample_bookings() -> Vec<BookingRecord> {
    vec![
        BookingRecord::new("sample-1", day(2024, 1, 15), day(2024, 1, 20))
            .with_guest("John Smith")
            .with_amount(500.0)
            .with_source("Airbnb")
            .created_at(stamp(2023, 12, 1)),
        BookingRecord::new("sample-2", day(2024, 2, 10), day(2024, 2, 15))
            .with_guest("Sarah Johnson")
            .with_amount(650.0)
            .with_source("Booking.com")
            .created_at(stamp(2024, 1, 5)),
        BookingRecord::new("sample-3", day(2024, 2, 20), day(2024, 2, 23))
            .with_guest("Michael Brown")
            .with_amount(420.0)
            .with_source("Direct")
            .created_at(stamp(2024, 2, 1)),
        BookingRecord::new("sample-4", day(2024, 3, 5), day(2024, 3, 12))
            .with_guest("Emily Davis")
            .with_amount(980.0)
            .with_source("Vrbo")
            .created_at(stamp(2024, 1, 20)),
        BookingRecord::new("sample-5", day(2024, 3, 18), day(2024, 3, 21))
            .with_guest("David Wilson")
            .with_amount(390.0)
            .with_source("Airbnb")
            .with_status(BookingStatus::Cancelled)
            .created_at(stamp(2024, 2, 28)),
        BookingRecord::new("sample-6", day(2024, 4, 2), day(2024, 4, 6))
            .with_guest("Laura Martinez")
            .with_amount(560.0)
            .with_source("Airbnb")
            .created_at(stamp(2024, 3, 10)),
        BookingRecord::new("sample-7", day(2024, 4, 19), day(2024, 4, 21))
            .with_guest("James Taylor")
            .with_amount(300.0)
            .with_source("Direct"),
        BookingRecord::new("sample-8", day(2024, 5, 24), day(2024, 5, 31))
            .with_guest("Olivia Anderson")
            .with_amount(1120.0)
            .with_source("Booking.com")
            .created_at(stamp(2024, 2, 14)),
    ]
}
