use chrono::NaiveDate;
use serde_json::json;
use stay_insights::analytics::{
    aggregate, filter_bookings, summarize, BookingMetrics, BookingRecord, BookingStatus, DateRange,
};
use stay_insights::sources::BookingsEnvelope;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn platform_payload() -> Vec<BookingRecord> {
    let envelope: BookingsEnvelope = serde_json::from_value(json!({
        "items": [
            {
                "id": "r-100",
                "guestName": "Ana Lopez",
                "arrival": "2024-01-15",
                "departure": "2024-01-20",
                "totalAmount": 500,
                "source": "Airbnb",
                "status": "Booked",
                "creationDate": "2023-12-16T00:00:00Z"
            },
            {
                "id": "r-101",
                "arrival": "2024-02-10",
                "departure": "2024-02-15",
                "totalAmount": 650,
                "source": "Booking.com",
                "status": "Booked"
            },
            {
                "id": "r-102",
                "arrival": "2024-02-12",
                "departure": "2024-02-14",
                "totalAmount": 220,
                "source": "Direct",
                "status": "Cancelled"
            },
            {
                "id": "r-103",
                "arrival": "2024-03-01",
                "departure": "2024-03-03",
                "status": "Inquiry"
            }
        ]
    }))
    .expect("payload parses");
    envelope.items
}

#[test]
fn empty_snapshot_produces_all_zero_metrics() {
    let metrics = aggregate(&[]);
    assert_eq!(metrics.total_revenue, 0.0);
    assert_eq!(metrics.total_bookings, 0);
    assert_eq!(metrics.total_nights, 0.0);
    assert_eq!(metrics.avg_booking_value, 0.0);
    assert_eq!(metrics.avg_nightly_rate, 0.0);
    assert_eq!(metrics.avg_length_of_stay_nights, 0.0);
    assert_eq!(metrics.avg_lead_time_days, 0.0);
    assert_eq!(metrics.cancellation_rate_percent, 0.0);
    assert!(metrics.bookings_by_month.is_empty());
    assert!(metrics.revenue_by_channel.is_empty());
}

#[test]
fn full_snapshot_metrics_match_platform_payload() {
    let bookings = platform_payload();
    let metrics = summarize(&bookings, &DateRange::unbounded());

    assert_eq!(metrics.total_revenue, 1150.0);
    assert_eq!(metrics.total_bookings, 2);
    assert_eq!(metrics.total_nights, 10.0);
    assert_eq!(metrics.avg_nightly_rate, 115.0);
    assert_eq!(metrics.cancellation_rate_percent, 25.0);
    // 30 lead days on one booking, none recorded on the other.
    assert_eq!(metrics.avg_lead_time_days, 15.0);
    assert_eq!(metrics.filtered_bookings, bookings);
}

#[test]
fn february_window_keeps_february_arrivals_only() {
    let bookings = platform_payload();
    let filtered = filter_bookings(&bookings, Some(date(2024, 2, 1)), Some(date(2024, 2, 28)));
    let ids: Vec<&str> = filtered.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["r-101", "r-102"]);

    let metrics = aggregate(&filtered);
    assert_eq!(metrics.total_bookings, 1);
    assert_eq!(metrics.total_revenue, 650.0);
    assert_eq!(metrics.cancellation_rate_percent, 50.0);
}

#[test]
fn cancellation_rate_stays_within_bounds() {
    let bookings = platform_payload();
    let windows = [
        DateRange::unbounded(),
        DateRange::new(Some(date(2024, 2, 1)), None),
        DateRange::new(None, Some(date(2024, 1, 31))),
        DateRange::new(Some(date(2024, 2, 12)), Some(date(2024, 2, 12))),
        DateRange::new(Some(date(2025, 1, 1)), None),
    ];

    for window in windows {
        let metrics: BookingMetrics = summarize(&bookings, &window);
        assert!(
            (0.0..=100.0).contains(&metrics.cancellation_rate_percent),
            "rate out of bounds for {window:?}"
        );
        if metrics.filtered_bookings.is_empty() {
            assert_eq!(metrics.cancellation_rate_percent, 0.0);
        }
    }
}

#[test]
fn filtering_twice_changes_nothing() {
    let bookings = platform_payload();
    let once = filter_bookings(&bookings, Some(date(2024, 1, 20)), None);
    let twice = filter_bookings(&once, Some(date(2024, 1, 20)), None);
    assert_eq!(once, twice);
}

#[test]
fn sparse_records_aggregate_without_failure() {
    let bookings: Vec<BookingRecord> = serde_json::from_value(json!([
        { "status": "Booked" },
        { "status": "Booked", "arrival": "garbage", "departure": "2024-01-01" },
        { "status": "Cancelled", "totalAmount": null }
    ]))
    .expect("sparse records parse");

    let metrics = aggregate(&bookings);
    assert_eq!(metrics.total_bookings, 2);
    assert_eq!(metrics.total_revenue, 0.0);
    assert_eq!(metrics.total_nights, 0.0);
    assert_eq!(metrics.avg_nightly_rate, 0.0);
    assert_eq!(metrics.revenue_by_channel.len(), 1);
    assert_eq!(metrics.revenue_by_channel[0].channel_name, "Unknown");
    assert!(bookings.iter().all(|b| b.status != BookingStatus::Other(String::new())));
}

#[test]
fn metrics_serialize_with_dashboard_field_names() {
    let metrics = aggregate(&platform_payload());
    let value = serde_json::to_value(&metrics).expect("metrics serialize");

    assert_eq!(value["totalRevenue"], json!(1150.0));
    assert_eq!(value["avgLengthOfStayNights"], json!(5.0));
    assert_eq!(value["bookingsByMonth"][0]["monthName"], json!("January"));
    assert_eq!(value["bookingsByMonth"][0]["monthIndex"], json!(0));
    assert_eq!(value["revenueByChannel"][1]["channelName"], json!("Booking.com"));
    assert_eq!(value["filteredBookings"][0]["guestName"], json!("Ana Lopez"));
}

#[test]
fn cancellation_rate_is_bounded_for_every_status_mix() {
    let statuses = [
        BookingStatus::Booked,
        BookingStatus::Cancelled,
        BookingStatus::from("Inquiry"),
    ];

    for size in 0..=5u32 {
        for code in 0..3usize.pow(size) {
            let mut remaining = code;
            let bookings: Vec<BookingRecord> = (0..size)
                .map(|n| {
                    let status = statuses[remaining % 3].clone();
                    remaining /= 3;
                    BookingRecord::new(format!("b-{n}"), date(2024, 1, 1 + n), date(2024, 1, 3 + n))
                        .with_amount(100.0)
                        .with_status(status)
                })
                .collect();

            let metrics = aggregate(&bookings);
            let cancelled = bookings.iter().filter(|b| b.is_cancelled()).count();
            assert!(
                (0.0..=100.0).contains(&metrics.cancellation_rate_percent),
                "rate out of bounds for mix {code} of size {size}"
            );
            assert!(metrics.cancellation_rate_percent.is_sign_positive());
            if bookings.is_empty() {
                assert_eq!(metrics.cancellation_rate_percent, 0.0);
            } else {
                let expected = cancelled as f64 / bookings.len() as f64 * 100.0;
                assert!((metrics.cancellation_rate_percent - expected).abs() < 1e-9);
            }
        }
    }
}
