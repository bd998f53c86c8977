use super::domain::BookingRecord;
use super::views::{BookingMetrics, ChannelRevenue, MonthlyBookings};
use chrono::{Datelike, Month};
use std::collections::{BTreeMap, HashMap};

/// Computes the dashboard KPI set over an already filtered snapshot.
///
/// Only `Booked` records feed revenue, volume, stay length, lead time and the
/// two series. The cancellation rate uses the whole snapshot as denominator,
/// including records whose status is neither booked nor cancelled. Every ratio
/// falls back to zero instead of dividing by zero.
pub fn aggregate(filtered: &[BookingRecord]) -> BookingMetrics {
    let confirmed: Vec<&BookingRecord> = filtered.iter().filter(|b| b.is_confirmed()).collect();
    let cancelled = filtered.iter().filter(|b| b.is_cancelled()).count();

    let total_bookings = confirmed.len();
    let total_revenue = total(confirmed.iter().map(|b| b.amount()));
    let total_nights = total(confirmed.iter().map(|b| b.nights()));
    let lead_time_sum = total(confirmed.iter().filter_map(|b| b.lead_time_days()));

    let per_booking = |value: f64| {
        if total_bookings > 0 {
            value / total_bookings as f64
        } else {
            0.0
        }
    };

    let avg_nightly_rate = if total_nights > 0.0 {
        total_revenue / total_nights
    } else {
        0.0
    };

    let cancellation_rate_percent = if filtered.is_empty() {
        0.0
    } else {
        (cancelled as f64 / filtered.len() as f64) * 100.0
    };

    BookingMetrics {
        total_revenue,
        total_bookings,
        total_nights,
        avg_booking_value: per_booking(total_revenue),
        avg_nightly_rate,
        avg_length_of_stay_nights: per_booking(total_nights),
        avg_lead_time_days: per_booking(lead_time_sum),
        cancellation_rate_percent,
        bookings_by_month: bookings_by_month(&confirmed),
        revenue_by_channel: revenue_by_channel(&confirmed),
        filtered_bookings: filtered.to_vec(),
    }
}

// `Sum for f64` starts from -0.0, which would leak into the JSON and reports.
fn total(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, value| acc + value)
}

fn bookings_by_month(confirmed: &[&BookingRecord]) -> Vec<MonthlyBookings> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for arrival in confirmed.iter().filter_map(|b| b.arrival_date()) {
        *counts.entry(arrival.month0()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(month_index, booking_count)| MonthlyBookings {
            month_name: month_name(month_index),
            month_index,
            booking_count,
        })
        .collect()
}

fn revenue_by_channel(confirmed: &[&BookingRecord]) -> Vec<ChannelRevenue> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<ChannelRevenue> = Vec::new();

    for &booking in confirmed {
        let channel = booking.channel();
        match positions.get(channel) {
            Some(&index) => series[index].revenue += booking.amount(),
            None => {
                positions.insert(channel, series.len());
                series.push(ChannelRevenue {
                    channel_name: channel.to_string(),
                    revenue: booking.amount(),
                });
            }
        }
    }

    series
}

fn month_name(month0: u32) -> &'static str {
    u8::try_from(month0 + 1)
        .ok()
        .and_then(|number| Month::try_from(number).ok())
        .map_or("Unknown", |month| month.name())
}
