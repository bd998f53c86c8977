use super::domain::BookingRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBookings {
    pub month_name: &'static str,
    pub month_index: u32,
    pub booking_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRevenue {
    pub channel_name: String,
    pub revenue: f64,
}

/// KPI set and chart series derived from one filtered booking snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingMetrics {
    pub total_revenue: f64,
    pub total_bookings: usize,
    pub total_nights: f64,
    pub avg_booking_value: f64,
    pub avg_nightly_rate: f64,
    pub avg_length_of_stay_nights: f64,
    pub avg_lead_time_days: f64,
    pub cancellation_rate_percent: f64,
    pub bookings_by_month: Vec<MonthlyBookings>,
    pub revenue_by_channel: Vec<ChannelRevenue>,
    pub filtered_bookings: Vec<BookingRecord>,
}

impl BookingMetrics {
    pub fn top_channel(&self) -> Option<&ChannelRevenue> {
        self.revenue_by_channel
            .iter()
            .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
    }

    pub fn busiest_month(&self) -> Option<&MonthlyBookings> {
        self.bookings_by_month
            .iter()
            .max_by_key(|entry| entry.booking_count)
    }
}
