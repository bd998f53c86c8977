use chrono::NaiveDate;
use clap::Args;
use stay_insights::analytics::{BookingMetrics, DateRange};
use stay_insights::config::AppConfig;
use stay_insights::dashboard::DashboardSession;
use stay_insights::error::AppError;
use stay_insights::insights::InsightClient;
use stay_insights::sources::{
    load_booking_feed, sample_bookings, BookingFeed, BookingImporter, ReservationsClient,
};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Booking export to summarize (JSON array, JSON envelope, or CSV)
    #[arg(long)]
    pub(crate) bookings: Option<PathBuf>,
    /// Fetch bookings from the configured reservations API instead of a file
    #[arg(long, conflicts_with = "bookings")]
    pub(crate) live: bool,
    /// First arrival date to include (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Last arrival date to include (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) end: Option<NaiveDate>,
    /// Include every booking in the selected window
    #[arg(long)]
    pub(crate) list_bookings: bool,
    /// Emit the metrics as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Ask the insights model a question about the selected window
    #[arg(long)]
    pub(crate) ask: Option<String>,
}

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        bookings,
        live,
        start,
        end,
        list_bookings,
        json,
        ask,
    } = args;

    let config = if live || ask.is_some() {
        Some(AppConfig::load()?)
    } else {
        None
    };
    let http = match &config {
        Some(config) => Some(config.upstream.http_client()?),
        None => None,
    };

    let (feed, source_label) = match (bookings, &config, &http) {
        (Some(path), _, _) => {
            let records = BookingImporter::from_path(&path)?;
            (BookingFeed::Live(records), format!("booking export {}", path.display()))
        }
        (None, Some(config), Some(http)) if live => {
            let client = ReservationsClient::from_config(http.clone(), &config.upstream);
            let label = format!("reservations API {}", client.endpoint());
            (load_booking_feed(&client).await, label)
        }
        _ => (
            BookingFeed::Live(sample_bookings()),
            "built-in sample bookings".to_string(),
        ),
    };

    let mut session = DashboardSession::new();
    session.begin_load();
    session.load_feed(feed);
    session.set_range(DateRange::new(start, end));

    if json {
        let metrics = session.metrics();
        serde_json::to_writer_pretty(std::io::stdout().lock(), &metrics)
            .map_err(std::io::Error::from)?;
        println!();
    } else {
        print!("{}", render_report(&session, &source_label, list_bookings));
    }

    if let (Some(question), Some(config), Some(http)) = (ask, &config, http) {
        let client = InsightClient::from_config(http, &config.upstream);
        let (revision, request) = session.request_insight(&question);
        let outcome = client
            .ask(&request)
            .await
            .map_err(|err| err.public_message());
        session.resolve_insight(revision, outcome.clone());

        match outcome {
            Ok(answer) => println!("\nInsight\n{answer}"),
            Err(message) => println!("\nInsight unavailable: {message}"),
        }
    }

    Ok(())
}

fn describe_range(range: &DateRange) -> String {
    match (range.start, range.end) {
        (None, None) => "all arrivals".to_string(),
        (Some(start), None) => format!("arrivals from {start}"),
        (None, Some(end)) => format!("arrivals through {end}"),
        (Some(start), Some(end)) => format!("arrivals {start} -> {end}"),
    }
}

pub(crate) fn render_report(
    session: &DashboardSession,
    source_label: &str,
    list_bookings: bool,
) -> String {
    let state = session.state();
    let metrics: BookingMetrics = session.metrics();
    let mut out = String::new();

    let _ = writeln!(out, "Booking performance report");
    let _ = writeln!(out, "Window: {}", describe_range(&state.range));
    let _ = writeln!(out, "Data source: {source_label}");
    if let Some(warning) = &state.warning {
        let _ = writeln!(out, "Warning: {warning}");
    }

    let _ = writeln!(out, "\nKey figures");
    let _ = writeln!(out, "- Revenue: {:.2}", metrics.total_revenue);
    let _ = writeln!(
        out,
        "- Bookings: {} confirmed of {} in window",
        metrics.total_bookings,
        metrics.filtered_bookings.len()
    );
    let _ = writeln!(out, "- Nights: {:.1}", metrics.total_nights);
    let _ = writeln!(
        out,
        "- Avg booking value {:.2} | Avg nightly rate {:.2}",
        metrics.avg_booking_value, metrics.avg_nightly_rate
    );
    let _ = writeln!(
        out,
        "- Avg stay {:.1} nights | Avg lead time {:.1} days",
        metrics.avg_length_of_stay_nights, metrics.avg_lead_time_days
    );
    let _ = writeln!(
        out,
        "- Cancellation rate: {:.1}%",
        metrics.cancellation_rate_percent
    );

    if metrics.bookings_by_month.is_empty() {
        let _ = writeln!(out, "\nBookings by month: none");
    } else {
        let _ = writeln!(out, "\nBookings by month");
        for month in &metrics.bookings_by_month {
            let _ = writeln!(out, "- {}: {}", month.month_name, month.booking_count);
        }
    }

    if metrics.revenue_by_channel.is_empty() {
        let _ = writeln!(out, "\nRevenue by channel: none");
    } else {
        let _ = writeln!(out, "\nRevenue by channel");
        for channel in &metrics.revenue_by_channel {
            let _ = writeln!(out, "- {}: {:.2}", channel.channel_name, channel.revenue);
        }
    }

    if let Some(channel) = metrics.top_channel() {
        let _ = writeln!(out, "\nTop channel: {}", channel.channel_name);
    }
    if let Some(month) = metrics.busiest_month() {
        let _ = writeln!(out, "Busiest month: {}", month.month_name);
    }

    if list_bookings {
        let _ = writeln!(out, "\nBookings");
        for booking in &metrics.filtered_bookings {
            let arrival = booking
                .arrival_date()
                .map(|date| date.to_string())
                .unwrap_or_else(|| "?".to_string());
            let _ = writeln!(
                out,
                "- {} | {} | {} | {:.1} nights | {:.2} | {}",
                booking.id,
                booking.guest_name.as_deref().unwrap_or("-"),
                arrival,
                booking.nights(),
                booking.amount(),
                booking.status
            );
        }
    }

    out
}
