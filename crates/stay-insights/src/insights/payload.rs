use crate::analytics::BookingMetrics;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

pub const SYSTEM_INSTRUCTION: &str = "You are a revenue analyst for a vacation-rental host. \
Answer using only the booking data provided. Be concise, quote figures with two decimals, \
and use short markdown bullet lists where they help.";

pub const DEFAULT_QUESTION: &str =
    "Summarize booking performance for this period and suggest two concrete improvements.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Body of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
}

impl InsightRequest {
    /// Builds a prompt that embeds the KPI summary and the filtered bookings.
    /// A blank question asks for a general performance summary.
    pub fn for_question(question: &str, metrics: &BookingMetrics) -> Self {
        let question = match question.trim() {
            "" => DEFAULT_QUESTION,
            trimmed => trimmed,
        };

        let bookings_json =
            serde_json::to_string(&metrics.filtered_bookings).unwrap_or_else(|_| "[]".into());

        let mut prompt = String::new();
        let _ = writeln!(prompt, "Question: {question}");
        prompt.push('\n');
        prompt.push_str(&metrics_digest(metrics));
        let _ = writeln!(
            prompt,
            "\nBookings in range ({} records, JSON):",
            metrics.filtered_bookings.len()
        );
        prompt.push_str(&bookings_json);

        Self {
            contents: vec![Content::text(prompt)],
            system_instruction: Content::text(SYSTEM_INSTRUCTION),
        }
    }

    pub fn prompt_text(&self) -> String {
        self.contents
            .iter()
            .map(Content::joined_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Plain-text KPI digest, one metric per line.
pub fn metrics_digest(metrics: &BookingMetrics) -> String {
    let mut digest = String::from("Summary:\n");
    let _ = writeln!(digest, "- Total revenue: {:.2}", metrics.total_revenue);
    let _ = writeln!(digest, "- Confirmed bookings: {}", metrics.total_bookings);
    let _ = writeln!(digest, "- Nights booked: {:.1}", metrics.total_nights);
    let _ = writeln!(digest, "- Average booking value: {:.2}", metrics.avg_booking_value);
    let _ = writeln!(digest, "- Average nightly rate: {:.2}", metrics.avg_nightly_rate);
    let _ = writeln!(
        digest,
        "- Average length of stay: {:.1} nights",
        metrics.avg_length_of_stay_nights
    );
    let _ = writeln!(digest, "- Average lead time: {:.1} days", metrics.avg_lead_time_days);
    let _ = writeln!(
        digest,
        "- Cancellation rate: {:.1}%",
        metrics.cancellation_rate_percent
    );

    if !metrics.revenue_by_channel.is_empty() {
        let channels = metrics
            .revenue_by_channel
            .iter()
            .map(|entry| format!("{} {:.2}", entry.channel_name, entry.revenue))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(digest, "- Revenue by channel: {channels}");
    }

    if !metrics.bookings_by_month.is_empty() {
        let months = metrics
            .bookings_by_month
            .iter()
            .map(|entry| format!("{} {}", entry.month_name, entry.booking_count))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(digest, "- Bookings by arrival month: {months}");
    }

    digest
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

/// Body returned by `generateContent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl InsightResponse {
    /// Text of the first candidate, or `None` when the model returned nothing.
    pub fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .map(|candidate| candidate.content.joined_text())
            .filter(|text| !text.trim().is_empty())
    }
}
