use super::state::{DashboardEvent, DashboardState, DashboardView};
use crate::analytics::{summarize, BookingMetrics, BookingRecord, DateRange};
use crate::insights::{render_markdown, InsightRequest};
use crate::sources::BookingFeed;

/// Booking snapshot plus the view state driving what is derived from it.
///
/// Metrics are recomputed from the snapshot on every call; nothing is cached
/// across range changes.
#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    state: DashboardState,
    bookings: Vec<BookingRecord>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn bookings(&self) -> &[BookingRecord] {
        &self.bookings
    }

    pub fn begin_load(&mut self) {
        self.state.apply(DashboardEvent::LoadStarted);
    }

    pub fn load_feed(&mut self, feed: BookingFeed) {
        let warning = feed.warning().map(str::to_string);
        self.bookings = feed.into_bookings();
        self.state.apply(DashboardEvent::FeedLoaded { warning });
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.state.apply(DashboardEvent::RangeChanged(range));
    }

    pub fn select_view(&mut self, view: DashboardView) {
        self.state.apply(DashboardEvent::ViewSelected(view));
    }

    pub fn metrics(&self) -> BookingMetrics {
        summarize(&self.bookings, &self.state.range)
    }

    /// Records `question`, marks an insight as pending, and returns the request
    /// together with the revision its answer must be tagged with.
    pub fn request_insight(&mut self, question: &str) -> (u64, InsightRequest) {
        self.state
            .apply(DashboardEvent::QuestionEdited(question.trim().to_string()));
        self.state.apply(DashboardEvent::InsightRequested);
        let request = InsightRequest::for_question(&self.state.question, &self.metrics());
        (self.state.revision, request)
    }

    pub fn resolve_insight(&mut self, revision: u64, outcome: Result<String, String>) {
        let event = match outcome {
            Ok(answer) => DashboardEvent::InsightAnswered { revision, answer },
            Err(message) => DashboardEvent::InsightFailed { revision, message },
        };
        self.state.apply(event);
    }

    pub fn answer_html(&self) -> Option<String> {
        self.state.answer.as_deref().map(render_markdown)
    }
}
