use crate::analytics::DateRange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardView {
    #[default]
    Overview,
    Bookings,
    Insights,
}

impl DashboardView {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Bookings => "Bookings",
            Self::Insights => "Insights",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Showing the sample set because the live fetch failed.
    Degraded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    #[default]
    Idle,
    Pending,
    Answered,
    Failed,
}

/// Discrete transitions of the dashboard view state.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    LoadStarted,
    FeedLoaded { warning: Option<String> },
    RangeChanged(DateRange),
    ViewSelected(DashboardView),
    QuestionEdited(String),
    InsightRequested,
    InsightAnswered { revision: u64, answer: String },
    InsightFailed { revision: u64, message: String },
}

/// Everything the dashboard shows apart from the bookings themselves.
///
/// `revision` increases whenever the inputs of an insight change (range or
/// question). Answers tagged with an older revision are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub load: LoadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub view: DashboardView,
    pub range: DateRange,
    pub question: String,
    pub insight: InsightStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight_error: Option<String>,
    pub revision: u64,
}

impl DashboardState {
    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::LoadStarted => {
                self.load = LoadStatus::Loading;
                self.warning = None;
            }
            DashboardEvent::FeedLoaded { warning } => {
                self.load = if warning.is_some() {
                    LoadStatus::Degraded
                } else {
                    LoadStatus::Ready
                };
                self.warning = warning;
                self.invalidate_insight();
            }
            DashboardEvent::RangeChanged(range) => {
                if self.range != range {
                    self.range = range;
                    self.invalidate_insight();
                }
            }
            DashboardEvent::ViewSelected(view) => self.view = view,
            DashboardEvent::QuestionEdited(question) => {
                if self.question != question {
                    self.question = question;
                    self.revision += 1;
                }
            }
            DashboardEvent::InsightRequested => {
                self.insight = InsightStatus::Pending;
                self.answer = None;
                self.insight_error = None;
            }
            DashboardEvent::InsightAnswered { revision, answer } => {
                if self.accepts(revision) {
                    self.insight = InsightStatus::Answered;
                    self.answer = Some(answer);
                }
            }
            DashboardEvent::InsightFailed { revision, message } => {
                if self.accepts(revision) {
                    self.insight = InsightStatus::Failed;
                    self.insight_error = Some(message);
                }
            }
        }
    }

    pub fn is_showing_sample(&self) -> bool {
        self.load == LoadStatus::Degraded
    }

    fn accepts(&self, revision: u64) -> bool {
        revision == self.revision && self.insight == InsightStatus::Pending
    }

    fn invalidate_insight(&mut self) {
        self.revision += 1;
        self.insight = InsightStatus::Idle;
        self.answer = None;
        self.insight_error = None;
    }
}
