//! View state for the booking dashboard, kept apart from rendering.

mod session;
mod state;

pub use session::DashboardSession;
pub use state::{DashboardEvent, DashboardState, DashboardView, InsightStatus, LoadStatus};
