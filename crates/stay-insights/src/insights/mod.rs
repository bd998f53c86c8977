//! Natural-language answers over the filtered booking snapshot.

mod client;
pub mod markdown;
mod payload;

pub use client::InsightClient;
pub use markdown::render_markdown;
pub use payload::{
    metrics_digest, Candidate, Content, InsightRequest, InsightResponse, Part, DEFAULT_QUESTION,
    SYSTEM_INSTRUCTION,
};
