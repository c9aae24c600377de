//! Custom Axum extractors.

pub mod issue_body;
pub mod validated_json;

pub use issue_body::IssueBody;
pub use validated_json::ValidatedJson;
