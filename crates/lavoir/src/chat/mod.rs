//! Prompt orchestration: free-text instructions to dataset changes.
//!
//! A session mediates one request/response cycle at a time between the
//! user and an interpretation backend. The backend is a trait so the HTTP
//! implementation can be swapped for a mock in tests.

mod backend;
mod classify;
pub(crate) mod http;
mod mock;
mod session;

pub use backend::{
    AuthContext, CleanReply, KpiDatum, KpiReply, OperationSummary, PromptBackend, ResponseKind,
};
pub use classify::classify_reply;
pub use http::HttpBackend;
pub use mock::MockBackend;
pub use session::{AssistantReply, ChatTurn, CleaningSession, KpiSession, Role, FAILURE_MARKER};
