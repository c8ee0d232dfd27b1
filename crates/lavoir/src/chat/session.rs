//! Chat sessions: one request/response cycle at a time between the user
//! and the interpretation backend.
//!
//! Invariants, per chat surface:
//! - single-flight: while a submission is unresolved, another submission
//!   is rejected without touching the transcript or the network;
//! - the transcript gains the user turn immediately on submission and
//!   exactly one assistant turn on resolution, success or failure;
//! - failures leave the dataset untouched; a successful action replaces
//!   it wholesale, never merging partial updates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{LavoirError, Result};

use super::backend::{
    AuthContext, KpiDatum, OperationSummary, PromptBackend, ResponseKind,
};
use super::classify::classify_reply;

/// Prefix of assistant turns that report a failure.
pub const FAILURE_MARKER: &str = "error:";

/// Message shown when the KPI flow is used without data loaded.
const NO_KPI_DATA_MESSAGE: &str = "No data available to generate KPI.";

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Structured payload attached to an assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    pub kind: ResponseKind,
    #[serde(default)]
    pub requires_code: bool,
    #[serde(default)]
    pub summary: Option<OperationSummary>,
    #[serde(default)]
    pub kpi_data: Option<Vec<KpiDatum>>,
}

/// One line of the visible chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub reply: Option<AssistantReply>,
}

impl ChatTurn {
    fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            reply: None,
        }
    }

    fn assistant(content: impl Into<String>, reply: Option<AssistantReply>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            reply,
        }
    }
}

/// Clears the thinking flag when the cycle resolves, whatever the path out.
struct Flight<'a>(&'a AtomicBool);

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

struct SurfaceState {
    dataset: Option<Dataset>,
    transcript: Vec<ChatTurn>,
}

/// Chat surface for the cleaning flow.
pub struct CleaningSession {
    backend: Arc<dyn PromptBackend>,
    state: Mutex<SurfaceState>,
    thinking: AtomicBool,
}

impl CleaningSession {
    /// Create a session against the given backend, with no dataset loaded.
    pub fn new(backend: Arc<dyn PromptBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(SurfaceState {
                dataset: None,
                transcript: Vec::new(),
            }),
            thinking: AtomicBool::new(false),
        }
    }

    /// Load (or replace) the working dataset.
    pub fn load_dataset(&self, dataset: Dataset) {
        self.state.lock().unwrap().dataset = Some(dataset);
    }

    /// Snapshot of the current dataset.
    pub fn dataset(&self) -> Option<Dataset> {
        self.state.lock().unwrap().dataset.clone()
    }

    /// Snapshot of the transcript.
    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.state.lock().unwrap().transcript.clone()
    }

    /// True while a submission is unresolved.
    pub fn is_thinking(&self) -> bool {
        self.thinking.load(Ordering::SeqCst)
    }

    /// Submit a free-text instruction.
    ///
    /// Returns the assistant reply; the transcript and dataset are updated
    /// as side effects. `RequestInFlight` is returned, with no other
    /// effect, when another submission is unresolved.
    pub fn submit(&self, prompt: &str, auth: &AuthContext) -> Result<AssistantReply> {
        if self.thinking.swap(true, Ordering::SeqCst) {
            return Err(LavoirError::RequestInFlight);
        }
        let _flight = Flight(&self.thinking);

        self.state
            .lock()
            .unwrap()
            .transcript
            .push(ChatTurn::user(prompt));

        match self.process(prompt, auth) {
            Ok((message, reply, dataset)) => {
                let mut state = self.state.lock().unwrap();
                if let Some(dataset) = dataset {
                    state.dataset = Some(dataset);
                }
                state
                    .transcript
                    .push(ChatTurn::assistant(message, Some(reply.clone())));
                Ok(reply)
            }
            Err(e) => {
                warn!("cleaning prompt failed: {e}");
                self.state
                    .lock()
                    .unwrap()
                    .transcript
                    .push(ChatTurn::assistant(format!("{FAILURE_MARKER} {e}"), None));
                Err(e)
            }
        }
    }

    /// The fallible part of a cycle. Returns the assistant message, the
    /// structured reply, and the replacement dataset when the backend
    /// performed an action.
    fn process(
        &self,
        prompt: &str,
        auth: &AuthContext,
    ) -> Result<(String, AssistantReply, Option<Dataset>)> {
        auth.bearer()?;

        let dataset = self
            .state
            .lock()
            .unwrap()
            .dataset
            .clone()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| {
                LavoirError::EmptyDataset("no dataset loaded to apply the instruction to".to_string())
            })?;

        let rows_before = dataset.row_count();
        let reply = self
            .backend
            .quick_process(prompt, &dataset.rows, auth)?;

        let kind = classify_reply(&reply.message);
        debug!(
            "backend '{}' replied ({:?}): {} row(s)",
            self.backend.name(),
            kind,
            reply.data.len()
        );

        let (summary, replacement) = match kind {
            ResponseKind::Conversation => (None, None),
            ResponseKind::Action => (
                Some(OperationSummary::from_counts(rows_before, reply.data.len())),
                Some(Dataset::from_records(reply.data)),
            ),
        };

        let assistant = AssistantReply {
            kind,
            requires_code: kind == ResponseKind::Action,
            summary,
            kpi_data: None,
        };

        Ok((reply.message, assistant, replacement))
    }
}

/// Chat surface for the KPI flow. Holds its own dataset and transcript;
/// KPI replies are passed through to the caller, never folded into the
/// dataset.
pub struct KpiSession {
    backend: Arc<dyn PromptBackend>,
    state: Mutex<SurfaceState>,
    thinking: AtomicBool,
}

impl KpiSession {
    /// Create a session against the given backend.
    pub fn new(backend: Arc<dyn PromptBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(SurfaceState {
                dataset: None,
                transcript: Vec::new(),
            }),
            thinking: AtomicBool::new(false),
        }
    }

    /// Load (or replace) the dashboard dataset.
    pub fn load_dataset(&self, dataset: Dataset) {
        self.state.lock().unwrap().dataset = Some(dataset);
    }

    /// Snapshot of the transcript.
    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.state.lock().unwrap().transcript.clone()
    }

    /// True while a submission is unresolved.
    pub fn is_thinking(&self) -> bool {
        self.thinking.load(Ordering::SeqCst)
    }

    /// Submit a KPI prompt.
    ///
    /// A missing dataset is not a hard error here: the assistant answers
    /// with a message and the cycle resolves normally.
    pub fn submit(&self, prompt: &str, auth: &AuthContext) -> Result<AssistantReply> {
        if self.thinking.swap(true, Ordering::SeqCst) {
            return Err(LavoirError::RequestInFlight);
        }
        let _flight = Flight(&self.thinking);

        self.state
            .lock()
            .unwrap()
            .transcript
            .push(ChatTurn::user(prompt));

        let dataset = self
            .state
            .lock()
            .unwrap()
            .dataset
            .clone()
            .filter(|d| !d.is_empty());

        let Some(dataset) = dataset else {
            let reply = AssistantReply {
                kind: ResponseKind::Conversation,
                requires_code: false,
                summary: None,
                kpi_data: None,
            };
            self.state.lock().unwrap().transcript.push(ChatTurn::assistant(
                NO_KPI_DATA_MESSAGE,
                Some(reply.clone()),
            ));
            return Ok(reply);
        };

        match self.process(prompt, &dataset, auth) {
            Ok((message, reply)) => {
                self.state
                    .lock()
                    .unwrap()
                    .transcript
                    .push(ChatTurn::assistant(message, Some(reply.clone())));
                Ok(reply)
            }
            Err(e) => {
                warn!("kpi prompt failed: {e}");
                self.state
                    .lock()
                    .unwrap()
                    .transcript
                    .push(ChatTurn::assistant(format!("{FAILURE_MARKER} {e}"), None));
                Err(e)
            }
        }
    }

    fn process(
        &self,
        prompt: &str,
        dataset: &Dataset,
        auth: &AuthContext,
    ) -> Result<(String, AssistantReply)> {
        auth.bearer()?;

        let reply = self.backend.kpi_query(prompt, &dataset.rows, auth)?;
        debug!(
            "backend '{}' replied ({:?}): kpi_data={}",
            self.backend.name(),
            reply.kind,
            reply.kpi_data.as_ref().map(Vec::len).unwrap_or(0)
        );

        let assistant = AssistantReply {
            kind: reply.kind,
            requires_code: reply.requires_code,
            summary: reply.results,
            kpi_data: reply.kpi_data,
        };

        Ok((reply.message, assistant))
    }
}
