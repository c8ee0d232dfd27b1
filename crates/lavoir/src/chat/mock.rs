//! Mock prompt backend for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use crate::dataset::Record;
use crate::error::{LavoirError, Result};

use super::backend::{AuthContext, CleanReply, KpiReply, PromptBackend};

enum Scripted<T> {
    Reply(T),
    Failure(String),
}

/// Backend returning scripted replies, in order. With an empty script the
/// cleaning flow echoes the records back unchanged and the KPI flow
/// returns a bare action message.
pub struct MockBackend {
    clean_script: Mutex<VecDeque<Scripted<CleanReply>>>,
    kpi_script: Mutex<VecDeque<Scripted<KpiReply>>>,
    /// When set, every call waits on this barrier before replying; lets
    /// tests hold a request in flight.
    gate: Option<Arc<Barrier>>,
    calls: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend with an empty script.
    pub fn new() -> Self {
        Self {
            clean_script: Mutex::new(VecDeque::new()),
            kpi_script: Mutex::new(VecDeque::new()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Block every call on `gate` until the test releases it.
    pub fn with_gate(mut self, gate: Arc<Barrier>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Queue a cleaning reply.
    pub fn push_clean_reply(&self, message: impl Into<String>, data: Vec<Record>) {
        self.clean_script
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(CleanReply {
                message: message.into(),
                data,
            }));
    }

    /// Queue a cleaning failure.
    pub fn push_clean_failure(&self, message: impl Into<String>) {
        self.clean_script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(message.into()));
    }

    /// Queue a KPI reply.
    pub fn push_kpi_reply(&self, reply: KpiReply) {
        self.kpi_script
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(reply));
    }

    /// Queue a KPI failure.
    pub fn push_kpi_failure(&self, message: impl Into<String>) {
        self.kpi_script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(message.into()));
    }

    /// Total number of backend calls issued.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref gate) = self.gate {
            gate.wait();
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBackend for MockBackend {
    fn quick_process(
        &self,
        _prompt: &str,
        records: &[Record],
        _auth: &AuthContext,
    ) -> Result<CleanReply> {
        self.record_call();
        match self.clean_script.lock().unwrap().pop_front() {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Failure(message)) => Err(LavoirError::RequestFailed(message)),
            None => Ok(CleanReply {
                message: "No changes applied".to_string(),
                data: records.to_vec(),
            }),
        }
    }

    fn kpi_query(
        &self,
        _prompt: &str,
        _records: &[Record],
        _auth: &AuthContext,
    ) -> Result<KpiReply> {
        self.record_call();
        match self.kpi_script.lock().unwrap().pop_front() {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Failure(message)) => Err(LavoirError::RequestFailed(message)),
            None => Ok(KpiReply {
                kind: Default::default(),
                requires_code: false,
                message: "No KPI computed".to_string(),
                results: None,
                kpi_data: None,
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
