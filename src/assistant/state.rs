use std::fmt;

/// Lifecycle of one workflow's request.
///
/// `Succeeded` and `Failed` are settled: a new submit is accepted from
/// them just as from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl RequestState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, RequestState::Submitting)
    }
}

/// The two independent workflows on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    Symptoms,
    Report,
}

impl Workflow {
    /// User-facing message for a failed request.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Workflow::Symptoms => "Failed to analyze symptoms. Please try again.",
            Workflow::Report => "Failed to process report. Please try again.",
        }
    }

    fn index(self) -> usize {
        match self {
            Workflow::Symptoms => 0,
            Workflow::Report => 1,
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workflow::Symptoms => f.write_str("symptoms"),
            Workflow::Report => f.write_str("report"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Notice {
    message: String,
    seq: u64,
}

/// Per-workflow error messages.
///
/// Each workflow only ever touches its own slot. The notification area
/// shows whichever message was written most recently.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    slots: [Option<Notice>; 2],
    seq: u64,
}

impl Notices {
    pub fn set(&mut self, workflow: Workflow, message: impl Into<String>) {
        self.seq += 1;
        self.slots[workflow.index()] = Some(Notice {
            message: message.into(),
            seq: self.seq,
        });
    }

    pub fn clear(&mut self, workflow: Workflow) {
        self.slots[workflow.index()] = None;
    }

    pub fn get(&self, workflow: Workflow) -> Option<&str> {
        self.slots[workflow.index()]
            .as_ref()
            .map(|notice| notice.message.as_str())
    }

    /// The most recently written message across both workflows.
    pub fn latest(&self) -> Option<&str> {
        self.slots
            .iter()
            .flatten()
            .max_by_key(|notice| notice.seq)
            .map(|notice| notice.message.as_str())
    }
}
