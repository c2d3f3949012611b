// src/progress.rs
/// Stage-by-stage narration of long-running lookups (account resolution,
/// rank lookups). Frontends implement this to tell a person what is going on;
/// the engine never renders anything itself.
///
/// Per logical stage the engine makes at most one terminal call (`complete` or
/// `fail`), in stage order, and never finishes the same stage twice. `update`
/// is narration inside a stage, not a stage event.
pub trait ProgressSink {
    /// Free-form status line for human eyes.
    fn update(&mut self, _msg: &str) {}

    /// The current stage finished, optionally saying what was decided.
    fn complete(&mut self, _msg: Option<&str>) {}

    /// The current stage failed.
    fn fail(&mut self, _msg: Option<&str>) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl ProgressSink for NullProgress {}

/// Forwards every event to the `log` facade.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn update(&mut self, msg: &str) {
        log::info!("{msg}");
    }
    fn complete(&mut self, msg: Option<&str>) {
        log::info!("done: {}", msg.unwrap_or("-"));
    }
    fn fail(&mut self, msg: Option<&str>) {
        log::warn!("failed: {}", msg.unwrap_or("-"));
    }
}

/// Records every event; handy when a caller wants the whole story at the end.
/// The integration tests assert on it; host applications may use it to replay a lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingProgress {
    pub events: Vec<ProgressEvent>,
}

/// One call recorded by [`RecordingProgress`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    Update(String),
    Complete(Option<String>),
    Fail(Option<String>),
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of finished stages, successful or not.
    pub fn finished_stages(&self) -> usize {
        self.events
            .iter()
            .filter(|e| !matches!(e, ProgressEvent::Update(_)))
            .count()
    }

    pub fn last_message(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            ProgressEvent::Update(m) => Some(m.as_str()),
            ProgressEvent::Complete(m) | ProgressEvent::Fail(m) => m.as_deref(),
        })
    }
}

impl ProgressSink for RecordingProgress {
    fn update(&mut self, msg: &str) {
        self.events.push(ProgressEvent::Update(s!(msg)));
    }
    fn complete(&mut self, msg: Option<&str>) {
        self.events.push(ProgressEvent::Complete(msg.map(String::from)));
    }
    fn fail(&mut self, msg: Option<&str>) {
        self.events.push(ProgressEvent::Fail(msg.map(String::from)));
    }
}
