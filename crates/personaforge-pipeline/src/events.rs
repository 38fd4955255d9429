//! Pipeline progress events
//!
//! Observability hook for callers: the orchestrator emits an event at every
//! significant transition and registered handlers receive them synchronously.
//! Handlers must be cheap and must not panic; they run on pipeline tasks.

use serde::Serialize;

/// One observable pipeline transition.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    Started {
        speakers: usize,
    },
    SpeakerStarted {
        speaker: String,
    },
    PersonaGenerated {
        speaker: String,
        traits: usize,
        evidence_items: usize,
    },
    SpeakerFailed {
        speaker: String,
        reason: String,
    },
    QualityGateApplied {
        speaker: String,
        regenerated_traits: usize,
    },
    PersonasDeduplicated {
        before: usize,
        after: usize,
    },
    Completed {
        personas: usize,
    },
}

pub type EventHandler = Box<dyn Fn(&PipelineEvent) + Send + Sync>;

/// Fan-out of events to registered handlers.
#[derive(Default)]
pub struct EventEmitter {
    handlers: Vec<EventHandler>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: EventHandler) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: PipelineEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_events_reach_every_handler() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut emitter = EventEmitter::new();
        for _ in 0..2 {
            let count = Arc::clone(&count);
            emitter.register(Box::new(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            }));
        }
        emitter.emit(PipelineEvent::Started { speakers: 3 });
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(PipelineEvent::SpeakerStarted {
            speaker: "Maria".to_string(),
        })
        .unwrap();
        assert_eq!(json["event"], "speaker_started");
        assert_eq!(json["speaker"], "Maria");
    }
}
