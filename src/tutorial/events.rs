//! Tutorial event log
//!
//! The sequencer emits a timestamped event for every transition. Consumers
//! (the Bevy forwarding system, the scenario runner) drain pending events;
//! drained events are kept as processed history for assertions and debugging.

use super::gates::MoveDirection;
use super::steps::StepType;

/// Everything the sequencer reports
#[derive(Debug, Clone, PartialEq)]
pub enum TutorialEvent {
    Started { steps: usize },
    StepEntered { index: usize, step_type: StepType },
    InputSatisfied { index: usize, step_type: StepType },
    StepTimedOut { index: usize, step_type: StepType },
    DemoMoveStarted { direction: MoveDirection },
    DemoMoveFinished,
    DemoShotFired,
    Skipped { index: usize },
    Completed,
}

impl TutorialEvent {
    /// Short name used by scenario expectations
    pub fn name(&self) -> &'static str {
        match self {
            TutorialEvent::Started { .. } => "Started",
            TutorialEvent::StepEntered { .. } => "StepEntered",
            TutorialEvent::InputSatisfied { .. } => "InputSatisfied",
            TutorialEvent::StepTimedOut { .. } => "StepTimedOut",
            TutorialEvent::DemoMoveStarted { .. } => "DemoMoveStarted",
            TutorialEvent::DemoMoveFinished => "DemoMoveFinished",
            TutorialEvent::DemoShotFired => "DemoShotFired",
            TutorialEvent::Skipped { .. } => "Skipped",
            TutorialEvent::Completed => "Completed",
        }
    }

    /// Step index the event refers to, if any
    pub fn step_index(&self) -> Option<usize> {
        match self {
            TutorialEvent::StepEntered { index, .. }
            | TutorialEvent::InputSatisfied { index, .. }
            | TutorialEvent::StepTimedOut { index, .. }
            | TutorialEvent::Skipped { index } => Some(*index),
            _ => None,
        }
    }
}

impl std::fmt::Display for TutorialEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TutorialEvent::Started { steps } => write!(f, "Started ({} steps)", steps),
            TutorialEvent::StepEntered { index, step_type } => {
                write!(f, "StepEntered #{} {}", index, step_type)
            }
            TutorialEvent::InputSatisfied { index, step_type } => {
                write!(f, "InputSatisfied #{} {}", index, step_type)
            }
            TutorialEvent::StepTimedOut { index, step_type } => {
                write!(f, "StepTimedOut #{} {}", index, step_type)
            }
            TutorialEvent::DemoMoveStarted { direction } => {
                write!(f, "DemoMoveStarted {:?}", direction)
            }
            TutorialEvent::Skipped { index } => write!(f, "Skipped at #{}", index),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Event stamped with the logical time it happened
#[derive(Debug, Clone, PartialEq)]
pub struct TimedTutorialEvent {
    /// Seconds on the sequencer clock
    pub time: f32,
    pub event: TutorialEvent,
}

#[derive(Debug, Clone)]
pub struct TutorialEventLog {
    /// Events emitted since the last drain
    pending: Vec<TimedTutorialEvent>,

    /// Events that have been drained
    processed: Vec<TimedTutorialEvent>,

    enabled: bool,
}

impl Default for TutorialEventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TutorialEventLog {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            processed: Vec::new(),
            enabled: true,
        }
    }

    /// Log that drops everything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    pub fn emit(&mut self, time: f32, event: TutorialEvent) {
        if !self.enabled {
            return;
        }
        self.pending.push(TimedTutorialEvent { time, event });
    }

    /// Pending events without consuming them
    pub fn peek(&self) -> &[TimedTutorialEvent] {
        &self.pending
    }

    /// Drain pending events, moving them to processed
    pub fn drain(&mut self) -> Vec<TimedTutorialEvent> {
        let events = std::mem::take(&mut self.pending);
        self.processed.extend(events.iter().cloned());
        events
    }

    pub fn processed(&self) -> &[TimedTutorialEvent] {
        &self.processed
    }

    pub fn clear_processed(&mut self) {
        self.processed.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Processed and pending events, oldest first
    pub fn history(&self) -> impl Iterator<Item = &TimedTutorialEvent> {
        self.processed.iter().chain(self.pending.iter())
    }

    /// Number of recorded events matching `predicate`, processed or pending
    pub fn count(&self, predicate: impl Fn(&TutorialEvent) -> bool) -> usize {
        self.history().filter(|e| predicate(&e.event)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_drain() {
        let mut log = TutorialEventLog::new();
        log.emit(1.5, TutorialEvent::Started { steps: 5 });
        log.emit(
            1.5,
            TutorialEvent::StepEntered {
                index: 0,
                step_type: StepType::Movement,
            },
        );

        assert_eq!(log.pending_count(), 2);
        assert!(log.has_pending());

        let events = log.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].time, 1.5);
        assert_eq!(log.pending_count(), 0);
        assert_eq!(log.processed().len(), 2);
        assert_eq!(log.count(|e| matches!(e, TutorialEvent::StepEntered { .. })), 1);
    }

    #[test]
    fn test_disabled_log() {
        let mut log = TutorialEventLog::disabled();
        log.emit(0.0, TutorialEvent::Completed);
        assert_eq!(log.pending_count(), 0);
        assert!(!log.is_enabled());
    }

    #[test]
    fn test_event_names_and_indices() {
        let skipped = TutorialEvent::Skipped { index: 3 };
        assert_eq!(skipped.name(), "Skipped");
        assert_eq!(skipped.step_index(), Some(3));
        assert_eq!(TutorialEvent::Completed.step_index(), None);
        assert_eq!(skipped.to_string(), "Skipped at #3");
    }
}
