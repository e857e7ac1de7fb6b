//! Reporting sink handed to the project registry.
//!
//! Registry events (job discovery, parses, dependency cycles) go through a
//! [`ReportSink`] chosen by the caller instead of a global verbosity switch.

use std::sync::Mutex;

use serde::Serialize;
use tracing::Level;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReportEvent {
    JobDiscovered {
        name: String,
        version: f64,
        id: String,
    },
    JobParsed {
        name: String,
        nodes: usize,
        children: usize,
    },
    /// A traversal re-entered a job already on its path. `path` ends with that job.
    CycleDetected { path: Vec<String> },
    /// A job invokes a job that is not in the repository.
    UnknownChild { parent: String, child: String },
}

impl ReportEvent {
    pub fn level(&self) -> Level {
        match self {
            ReportEvent::JobDiscovered { .. } => Level::TRACE,
            ReportEvent::JobParsed { .. } => Level::DEBUG,
            ReportEvent::CycleDetected { .. } | ReportEvent::UnknownChild { .. } => Level::WARN,
        }
    }
}

impl std::fmt::Display for ReportEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportEvent::JobDiscovered { name, version, id } => {
                write!(f, "Initialized job {} v{} ({})", name, version, id)
            }
            ReportEvent::JobParsed {
                name,
                nodes,
                children,
            } => write!(
                f,
                "Parsed job {} with {} components and {} sub jobs",
                name, nodes, children
            ),
            ReportEvent::CycleDetected { path } => {
                write!(f, "Dependency cycle: {}", path.join(" -> "))
            }
            ReportEvent::UnknownChild { parent, child } => {
                write!(f, "Job {} invokes unknown job {}", parent, child)
            }
        }
    }
}

pub trait ReportSink: Send + Sync {
    fn report(&self, event: ReportEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ReportSink for NoopSink {
    fn report(&self, _event: ReportEvent) {}
}

/// Forwards events to `tracing`, dropping those more verbose than `max_level`.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    max_level: Level,
}

impl TracingSink {
    pub fn new(max_level: Level) -> Self {
        TracingSink { max_level }
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        TracingSink::new(Level::WARN)
    }
}

impl ReportSink for TracingSink {
    fn report(&self, event: ReportEvent) {
        let level = event.level();
        if !self.enabled(level) {
            return;
        }
        match level {
            Level::ERROR => tracing::error!("{}", event),
            Level::WARN => tracing::warn!("{}", event),
            Level::INFO => tracing::info!("{}", event),
            Level::DEBUG => tracing::debug!("{}", event),
            _ => tracing::trace!("{}", event),
        }
    }
}

/// Keeps every event; used to inspect what a traversal reported.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ReportEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn cycles(&self) -> Vec<Vec<String>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReportEvent::CycleDetected { path } => Some(path),
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for CollectingSink {
    fn report(&self, event: ReportEvent) {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_sink_filters_by_level() {
        let sink = TracingSink::new(Level::WARN);
        assert!(sink.enabled(Level::WARN));
        assert!(sink.enabled(Level::ERROR));
        assert!(!sink.enabled(Level::DEBUG));
        assert!(TracingSink::new(Level::TRACE).enabled(Level::DEBUG));
    }

    #[test]
    fn cycle_event_display() {
        let event = ReportEvent::CycleDetected {
            path: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(event.to_string(), "Dependency cycle: A -> B -> A");
        assert_eq!(event.level(), Level::WARN);
    }

    #[test]
    fn collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        sink.report(ReportEvent::UnknownChild {
            parent: "A".into(),
            child: "X".into(),
        });
        sink.report(ReportEvent::CycleDetected {
            path: vec!["A".into(), "A".into()],
        });
        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.cycles(), vec![vec!["A".to_string(), "A".to_string()]]);
    }
}
