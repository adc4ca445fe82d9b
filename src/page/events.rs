//! Page Events
//!
//! Bubbling notifications dispatched at page nodes. Listeners stand in for
//! page scripts; a listener that prevents default cancels a cancelable event.

use serde::{Deserialize, Serialize};

use super::dom::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Input,
    BeforeInput,
}

/// A page script watching for events at (or below) `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub target: NodeId,
    pub kind: EventKind,
    #[serde(default)]
    pub prevent_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub input_type: Option<String>,
    pub data: Option<String>,
    pub cancelable: bool,
}

impl Event {
    /// Non-cancelable "value changed" notification
    pub fn input() -> Self {
        Self {
            kind: EventKind::Input,
            input_type: None,
            data: None,
            cancelable: false,
        }
    }

    /// Cancelable "about to change" notification carrying the new text
    pub fn before_input(input_type: &str, data: &str) -> Self {
        Self {
            kind: EventKind::BeforeInput,
            input_type: Some(input_type.to_string()),
            data: Some(data.to_string()),
            cancelable: true,
        }
    }
}

/// Log entry for an event that reached the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchedEvent {
    pub target: NodeId,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    pub canceled: bool,
}

impl Document {
    pub fn add_listener(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    /// Dispatch a bubbling event at `target`.
    ///
    /// Returns `false` when a listener canceled it, like `dispatchEvent`.
    pub fn dispatch_event(&mut self, target: NodeId, event: Event) -> bool {
        let canceled = event.cancelable
            && self.listeners.iter().any(|l| {
                l.kind == event.kind
                    && l.prevent_default
                    && self.is_inclusive_ancestor(l.target, target)
            });

        self.events.push(DispatchedEvent {
            target,
            kind: event.kind,
            input_type: event.input_type,
            data: event.data,
            canceled,
        });
        !canceled
    }
}
