//! Page Model
//!
//! An explicit snapshot of the host page: its document, the focused
//! element and the current text selection. Capture and replacement take
//! this as input instead of reading ambient browser state.

pub mod dom;
pub mod events;
pub mod range;

pub use dom::{ControlState, Document, DomError, Element, NodeId};
pub use events::{DispatchedEvent, Event, EventKind, Listener};
pub use range::{BoundaryPoint, Range};

use serde::{Deserialize, Serialize};

/// The page-level text selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub ranges: Vec<Range>,
}

impl Selection {
    pub fn new(range: Range) -> Self {
        Self {
            ranges: vec![range],
        }
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn first_range(&self) -> Option<Range> {
        self.ranges.first().copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub document: Document,
    #[serde(default)]
    pub focus: Option<NodeId>,
    #[serde(default)]
    pub selection: Selection,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            focus: None,
            selection: Selection::default(),
        }
    }

    /// Focused element, if it is still in the document
    pub fn active_element(&self) -> Option<NodeId> {
        self.focus.filter(|id| self.document.is_attached(*id))
    }

    pub fn set_focus(&mut self, id: NodeId) {
        self.focus = Some(id);
    }

    pub fn select(&mut self, range: Range) {
        self.selection = Selection::new(range);
    }

    /// Select chars `[start, end)` inside a form control and focus it
    pub fn select_in_control(&mut self, id: NodeId, start: usize, end: usize) {
        if let Some(control) = self
            .document
            .element_mut(id)
            .and_then(|el| el.control.as_mut())
        {
            control.selection_start = start;
            control.selection_end = end;
        }
        self.focus = Some(id);
    }

    /// String form of the selection (text of its first usable range)
    pub fn selection_text(&self) -> String {
        self.selection
            .first_range()
            .filter(|range| self.document.is_valid_range(range))
            .map(|range| self.document.range_text(&range))
            .unwrap_or_default()
    }
}
