//! Selection Replacement
//!
//! Consumes a [`SelectionDescriptor`] and writes the rewritten text back.
//! The token attribute and marker spans are owned by guards, so they leave
//! the page on every path out of a replacement.

use tracing::{debug, warn};

use super::{SelectionDescriptor, TOKEN_ATTRIBUTE};
use crate::page::dom::byte_index;
use crate::page::{BoundaryPoint, Document, Event, NodeId, Page, Range, Selection};

/// `inputType` of the cancelable notification sent before inserting text
pub const REPLACEMENT_INPUT_TYPE: &str = "insertReplacementText";

/// Replace the captured selection with `replacement`.
///
/// Missing targets (field gone, markers removed) make this a no-op apart
/// from cleanup.
pub fn replace(page: &mut Page, descriptor: SelectionDescriptor, replacement: &str) {
    match descriptor {
        SelectionDescriptor::None => {}
        SelectionDescriptor::Field {
            token, start, end, ..
        } => replace_field(page, &token, start, end, replacement),
        SelectionDescriptor::Content {
            start_marker,
            end_marker,
            ..
        } => replace_content(page, &start_marker, &end_marker, replacement),
    }
}

/// Drop a descriptor without replacing anything, removing its tags
pub fn abandon(page: &mut Page, descriptor: SelectionDescriptor) {
    match descriptor {
        SelectionDescriptor::None => {}
        SelectionDescriptor::Field { token, .. } => {
            if let Some(field) = page.document.query_attribute(TOKEN_ATTRIBUTE, &token) {
                page.document.remove_attribute(field, TOKEN_ATTRIBUTE);
            }
        }
        SelectionDescriptor::Content {
            start_marker,
            end_marker,
            ..
        } => {
            drop(MarkerGuard {
                doc: &mut page.document,
                ids: [start_marker.as_str(), end_marker.as_str()],
            });
        }
    }
    debug!("Abandoned captured selection");
}

/// Removes the correlation token from a field when dropped
struct TokenGuard<'a> {
    doc: &'a mut Document,
    field: NodeId,
}

impl Drop for TokenGuard<'_> {
    fn drop(&mut self) {
        self.doc.remove_attribute(self.field, TOKEN_ATTRIBUTE);
    }
}

/// Removes both marker spans when dropped
struct MarkerGuard<'a> {
    doc: &'a mut Document,
    ids: [&'a str; 2],
}

impl Drop for MarkerGuard<'_> {
    fn drop(&mut self) {
        for id in self.ids {
            while let Some(marker) = self.doc.get_element_by_id(id) {
                self.doc.remove(marker);
            }
        }
    }
}

/// `value` with chars `[start, end)` replaced; offsets clamp to the value
fn splice(value: &str, start: usize, end: usize, replacement: &str) -> String {
    let from = byte_index(value, start);
    let to = byte_index(value, end.max(start));
    format!("{}{}{}", &value[..from], replacement, &value[to..])
}

fn replace_field(page: &mut Page, token: &str, start: usize, end: usize, replacement: &str) {
    let Some(field) = page.document.query_attribute(TOKEN_ATTRIBUTE, token) else {
        debug!("Field {} is gone, nothing to replace", token);
        return;
    };

    {
        let mut guard = TokenGuard {
            doc: &mut page.document,
            field,
        };
        let Some(control) = guard
            .doc
            .element_mut(field)
            .and_then(|el| el.control.as_mut())
        else {
            return;
        };
        let value = splice(&control.value, start, end, replacement);
        let length = value.chars().count();
        let caret = (start + replacement.chars().count()).min(length);
        control.value = value;
        control.selection_start = caret;
        control.selection_end = caret;
    }

    page.document.dispatch_event(field, Event::input());
    debug!("Replaced field selection ({})", token);
}

fn replace_content(page: &mut Page, start_id: &str, end_id: &str, replacement: &str) {
    let Some((container, caret)) =
        splice_between_markers(&mut page.document, start_id, end_id, replacement)
    else {
        return;
    };
    if let Some(caret) = caret {
        page.selection = Selection::new(Range::collapsed(caret));
    }
    page.document.dispatch_event(container, Event::input());
}

/// Swap the content between the markers for `replacement`.
///
/// Returns the container that was notified and where the caret ends up.
/// The markers are gone when this returns, whichever way it returns.
fn splice_between_markers(
    doc: &mut Document,
    start_id: &str,
    end_id: &str,
    replacement: &str,
) -> Option<(NodeId, Option<BoundaryPoint>)> {
    let mut guard = MarkerGuard {
        doc,
        ids: [start_id, end_id],
    };
    let doc = &mut *guard.doc;

    let (Some(start), Some(end)) = (doc.get_element_by_id(start_id), doc.get_element_by_id(end_id))
    else {
        warn!("Selection markers are gone, leaving content untouched");
        return None;
    };
    let Some(range) = doc.range_between(start, end) else {
        warn!("Selection markers are out of order, leaving content untouched");
        return None;
    };

    let point = doc.delete_contents(&range);
    let container = doc.parent(start).unwrap_or(doc.root());

    let proceed = doc.dispatch_event(
        container,
        Event::before_input(REPLACEMENT_INPUT_TYPE, replacement),
    );

    let caret = if proceed && !replacement.is_empty() {
        let text = doc.create_text(replacement);
        match doc.insert_at(point, text) {
            Ok(()) => Some(BoundaryPoint::new(text, replacement.chars().count())),
            Err(e) => {
                warn!("Could not insert replacement text: {}", e);
                None
            }
        }
    } else {
        if !proceed {
            debug!("Page editor took over the replacement");
        }
        doc.point_before(start)
    };

    Some((container, caret))
}
