//! Selection Capture
//!
//! Decides once, from the focused element, whether the selection lives in a
//! text field or in page content, and tags the page accordingly.

use tracing::{debug, warn};

use super::{char_slice, random_id, SelectionDescriptor, TEXT_INPUT_TYPES, TOKEN_ATTRIBUTE};
use crate::page::{Document, DomError, NodeId, Page, Range, Selection};

/// Capture the current selection of `page`.
///
/// A field selection tags the field with a fresh correlation token; a
/// content selection inserts two hidden marker spans at the range edges.
pub fn capture(page: &mut Page) -> SelectionDescriptor {
    if let Some(field) = page
        .active_element()
        .filter(|id| is_text_field(&page.document, *id))
    {
        return capture_field(&mut page.document, field);
    }
    capture_content(page)
}

fn is_text_field(doc: &Document, id: NodeId) -> bool {
    let Some(el) = doc.element(id) else {
        return false;
    };
    if el.control.is_none() {
        return false;
    }
    match el.tag.as_str() {
        "textarea" => true,
        "input" => TEXT_INPUT_TYPES.contains(&el.input_type().as_str()),
        _ => false,
    }
}

fn capture_field(doc: &mut Document, field: NodeId) -> SelectionDescriptor {
    let Some(control) = doc.element(field).and_then(|el| el.control.as_ref()) else {
        return SelectionDescriptor::None;
    };
    let length = control.value.chars().count();
    let start = control.selection_start.min(length);
    let end = control.selection_end.min(length);
    let text = char_slice(&control.value, start, end);
    if text.is_empty() {
        debug!("Focused field has an empty selection");
        return SelectionDescriptor::None;
    }

    let token = random_id("tw_");
    if let Err(e) = doc.set_attribute(field, TOKEN_ATTRIBUTE, &token) {
        warn!("Could not tag field: {}", e);
        return SelectionDescriptor::None;
    }
    debug!("Captured field selection {}..{} ({})", start, end, token);
    SelectionDescriptor::Field {
        token,
        start,
        end,
        text,
    }
}

fn capture_content(page: &mut Page) -> SelectionDescriptor {
    let Some(range) = page.selection.first_range() else {
        return SelectionDescriptor::None;
    };
    if !page.document.is_valid_range(&range) {
        warn!("Ignoring selection with a stale range");
        return SelectionDescriptor::None;
    }
    let text = page.document.range_text(&range);
    if text.trim().is_empty() {
        return SelectionDescriptor::None;
    }

    let start_marker = random_id("twStart_");
    let end_marker = random_id("twEnd_");
    match insert_markers(&mut page.document, &range, &start_marker, &end_marker) {
        Ok(between) => {
            page.selection = Selection::new(between);
            debug!("Captured content selection ({} chars)", text.chars().count());
            SelectionDescriptor::Content {
                start_marker,
                end_marker,
                text,
            }
        }
        Err(e) => {
            warn!("Could not place selection markers: {}", e);
            for id in [&start_marker, &end_marker] {
                if let Some(node) = page.document.get_element_by_id(id) {
                    page.document.remove(node);
                }
            }
            SelectionDescriptor::None
        }
    }
}

/// Hidden, childless span that takes no space in the layout
fn create_marker(doc: &mut Document, id: &str) -> Result<NodeId, DomError> {
    let marker = doc.create_element("span");
    doc.set_attribute(marker, "id", id)?;
    doc.set_attribute(marker, "style", "display:none;")?;
    Ok(marker)
}

/// Insert both markers and return the range between them.
///
/// The end marker goes in first so that splitting a text node for it
/// cannot move the start boundary.
fn insert_markers(
    doc: &mut Document,
    range: &Range,
    start_id: &str,
    end_id: &str,
) -> Result<Range, DomError> {
    let end = create_marker(doc, end_id)?;
    doc.insert_at(range.end, end)?;
    let start = create_marker(doc, start_id)?;
    doc.insert_at(range.start, start)?;

    doc.range_between(start, end)
        .ok_or(DomError::UnknownNode(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::BoundaryPoint;

    fn field_page(tag: &str, input_type: Option<&str>, value: &str) -> (Page, NodeId) {
        let mut doc = Document::new();
        let field = doc.append_control(doc.root(), tag, input_type, value).unwrap();
        (Page::new(doc), field)
    }

    #[test]
    fn test_capture_field_selection() {
        let (mut page, field) = field_page("textarea", None, "hello world");
        page.select_in_control(field, 6, 11);

        let descriptor = capture(&mut page);
        let SelectionDescriptor::Field {
            token,
            start,
            end,
            text,
        } = descriptor
        else {
            panic!("Expected field selection, got {:?}", descriptor);
        };
        assert_eq!((start, end), (6, 11));
        assert_eq!(text, "world");
        assert_eq!(
            page.document.attribute(field, TOKEN_ATTRIBUTE),
            Some(token.as_str())
        );
    }

    #[test]
    fn test_capture_empty_field_selection_is_none() {
        let (mut page, field) = field_page("input", Some("search"), "hello");
        page.select_in_control(field, 3, 3);

        assert_eq!(capture(&mut page), SelectionDescriptor::None);
        assert_eq!(page.document.attribute(field, TOKEN_ATTRIBUTE), None);
    }

    #[test]
    fn test_password_field_falls_back_to_page_selection() {
        let (mut page, field) = field_page("input", Some("password"), "secret");
        page.select_in_control(field, 0, 6);
        assert_eq!(capture(&mut page), SelectionDescriptor::None);
    }

    #[test]
    fn test_capture_content_inserts_markers() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p").unwrap();
        let t = doc.append_text(p, "one two three").unwrap();
        let mut page = Page::new(doc);
        page.select(Range::new(BoundaryPoint::new(t, 4), BoundaryPoint::new(t, 7)));

        let descriptor = capture(&mut page);
        let SelectionDescriptor::Content {
            start_marker,
            end_marker,
            text,
        } = descriptor
        else {
            panic!("Expected content selection, got {:?}", descriptor);
        };
        assert_eq!(text, "two");
        assert_ne!(start_marker, end_marker);

        let start = page.document.get_element_by_id(&start_marker).unwrap();
        let end = page.document.get_element_by_id(&end_marker).unwrap();
        assert_ne!(start, end);
        assert_eq!(page.document.attribute(start, "style"), Some("display:none;"));
        assert_eq!(page.document.text_content(p), "one two three");

        let between = page.document.range_between(start, end).unwrap();
        assert_eq!(page.document.range_text(&between), "two");
        assert_eq!(page.selection_text(), "two");
    }

    #[test]
    fn test_blank_content_selection_is_none() {
        let mut doc = Document::new();
        let t = doc.append_text(doc.root(), "a    b").unwrap();
        let mut page = Page::new(doc);
        page.select(Range::new(BoundaryPoint::new(t, 1), BoundaryPoint::new(t, 5)));

        assert_eq!(capture(&mut page), SelectionDescriptor::None);
        assert_eq!(page.document.children(page.document.root()).len(), 1);
    }

    #[test]
    fn test_no_focus_no_selection_is_none() {
        let mut page = Page::default();
        assert!(capture(&mut page).is_none());
    }
}
