//! Boundary Points and Ranges
//!
//! A point is a child index inside an element or a char offset inside a
//! text node. Points are ordered by the child-index path from the root
//! with the offset appended, which matches document order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::dom::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

impl Range {
    pub fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

impl Document {
    fn point_key(&self, point: BoundaryPoint) -> Vec<usize> {
        let mut key = self.path(point.node);
        key.push(point.offset);
        key
    }

    pub fn compare_points(&self, a: BoundaryPoint, b: BoundaryPoint) -> Ordering {
        self.point_key(a).cmp(&self.point_key(b))
    }

    /// Point just before `node` in its parent
    pub fn point_before(&self, node: NodeId) -> Option<BoundaryPoint> {
        Some(BoundaryPoint::new(self.parent(node)?, self.index_in_parent(node)?))
    }

    /// Point just after `node` in its parent
    pub fn point_after(&self, node: NodeId) -> Option<BoundaryPoint> {
        Some(BoundaryPoint::new(
            self.parent(node)?,
            self.index_in_parent(node)? + 1,
        ))
    }

    /// Range strictly between two attached nodes, excluding both
    pub fn range_between(&self, first: NodeId, second: NodeId) -> Option<Range> {
        if !self.is_attached(first) || !self.is_attached(second) {
            return None;
        }
        let start = self.point_after(first)?;
        let end = self.point_before(second)?;
        match self.compare_points(start, end) {
            Ordering::Greater => None,
            _ => Some(Range::new(start, end)),
        }
    }

    /// A range is usable when both ends are attached and in order
    pub fn is_valid_range(&self, range: &Range) -> bool {
        self.is_attached(range.start.node)
            && self.is_attached(range.end.node)
            && range.start.offset <= self.node_length(range.start.node)
            && range.end.offset <= self.node_length(range.end.node)
            && self.compare_points(range.start, range.end) != Ordering::Greater
    }

    fn contains_node(&self, range: &Range, node: NodeId) -> bool {
        match (self.point_before(node), self.point_after(node)) {
            (Some(before), Some(after)) => {
                self.compare_points(before, range.start) != Ordering::Less
                    && self.compare_points(after, range.end) != Ordering::Greater
            }
            _ => false,
        }
    }

    /// Char span of a text node that lies inside the range
    fn clip_text(&self, range: &Range, text: NodeId) -> Option<(usize, usize)> {
        let length = self.node_length(text);
        let first = BoundaryPoint::new(text, 0);
        let last = BoundaryPoint::new(text, length);

        let start = if self.compare_points(first, range.start) != Ordering::Less {
            0
        } else if self.compare_points(last, range.start) != Ordering::Greater {
            return None;
        } else {
            range.start.offset.min(length)
        };
        let end = if self.compare_points(last, range.end) != Ordering::Greater {
            length
        } else if self.compare_points(first, range.end) != Ordering::Less {
            return None;
        } else {
            range.end.offset.min(length)
        };

        (start < end).then_some((start, end))
    }

    /// Text covered by the range, in document order
    pub fn range_text(&self, range: &Range) -> String {
        let mut out = String::new();
        for id in self.tree_order() {
            let Some(content) = self.text(id) else {
                continue;
            };
            if let Some((start, end)) = self.clip_text(range, id) {
                out.extend(content.chars().skip(start).take(end - start));
            }
        }
        out
    }

    /// Where a range collapses to once its contents are deleted
    fn deletion_point(&self, range: &Range) -> BoundaryPoint {
        if self.is_inclusive_ancestor(range.start.node, range.end.node) {
            return range.start;
        }
        let mut reference = range.start.node;
        while let Some(parent) = self.parent(reference) {
            if self.is_inclusive_ancestor(parent, range.end.node) {
                let index = self.index_in_parent(reference).unwrap_or(0);
                return BoundaryPoint::new(parent, index + 1);
            }
            reference = parent;
        }
        range.start
    }

    /// Delete everything inside the range and return the collapse point.
    ///
    /// Nodes fully inside the range are detached, partially covered text
    /// nodes are trimmed and partially covered elements are kept.
    pub fn delete_contents(&mut self, range: &Range) -> BoundaryPoint {
        if self.compare_points(range.start, range.end) != Ordering::Less {
            return range.start;
        }
        let point = self.deletion_point(range);

        let mut removals: Vec<NodeId> = Vec::new();
        let mut trims = Vec::new();
        for id in self.tree_order() {
            if id == self.root() || removals.iter().any(|r| self.is_inclusive_ancestor(*r, id)) {
                continue;
            }
            if self.contains_node(range, id) {
                removals.push(id);
            } else if self.is_text(id) {
                if let Some((start, end)) = self.clip_text(range, id) {
                    trims.push((id, start, end));
                }
            }
        }

        for (id, start, end) in trims {
            self.delete_text(id, start, end);
        }
        for id in removals {
            self.remove(id);
        }
        point
    }
}
