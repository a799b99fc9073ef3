//! Monospace document layout over a rope
//!
//! One node per line of source text, one line of layout per node. Every
//! character is `char_width` wide and every node is `line_height` tall, so
//! hit testing is arithmetic.
//!
//! Source lines map to nodes as follows:
//! - `---` is a horizontal rule (a selectable atomic block)
//! - a line starting with `::` is an embedded widget that cannot be selected
//! - anything else is a paragraph, including empty lines

use std::cmp::Ordering;

use ropey::{Rope, RopeSlice};

use crate::document::{
    BlockEdge, DocumentPosition, DocumentSelection, NodeId, NodePosition,
};
use crate::geometry::{Point, Rect};
use crate::host::DocumentLayout;
use crate::util::word_range_at;

/// What kind of content a node holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Paragraph,
    Rule,
    Embed,
}

#[derive(Debug, Clone)]
struct Node {
    id: NodeId,
    kind: NodeKind,
}

/// Cell sizes for the monospace grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
    /// Width of atomic blocks such as rules
    pub block_width: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 10.0,
            line_height: 20.0,
            block_width: 400.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonospaceDocument {
    buffer: Rope,
    nodes: Vec<Node>,
    metrics: TextMetrics,
}

impl MonospaceDocument {
    /// Lay out `text` with default metrics. Node ids are `n0`, `n1`, ...
    pub fn from_text(text: &str) -> Self {
        Self::with_metrics(text, TextMetrics::default())
    }

    pub fn with_metrics(text: &str, metrics: TextMetrics) -> Self {
        let text = text.strip_suffix('\n').unwrap_or(text);
        let buffer = Rope::from(text);
        let nodes = (0..buffer.len_lines())
            .map(|line_idx| {
                let line = line_text(buffer.line(line_idx));
                let kind = if line.trim() == "---" {
                    NodeKind::Rule
                } else if line.starts_with("::") {
                    NodeKind::Embed
                } else {
                    NodeKind::Paragraph
                };
                Node {
                    id: NodeId::new(format!("n{}", line_idx)),
                    kind,
                }
            })
            .collect();

        Self {
            buffer,
            nodes,
            metrics,
        }
    }

    pub fn metrics(&self) -> TextMetrics {
        self.metrics
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_id(&self, index: usize) -> Option<&NodeId> {
        self.nodes.get(index).map(|node| &node.id)
    }

    pub fn node_kind(&self, node_id: &NodeId) -> Option<NodeKind> {
        self.index_of(node_id).map(|idx| self.nodes[idx].kind)
    }

    /// Total laid-out height
    pub fn content_height(&self) -> f64 {
        self.nodes.len() as f64 * self.metrics.line_height
    }

    /// Text of a paragraph node, without its line break
    pub fn paragraph_text(&self, node_id: &NodeId) -> Option<String> {
        let idx = self.index_of(node_id)?;
        (self.nodes[idx].kind == NodeKind::Paragraph).then(|| line_text(self.buffer.line(idx)))
    }

    /// Plain text covered by a selection; blocks contribute nothing
    pub fn selected_text(&self, selection: &DocumentSelection) -> String {
        let (start, end) = match self.compare(&selection.base, &selection.extent) {
            Ordering::Greater => (&selection.extent, &selection.base),
            _ => (&selection.base, &selection.extent),
        };
        let (Some(first), Some(last)) = (self.index_of(&start.node_id), self.index_of(&end.node_id))
        else {
            return String::new();
        };

        let mut pieces = Vec::new();
        for idx in first..=last {
            if self.nodes[idx].kind != NodeKind::Paragraph {
                continue;
            }
            let chars: Vec<char> = line_chars(self.buffer.line(idx));
            let from = if idx == first {
                start.text_offset().unwrap_or(0)
            } else {
                0
            };
            let to = if idx == last {
                end.text_offset().unwrap_or(chars.len())
            } else {
                chars.len()
            };
            let (from, to) = (from.min(chars.len()), to.min(chars.len()));
            pieces.push(chars[from..to.max(from)].iter().collect::<String>());
        }
        pieces.join("\n")
    }

    fn index_of(&self, node_id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| &node.id == node_id)
    }

    fn paragraph_len(&self, idx: usize) -> usize {
        line_chars(self.buffer.line(idx)).len()
    }

    fn start_of(&self, idx: usize) -> DocumentPosition {
        let node = &self.nodes[idx];
        match node.kind {
            NodeKind::Paragraph => DocumentPosition::new(node.id.clone(), NodePosition::text(0)),
            NodeKind::Rule | NodeKind::Embed => {
                DocumentPosition::new(node.id.clone(), NodePosition::upstream())
            }
        }
    }

    fn end_of(&self, idx: usize) -> DocumentPosition {
        let node = &self.nodes[idx];
        match node.kind {
            NodeKind::Paragraph => DocumentPosition::new(
                node.id.clone(),
                NodePosition::text(self.paragraph_len(idx)),
            ),
            NodeKind::Rule | NodeKind::Embed => {
                DocumentPosition::new(node.id.clone(), NodePosition::downstream())
            }
        }
    }
}

impl DocumentLayout for MonospaceDocument {
    fn position_nearest(&self, offset: Point) -> Option<DocumentPosition> {
        let last = self.nodes.len().checked_sub(1)?;
        let row = (offset.y.max(0.0) / self.metrics.line_height) as usize;
        let idx = row.min(last);
        let node = &self.nodes[idx];

        let node_position = match node.kind {
            NodeKind::Paragraph => {
                let col = (offset.x.max(0.0) / self.metrics.char_width).round() as usize;
                NodePosition::text(col.min(self.paragraph_len(idx)))
            }
            NodeKind::Rule | NodeKind::Embed => {
                if offset.x < self.metrics.block_width / 2.0 {
                    NodePosition::upstream()
                } else {
                    NodePosition::downstream()
                }
            }
        };
        Some(DocumentPosition::new(node.id.clone(), node_position))
    }

    fn rect_for_position(&self, position: &DocumentPosition) -> Option<Rect> {
        let idx = self.index_of(&position.node_id)?;
        let top = idx as f64 * self.metrics.line_height;
        let x = match (self.nodes[idx].kind, position.node_position) {
            (NodeKind::Paragraph, NodePosition::Text { offset, .. }) => {
                if offset > self.paragraph_len(idx) {
                    return None;
                }
                offset as f64 * self.metrics.char_width
            }
            (NodeKind::Rule | NodeKind::Embed, NodePosition::Block(BlockEdge::Upstream)) => 0.0,
            (NodeKind::Rule | NodeKind::Embed, NodePosition::Block(BlockEdge::Downstream)) => {
                self.metrics.block_width
            }
            _ => return None,
        };
        Some(Rect::new(x, top, 0.0, self.metrics.line_height))
    }

    fn is_selectable(&self, node_id: &NodeId) -> bool {
        self.node_kind(node_id)
            .is_some_and(|kind| kind != NodeKind::Embed)
    }

    fn nearest_selectable_position(&self, node_id: &NodeId) -> Option<DocumentPosition> {
        let idx = self.index_of(node_id)?;
        let selectable = |i: &usize| self.nodes[*i].kind != NodeKind::Embed;

        if let Some(above) = (0..idx).rev().find(selectable) {
            return Some(self.end_of(above));
        }
        (idx + 1..self.nodes.len())
            .find(selectable)
            .map(|below| self.start_of(below))
    }

    fn compare(&self, a: &DocumentPosition, b: &DocumentPosition) -> Ordering {
        let (Some(ia), Some(ib)) = (self.index_of(&a.node_id), self.index_of(&b.node_id)) else {
            return Ordering::Equal;
        };
        ia.cmp(&ib).then_with(|| {
            a.node_position
                .cmp_within_node(&b.node_position)
                .unwrap_or(Ordering::Equal)
        })
    }

    fn word_selection_at(&self, position: &DocumentPosition) -> Option<DocumentSelection> {
        let idx = self.index_of(&position.node_id)?;
        if self.nodes[idx].kind != NodeKind::Paragraph {
            return None;
        }
        let offset = position.text_offset()?;
        let chars = line_chars(self.buffer.line(idx));
        let id = &self.nodes[idx].id;

        let (start, end) = word_range_at(&chars, offset)?;
        Some(DocumentSelection::new(
            DocumentPosition::new(id.clone(), NodePosition::text(start)),
            DocumentPosition::new(id.clone(), NodePosition::text(end)),
        ))
    }

    fn paragraph_selection_at(&self, position: &DocumentPosition) -> Option<DocumentSelection> {
        let idx = self.index_of(&position.node_id)?;
        (self.nodes[idx].kind == NodeKind::Paragraph)
            .then(|| DocumentSelection::new(self.start_of(idx), self.end_of(idx)))
    }

    fn block_selection_at(&self, position: &DocumentPosition) -> Option<DocumentSelection> {
        let idx = self.index_of(&position.node_id)?;
        (self.nodes[idx].kind != NodeKind::Paragraph)
            .then(|| DocumentSelection::new(self.start_of(idx), self.end_of(idx)))
    }
}

fn line_chars(line: RopeSlice<'_>) -> Vec<char> {
    line.chars().filter(|&ch| ch != '\n' && ch != '\r').collect()
}

fn line_text(line: RopeSlice<'_>) -> String {
    line_chars(line).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> MonospaceDocument {
        MonospaceDocument::from_text("hello world\n---\n::chart\nsecond line\n")
    }

    #[test]
    fn test_nodes_from_lines() {
        let doc = doc();
        assert_eq!(doc.node_count(), 4);
        assert_eq!(doc.node_kind(&NodeId::new("n1")), Some(NodeKind::Rule));
        assert_eq!(doc.node_kind(&NodeId::new("n2")), Some(NodeKind::Embed));
        assert_eq!(
            doc.paragraph_text(&NodeId::new("n3")).as_deref(),
            Some("second line")
        );
    }

    #[test]
    fn test_position_nearest_clamps() {
        let doc = doc();
        assert_eq!(
            doc.position_nearest(Point::new(999.0, 5.0)),
            Some(DocumentPosition::text("n0", 11))
        );
        assert_eq!(
            doc.position_nearest(Point::new(-5.0, -50.0)),
            Some(DocumentPosition::text("n0", 0))
        );
        assert_eq!(
            doc.position_nearest(Point::new(24.0, 500.0)),
            Some(DocumentPosition::text("n3", 2))
        );
        assert_eq!(
            doc.position_nearest(Point::new(300.0, 25.0)),
            Some(DocumentPosition::new(NodeId::new("n1"), NodePosition::downstream()))
        );
    }

    #[test]
    fn test_rect_for_text_position() {
        let doc = doc();
        assert_eq!(
            doc.rect_for_position(&DocumentPosition::text("n3", 4)),
            Some(Rect::new(40.0, 60.0, 0.0, 20.0))
        );
        assert_eq!(doc.rect_for_position(&DocumentPosition::text("n3", 40)), None);
    }

    #[test]
    fn test_nearest_selectable_prefers_upstream() {
        let doc = doc();
        assert_eq!(
            doc.nearest_selectable_position(&NodeId::new("n2")),
            Some(DocumentPosition::new(NodeId::new("n1"), NodePosition::downstream()))
        );

        let only_embed_first = MonospaceDocument::from_text("::widget\ntext");
        assert_eq!(
            only_embed_first.nearest_selectable_position(&NodeId::new("n0")),
            Some(DocumentPosition::text("n1", 0))
        );
    }

    #[test]
    fn test_word_and_paragraph_selection() {
        let doc = doc();
        let word = doc
            .word_selection_at(&DocumentPosition::text("n0", 8))
            .unwrap();
        assert_eq!(word.base, DocumentPosition::text("n0", 6));
        assert_eq!(word.extent, DocumentPosition::text("n0", 11));
        assert_eq!(doc.selected_text(&word), "world");

        let para = doc
            .paragraph_selection_at(&DocumentPosition::text("n3", 2))
            .unwrap();
        assert_eq!(doc.selected_text(&para), "second line");

        let rule = DocumentPosition::new(NodeId::new("n1"), NodePosition::upstream());
        assert!(doc.word_selection_at(&rule).is_none());
        assert!(doc.block_selection_at(&rule).is_some());
    }

    #[test]
    fn test_empty_paragraph_has_no_word() {
        let doc = MonospaceDocument::from_text("hello\n\nworld");
        let empty = DocumentPosition::text("n1", 0);
        assert!(doc.word_selection_at(&empty).is_none());
        assert!(doc.block_selection_at(&empty).is_none());
        assert!(doc.paragraph_selection_at(&empty).unwrap().is_collapsed());
    }

    #[test]
    fn test_compare_orders_by_node_then_offset() {
        let doc = doc();
        assert_eq!(
            doc.compare(&DocumentPosition::text("n0", 9), &DocumentPosition::text("n3", 0)),
            Ordering::Less
        );
        assert_eq!(
            doc.compare(&DocumentPosition::text("n3", 5), &DocumentPosition::text("n3", 2)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_selected_text_across_nodes_skips_blocks() {
        let doc = doc();
        let selection = DocumentSelection::new(
            DocumentPosition::text("n3", 6),
            DocumentPosition::text("n0", 6),
        );
        assert_eq!(doc.selected_text(&selection), "world\nsecond");
    }
}
