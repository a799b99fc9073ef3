//! Document positions and selections as seen by the gesture layer
//!
//! Positions are produced by a [`DocumentLayout`](crate::host::DocumentLayout)
//! and treated as opaque, comparable values. Document order is not known
//! here; anything that needs "which endpoint comes first" asks the layout.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node (paragraph, image, rule, ...) in the document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of a character boundary a text caret sticks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextAffinity {
    Upstream,
    #[default]
    Downstream,
}

/// Which edge of an atomic block node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockEdge {
    Upstream,
    Downstream,
}

/// Position within a single node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodePosition {
    /// Character offset within a text node
    Text { offset: usize, affinity: TextAffinity },
    /// Before or after an atomic (non-text) node
    Block(BlockEdge),
}

impl NodePosition {
    pub const fn text(offset: usize) -> Self {
        NodePosition::Text {
            offset,
            affinity: TextAffinity::Downstream,
        }
    }

    pub const fn upstream() -> Self {
        NodePosition::Block(BlockEdge::Upstream)
    }

    pub const fn downstream() -> Self {
        NodePosition::Block(BlockEdge::Downstream)
    }

    /// Equivalence ignores caret affinity: two carets at the same offset
    /// are the same place even if they stick to different sides.
    pub fn is_equivalent_to(&self, other: &NodePosition) -> bool {
        match (self, other) {
            (NodePosition::Text { offset: a, .. }, NodePosition::Text { offset: b, .. }) => a == b,
            (NodePosition::Block(a), NodePosition::Block(b)) => a == b,
            _ => false,
        }
    }

    /// Order of two positions inside the same node, if comparable
    pub fn cmp_within_node(&self, other: &NodePosition) -> Option<Ordering> {
        match (self, other) {
            (NodePosition::Text { offset: a, .. }, NodePosition::Text { offset: b, .. }) => {
                Some(a.cmp(b))
            }
            (NodePosition::Block(a), NodePosition::Block(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// A location in the document: node plus position within that node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPosition {
    pub node_id: NodeId,
    pub node_position: NodePosition,
}

impl DocumentPosition {
    pub fn new(node_id: NodeId, node_position: NodePosition) -> Self {
        Self {
            node_id,
            node_position,
        }
    }

    /// Text position with downstream affinity
    pub fn text(node_id: impl Into<String>, offset: usize) -> Self {
        Self::new(NodeId::new(node_id), NodePosition::text(offset))
    }

    pub fn is_equivalent_to(&self, other: &DocumentPosition) -> bool {
        self.node_id == other.node_id && self.node_position.is_equivalent_to(&other.node_position)
    }

    /// Text offset, if this is a text position
    pub fn text_offset(&self) -> Option<usize> {
        match self.node_position {
            NodePosition::Text { offset, .. } => Some(offset),
            NodePosition::Block(_) => None,
        }
    }
}

impl fmt::Display for DocumentPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node_position {
            NodePosition::Text { offset, .. } => write!(f, "{}:{}", self.node_id, offset),
            NodePosition::Block(BlockEdge::Upstream) => write!(f, "{}:upstream", self.node_id),
            NodePosition::Block(BlockEdge::Downstream) => write!(f, "{}:downstream", self.node_id),
        }
    }
}

/// Direction of a selection in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAffinity {
    /// Base comes before (or at) extent
    Downstream,
    /// Extent comes before base
    Upstream,
}

impl SelectionAffinity {
    /// Affinity implied by the document-order comparison of base to extent
    pub fn from_ordering(base_to_extent: Ordering) -> Self {
        match base_to_extent {
            Ordering::Greater => SelectionAffinity::Upstream,
            Ordering::Less | Ordering::Equal => SelectionAffinity::Downstream,
        }
    }
}

/// A document selection with base (fixed end) and extent (moving end)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSelection {
    pub base: DocumentPosition,
    pub extent: DocumentPosition,
}

impl DocumentSelection {
    pub fn new(base: DocumentPosition, extent: DocumentPosition) -> Self {
        Self { base, extent }
    }

    /// Create a collapsed selection (caret)
    pub fn collapsed(position: DocumentPosition) -> Self {
        Self {
            base: position.clone(),
            extent: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.base.is_equivalent_to(&self.extent)
    }

    /// Equivalence of both endpoints
    pub fn is_equivalent_to(&self, other: &DocumentSelection) -> bool {
        self.base.is_equivalent_to(&other.base) && self.extent.is_equivalent_to(&other.extent)
    }

    /// Endpoint for the given bound
    pub fn bound(&self, bound: SelectionBound) -> &DocumentPosition {
        match bound {
            SelectionBound::Base => &self.base,
            SelectionBound::Extent => &self.extent,
        }
    }

    /// Copy of this selection with one endpoint replaced
    pub fn with_bound(&self, bound: SelectionBound, position: DocumentPosition) -> Self {
        match bound {
            SelectionBound::Base => Self::new(position, self.extent.clone()),
            SelectionBound::Extent => Self::new(self.base.clone(), position),
        }
    }
}

impl fmt::Display for DocumentSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collapsed() {
            write!(f, "[{}]", self.extent)
        } else {
            write!(f, "[{} -> {}]", self.base, self.extent)
        }
    }
}

/// Which visual handle the user is dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleType {
    /// The single handle under a caret
    Collapsed,
    /// The handle at the selection end that comes first in reading order
    Upstream,
    /// The handle at the selection end that comes last in reading order
    Downstream,
}

impl HandleType {
    /// Whether this handle only exists for collapsed selections
    pub fn expects_collapsed(&self) -> bool {
        matches!(self, HandleType::Collapsed)
    }

    /// Which selection endpoint this handle sits on for a selection with the
    /// given affinity
    pub fn bound_for(&self, affinity: SelectionAffinity) -> SelectionBound {
        match (self, affinity) {
            (HandleType::Collapsed, _) => SelectionBound::Extent,
            (HandleType::Upstream, SelectionAffinity::Downstream) => SelectionBound::Base,
            (HandleType::Upstream, SelectionAffinity::Upstream) => SelectionBound::Extent,
            (HandleType::Downstream, SelectionAffinity::Downstream) => SelectionBound::Extent,
            (HandleType::Downstream, SelectionAffinity::Upstream) => SelectionBound::Base,
        }
    }
}

/// One endpoint of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionBound {
    Base,
    Extent,
}

/// How a selection change was made, for the editing pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChangeKind {
    PlaceCaret,
    PushCaret,
    ExpandSelection,
    ClearSelection,
}

/// Why a selection change was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    UserInteraction,
    ContentChange,
}
