use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Node classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    /// Open tag, inner content and (usually) a close tag
    Element { tag: String },
    /// `<br>`, `<img/>` and friends
    SelfClosing { tag: String },
    /// Contiguous run of text, whitespace and stray angle brackets
    Text,
    Comment,
    /// A close tag with no matching open tag
    StrayClose { tag: String },
}

/// One node of a parsed fragment. Spans are char offsets into the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Whole node, open tag through close tag
    pub span: Range<usize>,
    /// The open tag for elements, the whole node otherwise
    pub open: Range<usize>,
    /// Missing when an element is closed implicitly
    pub close: Option<Range<usize>>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(kind: NodeKind, span: Range<usize>) -> Self {
        Self {
            kind,
            open: span.clone(),
            span,
            close: None,
            children: Vec::new(),
        }
    }

    /// Span between the open tag and the close tag
    ///
    /// Empty for anything that is not an element.
    pub fn inner(&self) -> Range<usize> {
        match self.kind {
            NodeKind::Element { .. } => {
                let end = self.close.as_ref().map(|c| c.start).unwrap_or(self.span.end);
                self.open.end..end
            }
            _ => self.span.end..self.span.end,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag }
            | NodeKind::SelfClosing { tag }
            | NodeKind::StrayClose { tag } => Some(tag),
            NodeKind::Text | NodeKind::Comment => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn len(&self) -> usize {
        self.span.end - self.span.start
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Whether two nodes are the same kind of thing (same variant and tag)
    pub fn same_kind(&self, other: &Node) -> bool {
        self.kind == other.kind
    }
}

/// A parsed run of sibling nodes covering the whole source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub nodes: Vec<Node>,
    /// Source length in chars
    pub len: usize,
}

impl Fragment {
    /// Total number of nodes, counting descendants
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_of_closed_element() {
        let node = Node {
            kind: NodeKind::Element { tag: "p".to_string() },
            span: 0..12,
            open: 0..3,
            close: Some(8..12),
            children: vec![],
        };
        assert_eq!(node.inner(), 3..8);
        assert_eq!(node.tag(), Some("p"));
    }

    #[test]
    fn test_leaf_has_empty_inner() {
        let node = Node::leaf(NodeKind::Text, 4..9);
        assert_eq!(node.inner(), 9..9);
        assert_eq!(node.len(), 5);
        assert!(node.tag().is_none());
    }
}
