use crate::ast::{Fragment, Node, NodeKind};
use crate::tokenizer::{classify_tag, tokenize, TagKind, Token, TokenKind};
use std::ops::Range;

/// Lenient tree builder for tag-delimited content
///
/// Never fails: unclosed elements are closed implicitly, close tags with no
/// matching open tag become `StrayClose` nodes, and every char of the
/// source ends up inside exactly one leaf or tag span.
pub struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    len: usize,
}

/// Element whose close tag has not been seen yet
struct OpenElement {
    tag: String,
    open: Range<usize>,
    children: Vec<Node>,
}

impl OpenElement {
    fn finish(self, close: Option<Range<usize>>, end: usize) -> Node {
        Node {
            kind: NodeKind::Element { tag: self.tag },
            span: self.open.start..end,
            open: self.open,
            close,
            children: self.children,
        }
    }
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            tokens: tokenize(source),
            len: source.chars().count(),
        }
    }

    /// Build the sibling list for the whole source
    pub fn parse_fragment(self) -> Fragment {
        let mut stack: Vec<OpenElement> = Vec::new();
        let mut root: Vec<Node> = Vec::new();

        for token in &self.tokens {
            let span = token.span.clone();

            if token.kind != TokenKind::Tag {
                push_text(children_mut(&mut stack, &mut root), span);
                continue;
            }

            match classify_tag(token.text) {
                TagKind::Open(tag) => stack.push(OpenElement {
                    tag,
                    open: span,
                    children: Vec::new(),
                }),
                TagKind::SelfClosing(tag) => {
                    children_mut(&mut stack, &mut root)
                        .push(Node::leaf(NodeKind::SelfClosing { tag }, span));
                }
                TagKind::Comment => {
                    children_mut(&mut stack, &mut root).push(Node::leaf(NodeKind::Comment, span));
                }
                TagKind::Close(tag) => match stack.iter().rposition(|e| e.tag == tag) {
                    Some(depth) => {
                        // Anything opened after the match is closed implicitly here
                        while stack.len() > depth + 1 {
                            if let Some(inner) = stack.pop() {
                                let node = inner.finish(None, span.start);
                                children_mut(&mut stack, &mut root).push(node);
                            }
                        }
                        if let Some(element) = stack.pop() {
                            let end = span.end;
                            let node = element.finish(Some(span), end);
                            children_mut(&mut stack, &mut root).push(node);
                        }
                    }
                    None => {
                        children_mut(&mut stack, &mut root)
                            .push(Node::leaf(NodeKind::StrayClose { tag }, span));
                    }
                },
            }
        }

        while let Some(element) = stack.pop() {
            let node = element.finish(None, self.len);
            children_mut(&mut stack, &mut root).push(node);
        }

        Fragment {
            nodes: root,
            len: self.len,
        }
    }
}

fn children_mut<'a>(stack: &'a mut [OpenElement], root: &'a mut Vec<Node>) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(element) => &mut element.children,
        None => root,
    }
}

fn push_text(children: &mut Vec<Node>, span: Range<usize>) {
    if let Some(last) = children.last_mut() {
        if last.kind == NodeKind::Text && last.span.end == span.start {
            last.span.end = span.end;
            last.open.end = span.end;
            return;
        }
    }
    children.push(Node::leaf(NodeKind::Text, span));
}

/// Parse a source string into a fragment
pub fn parse(source: &str) -> Fragment {
    Parser::new(source).parse_fragment()
}
