// src/dom.rs

//! The parsed document tree.
//!
//! Nodes are built once by the parser and never mutated afterwards; every
//! render pass is a pure function of the tree plus viewport state. Parent
//! context is threaded top-down through the render context rather than
//! stored as back-pointers.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    Element,
    DocumentRoot,
}

/// Rendering context a node was assigned at parse time.
///
/// Block nodes occupy full lines and advance the Y cursor; inline nodes flow
/// along the current line and advance X. The assignment is fixed by the tag
/// and the parent's context and never changes after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeContext {
    Block,
    Inline,
    Root,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Lowercase tag name; empty for text nodes.
    pub tag: String,
    /// Raw text content; only meaningful for text nodes.
    pub content: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<Node>,
    pub context: NodeContext,
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node {
            kind: NodeKind::Text,
            tag: String::new(),
            content: content.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
            context: NodeContext::Inline,
        }
    }

    pub fn element(tag: impl Into<String>, context: NodeContext) -> Self {
        Node {
            kind: NodeKind::Element,
            tag: tag.into(),
            content: String::new(),
            attributes: HashMap::new(),
            children: Vec::new(),
            context,
        }
    }

    pub fn root() -> Self {
        Node {
            kind: NodeKind::DocumentRoot,
            tag: String::new(),
            content: String::new(),
            attributes: HashMap::new(),
            children: Vec::new(),
            context: NodeContext::Root,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Concatenated content of the direct text children.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if child.is_text() {
                out.push_str(&child.content);
            }
        }
        out
    }

    /// Concatenated text of the whole subtree, depth first.
    pub fn deep_text(&self) -> String {
        if self.is_text() {
            return self.content.clone();
        }
        let mut out = String::new();
        for child in &self.children {
            out.push_str(&child.deep_text());
        }
        out
    }
}

/// A parsed document: the element tree plus head metadata the parser
/// collected along the way. The metadata is available to hosts but not
/// consumed by rendering.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: Node,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn empty() -> Self {
        Document {
            root: Node::root(),
            metadata: DocumentMetadata::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub scripts: Vec<ScriptRecord>,
    pub styles: Vec<StyleRecord>,
    pub metas: Vec<MetaRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptRecord {
    pub src: Option<String>,
    pub content: String,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StyleRecord {
    pub href: Option<String>,
    pub content: String,
    pub media: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MetaRecord {
    pub name: Option<String>,
    pub content: Option<String>,
    pub charset: Option<String>,
}
