// src/parser/mod.rs

//! Character-level state machine HTML parser.
//!
//! The parser consumes arbitrary, possibly malformed markup and always
//! produces a best-effort [`Document`]: unclosed tags close implicitly,
//! unknown tags become plain element nodes, runaway comments are capped and
//! an error budget short-circuits pathological input. Formatting tags are
//! normalized at parse time (`b`/`strong` become `span[font-weight: bold]`,
//! `i`/`em` become `span[font-style: italic]`) while the original spelling
//! stays on the open-element stack so a later `</b>` still closes its
//! element.

use crate::dom::{
    Document, DocumentMetadata, MetaRecord, Node, NodeContext, ScriptRecord, StyleRecord,
};
use log::debug;
use std::collections::HashMap;
use std::mem;

const DEFAULT_MAX_DEPTH: usize = 50;
const DEFAULT_MAX_LENGTH: usize = 1_000_000;
const DEFAULT_MAX_ERRORS: usize = 100;
const MAX_TAG_NAME_LEN: usize = 20;
const MAX_COMMENT_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Text,
    TagOpen,
    TagName,
    Attributes,
    AttributeName,
    AttributeValue,
    AttributeQuoted,
    TagClose,
    EndTag,
    Comment,
}

/// An element still waiting for its end tag. The node is owned here and
/// attached to its parent when the entry is popped.
struct OpenEntry {
    node: Node,
    original_tag: String,
}

pub struct StateMachineParser {
    state: ParserState,
    stack: Vec<OpenEntry>,
    metadata: DocumentMetadata,

    text_buffer: String,
    tag_buffer: String,
    attr_name: String,
    attr_value: String,
    current_attrs: HashMap<String, String>,
    quote_char: char,

    comment_len: usize,
    comment_tail: [char; 2],
    /// True once the comment opened with `--`; bogus comments (doctype and
    /// friends) end at the first `>` instead.
    comment_marked: bool,

    max_depth: usize,
    max_length: usize,
    max_errors: usize,
    error_count: usize,
    halted: bool,
}

impl StateMachineParser {
    pub fn new() -> Self {
        StateMachineParser {
            state: ParserState::Text,
            stack: Vec::new(),
            metadata: DocumentMetadata::default(),
            text_buffer: String::new(),
            tag_buffer: String::new(),
            attr_name: String::new(),
            attr_value: String::new(),
            current_attrs: HashMap::new(),
            quote_char: '\0',
            comment_len: 0,
            comment_tail: ['\0', '\0'],
            comment_marked: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: DEFAULT_MAX_LENGTH,
            max_errors: DEFAULT_MAX_ERRORS,
            error_count: 0,
            halted: false,
        }
    }

    fn reset(&mut self) {
        self.state = ParserState::Text;
        self.stack.clear();
        self.metadata = DocumentMetadata::default();
        self.text_buffer.clear();
        self.tag_buffer.clear();
        self.attr_name.clear();
        self.attr_value.clear();
        self.current_attrs.clear();
        self.quote_char = '\0';
        self.comment_len = 0;
        self.comment_tail = ['\0', '\0'];
        self.comment_marked = false;
        self.error_count = 0;
        self.halted = false;
    }

    /// Parses `input` into a document. Never fails: every malformation is
    /// recovered and the result is the best-effort tree.
    pub fn parse(&mut self, input: &str) -> Document {
        self.reset();

        if input.is_empty() {
            return Document::empty();
        }

        let chars: Vec<char> = input.chars().take(self.max_length).collect();
        let trimmed = trim_char_slice(&chars);

        self.stack.push(OpenEntry {
            node: Node::root(),
            original_tag: "document".to_string(),
        });

        for &ch in trimmed {
            if self.halted {
                break;
            }
            match self.state {
                ParserState::Text => self.on_text(ch),
                ParserState::TagOpen => self.on_tag_open(ch),
                ParserState::TagName => self.on_tag_name(ch),
                ParserState::Attributes => self.on_attributes(ch),
                ParserState::AttributeName => self.on_attribute_name(ch),
                ParserState::AttributeValue => self.on_attribute_value(ch),
                ParserState::AttributeQuoted => self.on_attribute_quoted(ch),
                ParserState::TagClose => self.on_tag_close(ch),
                ParserState::EndTag => self.on_end_tag(ch),
                ParserState::Comment => self.on_comment(ch),
            }
        }

        if !self.text_buffer.is_empty() {
            let text = mem::take(&mut self.text_buffer);
            self.add_text_node(&text);
        }

        // Implicitly close whatever is still open.
        while self.stack.len() > 1 {
            self.pop_entry();
        }

        let root = self.stack.pop().map(|e| e.node).unwrap_or_else(Node::root);
        Document {
            root,
            metadata: mem::take(&mut self.metadata),
        }
    }

    // State handlers

    fn on_text(&mut self, ch: char) {
        if ch == '<' {
            if !self.text_buffer.is_empty() {
                let text = mem::take(&mut self.text_buffer);
                self.add_text_node(&text);
            }
            self.state = ParserState::TagOpen;
        } else {
            self.text_buffer.push(ch);
        }
    }

    fn on_tag_open(&mut self, ch: char) {
        match ch {
            '/' => {
                self.tag_buffer.clear();
                self.state = ParserState::EndTag;
            }
            '!' => {
                self.comment_len = 0;
                self.comment_tail = ['\0', '\0'];
                self.comment_marked = false;
                self.state = ParserState::Comment;
            }
            c if c.is_whitespace() => {}
            c => {
                self.tag_buffer.clear();
                self.tag_buffer.push(c);
                self.current_attrs.clear();
                self.state = ParserState::TagName;
            }
        }
    }

    fn on_tag_name(&mut self, ch: char) {
        match ch {
            c if c.is_whitespace() => self.state = ParserState::Attributes,
            '>' => {
                self.finish_open_tag();
                self.state = ParserState::Text;
            }
            '/' => self.state = ParserState::TagClose,
            c => self.tag_buffer.push(c),
        }
    }

    fn on_attributes(&mut self, ch: char) {
        match ch {
            '>' => {
                self.finish_open_tag();
                self.state = ParserState::Text;
            }
            '/' => self.state = ParserState::TagClose,
            c if c.is_whitespace() => {}
            c => {
                self.attr_name.clear();
                self.attr_name.push(c);
                self.state = ParserState::AttributeName;
            }
        }
    }

    fn on_attribute_name(&mut self, ch: char) {
        match ch {
            '=' => {
                self.attr_value.clear();
                self.state = ParserState::AttributeValue;
            }
            c if c.is_whitespace() => {
                // Bare attribute maps to its own name.
                let name = mem::take(&mut self.attr_name);
                self.current_attrs.insert(name.clone(), name);
                self.state = ParserState::Attributes;
            }
            '>' => {
                let name = mem::take(&mut self.attr_name);
                self.current_attrs.insert(name.clone(), name);
                self.finish_open_tag();
                self.state = ParserState::Text;
            }
            c => self.attr_name.push(c),
        }
    }

    fn on_attribute_value(&mut self, ch: char) {
        match ch {
            '"' | '\'' => {
                self.quote_char = ch;
                self.state = ParserState::AttributeQuoted;
            }
            c if c.is_whitespace() => {
                self.store_attribute();
                self.state = ParserState::Attributes;
            }
            '>' => {
                self.store_attribute();
                self.finish_open_tag();
                self.state = ParserState::Text;
            }
            c => self.attr_value.push(c),
        }
    }

    fn on_attribute_quoted(&mut self, ch: char) {
        if ch == self.quote_char {
            self.store_attribute();
            self.state = ParserState::Attributes;
        } else {
            self.attr_value.push(ch);
        }
    }

    fn on_tag_close(&mut self, ch: char) {
        if ch == '>' {
            self.finish_self_closing_tag();
            self.state = ParserState::Text;
        }
    }

    fn on_end_tag(&mut self, ch: char) {
        if ch == '>' {
            self.finish_end_tag();
            self.state = ParserState::Text;
        } else if !ch.is_whitespace() {
            self.tag_buffer.push(ch);
        }
    }

    fn on_comment(&mut self, ch: char) {
        if ch == '>' && (self.comment_tail == ['-', '-'] || !self.comment_marked) {
            self.state = ParserState::Text;
            return;
        }
        if self.comment_len == 1 && self.comment_tail[1] == '-' && ch == '-' {
            self.comment_marked = true;
        }
        self.comment_tail = [self.comment_tail[1], ch];
        self.comment_len += 1;
        if self.comment_len > MAX_COMMENT_LEN {
            debug!("unterminated comment capped at {MAX_COMMENT_LEN} characters");
            self.state = ParserState::Text;
        }
    }

    // Tag completion

    fn finish_open_tag(&mut self) {
        let tag = mem::take(&mut self.tag_buffer).to_lowercase();

        if tag.is_empty() || tag.chars().count() > MAX_TAG_NAME_LEN {
            self.recover("invalid tag name");
            return;
        }

        if self.capture_head_element(&tag) {
            return;
        }

        let (parent_tag, parent_context) = match self.stack.last() {
            Some(parent) => (parent.node.tag.clone(), parent.node.context),
            None => return,
        };

        let context = determine_context(&tag, &parent_tag, parent_context);
        let mut node = Node::element(tag.clone(), context);
        node.attributes = mem::take(&mut self.current_attrs);

        let original = tag;
        normalize_element(&mut node);

        if is_container_tag(&original) && self.depth() < self.max_depth {
            self.stack.push(OpenEntry {
                node,
                original_tag: original,
            });
        } else {
            self.attach(node);
        }
    }

    fn finish_self_closing_tag(&mut self) {
        let tag = mem::take(&mut self.tag_buffer).to_lowercase();

        if tag.is_empty() || self.stack.is_empty() || tag.chars().count() > MAX_TAG_NAME_LEN {
            self.recover("invalid self-closing tag");
            return;
        }

        if self.capture_head_element(&tag) {
            return;
        }

        let (parent_tag, parent_context) = match self.stack.last() {
            Some(parent) => (parent.node.tag.clone(), parent.node.context),
            None => return,
        };

        let context = determine_context(&tag, &parent_tag, parent_context);
        let mut node = Node::element(tag, context);
        node.attributes = mem::take(&mut self.current_attrs);
        normalize_element(&mut node);
        self.attach(node);
    }

    fn finish_end_tag(&mut self) {
        let tag = mem::take(&mut self.tag_buffer).to_lowercase();

        if tag.is_empty() || self.stack.len() <= 1 || tag.chars().count() > MAX_TAG_NAME_LEN {
            return;
        }

        // Scan from the top for the matching open element; the original
        // spelling matches even after normalization rewrote the tag.
        let mut target = None;
        for i in (1..self.stack.len()).rev() {
            let entry = &self.stack[i];
            if entry.node.tag == tag || entry.original_tag == tag {
                target = Some(i);
                break;
            }
        }

        if let Some(level) = target {
            while self.stack.len() > level {
                self.pop_entry();
            }
        }
    }

    // Tree plumbing

    fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    fn add_text_node(&mut self, content: &str) {
        if content.trim().is_empty() {
            return;
        }
        if let Some(parent) = self.stack.last_mut() {
            parent.node.children.push(Node::text(content));
        }
    }

    fn attach(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.node.children.push(node);
        }
    }

    /// Pops the top entry and attaches its node to the parent, routing head
    /// elements into the document metadata instead of the tree.
    fn pop_entry(&mut self) {
        let Some(entry) = self.stack.pop() else {
            return;
        };
        if self.stack.is_empty() {
            self.stack.push(entry);
            return;
        }
        match entry.node.tag.as_str() {
            "title" => {
                self.metadata.title = Some(entry.node.deep_text().trim().to_string());
            }
            "script" => {
                self.metadata.scripts.push(ScriptRecord {
                    src: entry.node.attr("src").map(str::to_string),
                    content: entry.node.deep_text(),
                    kind: entry.node.attr("type").map(str::to_string),
                });
            }
            "style" => {
                self.metadata.styles.push(StyleRecord {
                    href: None,
                    content: entry.node.deep_text(),
                    media: entry.node.attr("media").map(str::to_string),
                });
            }
            _ => self.attach(entry.node),
        }
    }

    /// Records `meta` and stylesheet `link` elements into the metadata and
    /// keeps them out of the tree. Returns true when the tag was consumed.
    fn capture_head_element(&mut self, tag: &str) -> bool {
        match tag {
            "meta" => {
                let attrs = mem::take(&mut self.current_attrs);
                self.metadata.metas.push(MetaRecord {
                    name: attrs.get("name").cloned(),
                    content: attrs.get("content").cloned(),
                    charset: attrs.get("charset").cloned(),
                });
                true
            }
            "link" => {
                let attrs = mem::take(&mut self.current_attrs);
                if attrs.get("rel").map(String::as_str) == Some("stylesheet") {
                    self.metadata.styles.push(StyleRecord {
                        href: attrs.get("href").cloned(),
                        content: String::new(),
                        media: attrs.get("media").cloned(),
                    });
                }
                true
            }
            _ => false,
        }
    }

    fn store_attribute(&mut self) {
        let name = mem::take(&mut self.attr_name);
        let value = mem::take(&mut self.attr_value);
        self.current_attrs.insert(name, value);
    }

    /// Discards the current tag and resumes scanning text. Past the error
    /// budget the remaining input is abandoned.
    fn recover(&mut self, message: &str) {
        self.error_count += 1;
        debug!(
            "parse recovery ({}/{}): {message}",
            self.error_count, self.max_errors
        );
        if self.error_count > self.max_errors {
            self.halted = true;
            return;
        }
        self.state = ParserState::Text;
        self.tag_buffer.clear();
        self.attr_name.clear();
        self.attr_value.clear();
        self.current_attrs.clear();
    }
}

impl Default for StateMachineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper over a one-shot [`StateMachineParser`].
pub fn parse(input: &str) -> Document {
    StateMachineParser::new().parse(input)
}

fn trim_char_slice(chars: &[char]) -> &[char] {
    let start = chars
        .iter()
        .position(|c| !c.is_whitespace())
        .unwrap_or(chars.len());
    let end = chars
        .iter()
        .rposition(|c| !c.is_whitespace())
        .map(|i| i + 1)
        .unwrap_or(start);
    &chars[start..end]
}

fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "li"
            | "pre"
            | "hr"
            | "table"
            | "thead"
            | "tbody"
            | "tr"
    )
}

fn is_container_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "ul"
            | "ol"
            | "li"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "a"
            | "b"
            | "i"
            | "strong"
            | "em"
            | "span"
            | "pre"
            | "code"
            | "dl"
            | "dt"
            | "dd"
            | "table"
            | "thead"
            | "tbody"
            | "tr"
            | "th"
            | "td"
            | "title"
            | "script"
            | "style"
    )
}

/// Context assignment: children of `p` and `li` are always inline (this is
/// how formatting works uniformly inside paragraphs and list items); block
/// tags get block context under a block or root parent; everything directly
/// under the root defaults to block; the rest inherit from the parent, so
/// an inline subtree stays inline all the way down.
fn determine_context(tag: &str, parent_tag: &str, parent_context: NodeContext) -> NodeContext {
    if parent_tag == "p" || parent_tag == "li" {
        return NodeContext::Inline;
    }
    if is_block_tag(tag)
        && matches!(parent_context, NodeContext::Block | NodeContext::Root)
    {
        return NodeContext::Block;
    }
    if parent_context == NodeContext::Root {
        return NodeContext::Block;
    }
    parent_context
}

fn normalize_element(node: &mut Node) {
    match node.tag.as_str() {
        "b" | "strong" => {
            node.tag = "span".to_string();
            node.attributes
                .insert("style".to_string(), "font-weight: bold".to_string());
        }
        "i" | "em" => {
            node.tag = "span".to_string();
            node.attributes
                .insert("style".to_string(), "font-style: italic".to_string());
        }
        _ => {}
    }
}
