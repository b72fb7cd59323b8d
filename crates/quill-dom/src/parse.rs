//! Permissive HTML-fragment parser.
//!
//! Editor content arrives as markup strings authored by the editor itself
//! or pasted in by users, so the parser recovers from anything: unclosed
//! elements are closed at end of input, stray close tags are dropped, and
//! a `<` that does not start a tag is literal text. Parsing never fails.

use smol_str::SmolStr;
use tracing::debug;

use crate::escape::decode_entity;
use crate::node::{Element, Fragment, Node, RAW_TEXT_TAGS, VOID_TAGS};

/// Parse a markup string into a fragment.
pub fn parse_fragment(input: &str) -> Fragment {
    Parser::new(input).run()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    roots: Vec<Node>,
    stack: Vec<Element>,
    text: String,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            roots: Vec::new(),
            stack: Vec::new(),
            text: String::new(),
        }
    }

    fn run(mut self) -> Fragment {
        while self.pos < self.input.len() {
            if self.rest().starts_with("<!--") {
                self.flush_text();
                self.skip_comment();
            } else if self.rest().starts_with("<!") {
                self.flush_text();
                self.skip_until('>');
            } else if self.rest().starts_with("</") {
                self.flush_text();
                self.close_tag();
            } else if self.at_open_tag() {
                self.flush_text();
                self.open_tag();
            } else {
                self.text_char();
            }
        }
        self.flush_text();

        // Close anything left open at end of input.
        while let Some(el) = self.stack.pop() {
            self.append(Node::Element(el));
        }

        Fragment { children: self.roots }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn at_open_tag(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    }

    /// Consume one char of text content, decoding entities.
    fn text_char(&mut self) {
        let ch = self.bump().unwrap_or_default();
        if ch == '&' {
            // Entity: up to 10 chars of body then ';'.
            let rest = self.rest();
            if let Some(end) = rest.find(';').filter(|&e| e > 0 && e <= 10) {
                if let Some(decoded) = decode_entity(&rest[..end]) {
                    self.text.push(decoded);
                    self.pos += end + 1;
                    return;
                }
            }
            self.text.push('&');
        } else {
            self.text.push(ch);
        }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.append(Node::Text(text));
        }
    }

    fn skip_comment(&mut self) {
        match self.rest().find("-->") {
            Some(end) => self.pos += end + 3,
            None => self.pos = self.input.len(),
        }
    }

    fn skip_until(&mut self, delim: char) {
        match self.rest().find(delim) {
            Some(end) => self.pos += end + delim.len_utf8(),
            None => self.pos = self.input.len(),
        }
    }

    fn read_name(&mut self) -> SmolStr {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == ':' {
                self.bump();
            } else {
                break;
            }
        }
        SmolStr::new(self.input[start..self.pos].to_ascii_lowercase())
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
    }

    fn open_tag(&mut self) {
        self.bump(); // '<'
        let tag = self.read_name();
        let mut el = Element::new(tag.clone());
        let mut self_closed = false;

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.bump();
                    break;
                }
                Some('/') => {
                    self.bump();
                    if self.peek() == Some('>') {
                        self.bump();
                        self_closed = true;
                        break;
                    }
                }
                Some(_) => {
                    let name = self.read_name();
                    if name.is_empty() {
                        // Not an attribute name: skip one char to make progress.
                        self.bump();
                        continue;
                    }
                    self.skip_whitespace();
                    let value = if self.peek() == Some('=') {
                        self.bump();
                        self.skip_whitespace();
                        self.read_attr_value()
                    } else {
                        String::new()
                    };
                    el.set_attr(name, value);
                }
            }
        }

        if self_closed || VOID_TAGS.contains(&tag.as_str()) {
            self.append(Node::Element(el));
        } else if RAW_TEXT_TAGS.contains(&tag.as_str()) {
            self.read_raw_text(&mut el);
            self.append(Node::Element(el));
        } else {
            self.stack.push(el);
        }
    }

    fn read_attr_value(&mut self) -> String {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let mut value = String::new();
                while let Some(ch) = self.bump() {
                    if ch == quote {
                        break;
                    }
                    if ch == '&' {
                        let rest = self.rest();
                        if let Some(end) = rest.find(';').filter(|&e| e > 0 && e <= 10) {
                            if let Some(decoded) = decode_entity(&rest[..end]) {
                                value.push(decoded);
                                self.pos += end + 1;
                                continue;
                            }
                        }
                    }
                    value.push(ch);
                }
                value
            }
            _ => {
                let start = self.pos;
                while let Some(ch) = self.peek() {
                    if ch.is_ascii_whitespace() || ch == '>' || ch == '/' {
                        break;
                    }
                    self.bump();
                }
                self.input[start..self.pos].to_string()
            }
        }
    }

    /// Consume raw text content up to the matching close tag.
    fn read_raw_text(&mut self, el: &mut Element) {
        let close = format!("</{}", el.tag);
        let rest = self.rest();
        let lower = rest.to_ascii_lowercase();
        let end = lower.find(&close).unwrap_or(rest.len());
        if end > 0 {
            el.children.push(Node::Text(rest[..end].to_string()));
        }
        self.pos += end;
        if self.pos < self.input.len() {
            self.skip_until('>');
        }
    }

    fn close_tag(&mut self) {
        self.pos += 2; // '</'
        let tag = self.read_name();
        self.skip_until('>');

        match self.stack.iter().rposition(|el| el.tag == tag) {
            Some(idx) => {
                // Implicitly close everything opened after the match.
                while self.stack.len() > idx + 1 {
                    let el = self.stack.pop().unwrap_or_else(|| Element::new(""));
                    self.append(Node::Element(el));
                }
                if let Some(el) = self.stack.pop() {
                    self.append(Node::Element(el));
                }
            }
            None => {
                debug!(tag = %tag, "dropping close tag with no matching open element");
            }
        }
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }
}
