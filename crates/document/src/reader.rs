//! XML reader for segmentation documents
//!
//! A hand-written parser for the XML subset segmentation files actually
//! use: one root element, attributes with single or double quotes, text
//! content with the five predefined entities, comments, and an optional
//! XML declaration. Namespaces, CDATA sections, DOCTYPEs, and processing
//! instructions other than the declaration are rejected.

use crate::element::Element;
use sff_core::{MigrateError, Result};

/// Parse a document from its textual form
///
/// Returns the root element. Fails with `Parse` on any syntax the subset
/// does not cover.
pub fn parse_document(input: &str) -> Result<Element> {
    let mut parser = Parser::new(input);
    parser.skip_prolog()?;
    let root = parser.parse_element()?;
    parser.skip_misc()?;
    if !parser.at_end() {
        return Err(parser.error("trailing content after root element"));
    }
    Ok(root)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, msg: &str) -> MigrateError {
        MigrateError::Parse(format!("{} at byte {}", msg, self.pos))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s.as_bytes())
    }

    fn expect(&mut self, s: &str) -> Result<()> {
        if self.starts_with(s) {
            self.pos += s.len();
            Ok(())
        } else {
            Err(self.error(&format!("expected {:?}", s)))
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Skip the XML declaration, comments, and whitespace before the root
    fn skip_prolog(&mut self) -> Result<()> {
        self.skip_whitespace();
        if self.starts_with("<?xml") {
            match self.input[self.pos..]
                .windows(2)
                .position(|w| w == b"?>")
            {
                Some(offset) => self.pos += offset + 2,
                None => return Err(self.error("unterminated XML declaration")),
            }
        }
        self.skip_misc()
    }

    /// Skip whitespace and comments between markup
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.starts_with("<!--") {
                self.skip_comment()?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_comment(&mut self) -> Result<()> {
        self.expect("<!--")?;
        match self.input[self.pos..]
            .windows(3)
            .position(|w| w == b"-->")
        {
            Some(offset) => {
                self.pos += offset + 3;
                Ok(())
            }
            None => Err(self.error("unterminated comment")),
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected a name"));
        }
        // Names are restricted to ASCII above, so this cannot fail
        Ok(String::from_utf8_lossy(&self.input[start..self.pos]).into_owned())
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect("<")?;
        if matches!(self.peek(), Some(b'!' | b'?')) {
            return Err(self.error("unsupported markup"));
        }
        let tag = self.parse_name()?;
        let mut element = Element::new(tag);

        // Attributes
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'>') | Some(b'/') => break,
                Some(_) => {
                    let name = self.parse_name()?;
                    self.skip_whitespace();
                    self.expect("=")?;
                    self.skip_whitespace();
                    let value = self.parse_attr_value()?;
                    element.attributes.push((name, value));
                }
                None => return Err(self.error("unterminated start tag")),
            }
        }

        if self.peek() == Some(b'/') {
            self.expect("/")?;
            self.expect(">")?;
            return Ok(element);
        }
        self.expect(">")?;

        // Content: text and child elements
        let mut text = String::new();
        loop {
            if self.starts_with("<!--") {
                self.skip_comment()?;
                continue;
            }
            if self.starts_with("</") {
                break;
            }
            match self.peek() {
                Some(b'<') => {
                    element.children.push(self.parse_element()?);
                }
                Some(_) => {
                    text.push_str(&self.parse_text()?);
                }
                None => return Err(self.error("unterminated element content")),
            }
        }

        self.expect("</")?;
        let close = self.parse_name()?;
        if close != element.tag {
            return Err(self.error(&format!(
                "mismatched close tag: expected </{}>, got </{}>",
                element.tag, close
            )));
        }
        self.skip_whitespace();
        self.expect(">")?;

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            element.text = Some(trimmed.to_string());
        }
        Ok(element)
    }

    fn parse_attr_value(&mut self) -> Result<String> {
        let quote = match self.bump() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error("expected quoted attribute value")),
        };
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(b) if b == quote => {
                    self.pos += 1;
                    return Ok(value);
                }
                Some(b'&') => value.push(self.parse_entity()?),
                Some(b'<') => return Err(self.error("'<' in attribute value")),
                Some(_) => value.push_str(self.take_char()?),
                None => return Err(self.error("unterminated attribute value")),
            }
        }
    }

    fn parse_text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(b'<') | None => return Ok(text),
                Some(b'&') => text.push(self.parse_entity()?),
                Some(_) => text.push_str(self.take_char()?),
            }
        }
    }

    /// Consume one UTF-8 scalar and return it as a str slice
    fn take_char(&mut self) -> Result<&'a str> {
        let rest = std::str::from_utf8(&self.input[self.pos..])
            .map_err(|_| MigrateError::Parse(format!("invalid UTF-8 at byte {}", self.pos)))?;
        let ch = rest.chars().next().ok_or_else(|| self.error("unexpected end of input"))?;
        let len = ch.len_utf8();
        let s = &rest[..len];
        self.pos += len;
        Ok(s)
    }

    fn parse_entity(&mut self) -> Result<char> {
        self.expect("&")?;
        let end = self.input[self.pos..]
            .iter()
            .position(|&b| b == b';')
            .ok_or_else(|| self.error("unterminated entity reference"))?;
        let name = std::str::from_utf8(&self.input[self.pos..self.pos + end])
            .map_err(|_| self.error("invalid entity reference"))?;
        let ch = match name {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            other => {
                return Err(MigrateError::Parse(format!(
                    "unknown entity reference &{};",
                    other
                )))
            }
        };
        self.pos += end + 1;
        Ok(ch)
    }
}
