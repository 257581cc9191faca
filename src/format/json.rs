use serde::de::IgnoredAny;

use super::{FormatKind, Formatter};
use crate::error::FormatError;

const INDENT: usize = 2;

/// In-process JSON formatter following prettier's layout for JSON documents.
///
/// Objects and arrays stay on one line (`{ "a": 1 }`, `[1, 2]`) when they fit
/// in the print width at their column, including a trailing comma. Otherwise
/// they break with one member per line and two-space indentation, except
/// arrays of numbers, which are packed as many per line as fit.
///
/// A container is always broken when:
/// - it is an object whose first key starts on a new line in the input,
/// - it is an array of two or more objects (or arrays) that each have more
///   than one entry,
/// - any container nested inside it is broken.
///
/// Strings, keys and numbers are printed exactly as written.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(
        &self,
        contents: &str,
        kind: FormatKind,
        print_width: usize,
    ) -> Result<String, FormatError> {
        if kind != FormatKind::Json {
            return Err(FormatError::Unsupported(kind));
        }

        serde_json::from_str::<IgnoredAny>(contents)
            .map_err(|e| FormatError::syntax(kind, e.to_string()))?;
        let node = Parser::new(contents).document()?;

        let mut out = String::with_capacity(contents.len() + 16);
        Layout { width: print_width }.value(&mut out, &node, 0, 0, 0);
        out.push('\n');
        Ok(out)
    }
}

/// Syntax tree that keeps the source text of every scalar.
#[derive(Debug)]
enum Node<'a> {
    Scalar(&'a str),
    Object {
        entries: Vec<(&'a str, Node<'a>)>,
        expanded: bool,
    },
    Array(Vec<Node<'a>>),
}

impl Node<'_> {
    fn len(&self) -> usize {
        match self {
            Node::Scalar(_) => 0,
            Node::Object { entries, .. } => entries.len(),
            Node::Array(items) => items.len(),
        }
    }

    fn is_number(&self) -> bool {
        matches!(self, Node::Scalar(raw) if raw.starts_with(|c: char| c == '-' || c.is_ascii_digit()))
    }

    fn must_break(&self) -> bool {
        match self {
            Node::Scalar(_) => false,
            Node::Object { entries, expanded } => {
                *expanded || entries.iter().any(|(_, value)| value.must_break())
            }
            Node::Array(items) => {
                breaks_between_items(items) || items.iter().any(Node::must_break)
            }
        }
    }
}

fn breaks_between_items(items: &[Node<'_>]) -> bool {
    let Some(first) = items.first() else {
        return false;
    };
    items.len() > 1
        && items.iter().all(|item| {
            item.len() > 1
                && matches!(
                    (first, item),
                    (Node::Object { .. }, Node::Object { .. }) | (Node::Array(_), Node::Array(_))
                )
        })
}

/// Recursive-descent reader over input that `serde_json` has already accepted.
struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn document(mut self) -> Result<Node<'a>, FormatError> {
        let node = self.value()?;
        self.skip_ws();
        if self.pos != self.src.len() {
            return Err(self.unexpected());
        }
        Ok(node)
    }

    fn value(&mut self) -> Result<Node<'a>, FormatError> {
        self.skip_ws();
        match self.peek() {
            Some(b'{') => self.object(),
            Some(b'[') => self.array(),
            Some(b'"') => self.string().map(Node::Scalar),
            Some(_) => self.literal(),
            None => Err(self.unexpected()),
        }
    }

    fn object(&mut self) -> Result<Node<'a>, FormatError> {
        self.pos += 1;
        let gap_start = self.pos;
        self.skip_ws();
        let expanded = self.src[gap_start..self.pos].contains('\n');

        let mut entries = Vec::new();
        if self.eat(b'}') {
            return Ok(Node::Object { entries, expanded: false });
        }
        loop {
            self.skip_ws();
            let key = self.string()?;
            self.skip_ws();
            if !self.eat(b':') {
                return Err(self.unexpected());
            }
            entries.push((key, self.value()?));
            self.skip_ws();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b'}') {
                return Ok(Node::Object { entries, expanded });
            }
            return Err(self.unexpected());
        }
    }

    fn array(&mut self) -> Result<Node<'a>, FormatError> {
        self.pos += 1;
        self.skip_ws();
        let mut items = Vec::new();
        if self.eat(b']') {
            return Ok(Node::Array(items));
        }
        loop {
            items.push(self.value()?);
            self.skip_ws();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b']') {
                return Ok(Node::Array(items));
            }
            return Err(self.unexpected());
        }
    }

    fn string(&mut self) -> Result<&'a str, FormatError> {
        let start = self.pos;
        if !self.eat(b'"') {
            return Err(self.unexpected());
        }
        loop {
            match self.peek() {
                Some(b'\\') => self.pos += 2,
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(&self.src[start..self.pos]);
                }
                Some(_) => self.pos += 1,
                None => return Err(self.unexpected()),
            }
        }
    }

    fn literal(&mut self) -> Result<Node<'a>, FormatError> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if matches!(byte, b',' | b']' | b'}' | b' ' | b'\t' | b'\n' | b'\r') {
                break;
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.unexpected());
        }
        Ok(Node::Scalar(&self.src[start..self.pos]))
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn unexpected(&self) -> FormatError {
        FormatError::syntax(
            FormatKind::Json,
            format!("unexpected input at byte {}", self.pos),
        )
    }
}

struct Layout {
    width: usize,
}

impl Layout {
    /// Print `node` starting at `column`, with `trailing` characters that must
    /// still fit on the same line after it.
    fn value(
        &self,
        out: &mut String,
        node: &Node<'_>,
        indent: usize,
        column: usize,
        trailing: usize,
    ) {
        if node.len() == 0 {
            out.push_str(&flat(node));
            return;
        }
        if !node.must_break() {
            let flat = flat(node);
            if fits(column, &flat, trailing, self.width) {
                out.push_str(&flat);
                return;
            }
        }
        match node {
            Node::Object { entries, .. } => self.object(out, entries, indent),
            Node::Array(items) if items.len() > 1 && items.iter().all(Node::is_number) => {
                self.packed(out, items, indent)
            }
            Node::Array(items) => self.array(out, items, indent),
            Node::Scalar(raw) => out.push_str(raw),
        }
    }

    fn object(&self, out: &mut String, entries: &[(&str, Node<'_>)], indent: usize) {
        let inner = indent + INDENT;
        out.push_str("{\n");
        for (i, (key, value)) in entries.iter().enumerate() {
            let last = i + 1 == entries.len();
            push_indent(out, inner);
            out.push_str(key);
            out.push_str(": ");
            let column = inner + width_of(key) + 2;
            self.value(out, value, inner, column, usize::from(!last));
            if !last {
                out.push(',');
            }
            out.push('\n');
        }
        push_indent(out, indent);
        out.push('}');
    }

    fn array(&self, out: &mut String, items: &[Node<'_>], indent: usize) {
        let inner = indent + INDENT;
        out.push_str("[\n");
        for (i, item) in items.iter().enumerate() {
            let last = i + 1 == items.len();
            push_indent(out, inner);
            self.value(out, item, inner, inner, usize::from(!last));
            if !last {
                out.push(',');
            }
            out.push('\n');
        }
        push_indent(out, indent);
        out.push(']');
    }

    /// Numbers fill each line before wrapping to the next.
    fn packed(&self, out: &mut String, items: &[Node<'_>], indent: usize) {
        let inner = indent + INDENT;
        out.push_str("[\n");
        push_indent(out, inner);
        let mut column = inner;
        for (i, item) in items.iter().enumerate() {
            let mut text = flat(item);
            if i + 1 < items.len() {
                text.push(',');
            }
            if i > 0 {
                if column + 1 + width_of(&text) <= self.width {
                    out.push(' ');
                    column += 1;
                } else {
                    out.push('\n');
                    push_indent(out, inner);
                    column = inner;
                }
            }
            out.push_str(&text);
            column += width_of(&text);
        }
        out.push('\n');
        push_indent(out, indent);
        out.push(']');
    }
}

/// Single-line rendering with prettier's spacing.
fn flat(node: &Node<'_>) -> String {
    match node {
        Node::Scalar(raw) => (*raw).to_owned(),
        Node::Object { entries, .. } if entries.is_empty() => "{}".to_owned(),
        Node::Object { entries, .. } => {
            let members: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{key}: {}", flat(value)))
                .collect();
            format!("{{ {} }}", members.join(", "))
        }
        Node::Array(items) => {
            let items: Vec<String> = items.iter().map(flat).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn width_of(text: &str) -> usize {
    text.chars().count()
}

fn fits(column: usize, text: &str, trailing: usize, width: usize) -> bool {
    column + width_of(text) + trailing <= width
}

fn push_indent(out: &mut String, width: usize) {
    out.extend(std::iter::repeat_n(' ', width));
}
