//! XML writer for segmentation documents
//!
//! Pretty-printed output with an XML declaration, matching the shape of the
//! documents the reader accepts: two-space indentation, leaf elements with
//! text on a single line, empty elements self-closed.

use crate::element::Element;

/// Serialize a document with an XML declaration
pub fn write_document(root: &Element) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_element(root, 0, &mut out);
    out
}

fn write_element(el: &Element, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }

    match (&el.text, el.children.is_empty()) {
        (None, true) => {
            out.push_str("/>\n");
        }
        (Some(text), true) => {
            out.push('>');
            escape_into(text, false, out);
            out.push_str("</");
            out.push_str(&el.tag);
            out.push_str(">\n");
        }
        (text, false) => {
            out.push_str(">\n");
            if let Some(text) = text {
                out.push_str(&"  ".repeat(depth + 1));
                escape_into(text, false, out);
                out.push('\n');
            }
            for child in &el.children {
                write_element(child, depth + 1, out);
            }
            out.push_str(&indent);
            out.push_str("</");
            out.push_str(&el.tag);
            out.push_str(">\n");
        }
    }
}

fn escape_into(s: &str, in_attribute: bool, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
