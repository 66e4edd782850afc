// ABOUTME: Text helpers for scraped documentation elements.
// ABOUTME: Collects element text, splits paragraphs on <br> and normalizes whitespace.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// Returns the concatenated text of an element and its descendants.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Removes non-breaking spaces, which the reference uses for indentation.
pub fn strip_nbsp(s: &str) -> String {
    s.replace('\u{a0}', "")
}

/// Splits a paragraph into its visual lines.
///
/// A `<br>` child ends the current line; text of any other child (including
/// inline elements) is appended to it. Lines are trimmed and empty lines dropped.
pub fn paragraph_lines(el: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for child in el.children() {
        match child.value() {
            Node::Element(e) if e.name().eq_ignore_ascii_case("br") => {
                push_line(&mut lines, &current);
                current.clear();
            }
            _ => collect_text(child, &mut current),
        }
    }
    push_line(&mut lines, &current);
    lines
}

fn push_line(lines: &mut Vec<String>, line: &str) {
    let trimmed = line.trim();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&**text),
        Node::Element(_) => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

/// Collapses multiple whitespace characters into single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_space = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    result.trim().to_string()
}
