//! HTML writing helpers shared by the controls and the renderer

use super::schema::{Label, LabelSegment};

/// Write ` name="value"` with the value escaped
pub(crate) fn write_attr(html: &mut String, name: &str, value: &str) {
    html.push(' ');
    html.push_str(name);
    html.push_str("=\"");
    html.push_str(&escape_attr(value));
    html.push('"');
}

/// Write ` name="value"` when a value is present
pub(crate) fn write_opt_attr(html: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        write_attr(html, name, value);
    }
}

/// Write a boolean attribute (` name`) when `on`
pub(crate) fn write_flag(html: &mut String, name: &str, on: bool) {
    if on {
        html.push(' ');
        html.push_str(name);
    }
}

/// Join class names, skipping empty ones
pub(crate) fn class_list(classes: &[&str]) -> String {
    classes
        .iter()
        .map(|class| class.trim())
        .filter(|class| !class.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write label content, escaping text and rendering links as anchors
pub(crate) fn write_label(html: &mut String, label: &Label) {
    match label {
        Label::Text(text) => html.push_str(&escape_html(text)),
        Label::Rich(segments) => {
            for segment in segments {
                match segment {
                    LabelSegment::Text(text) => html.push_str(&escape_html(text)),
                    LabelSegment::Link { href, text } => {
                        html.push_str("<a");
                        write_attr(html, "href", href);
                        write_attr(html, "class", "underline");
                        html.push('>');
                        html.push_str(&escape_html(text));
                        html.push_str("</a>");
                    }
                }
            }
        }
    }
}

/// Escape a string for use in HTML attribute values
pub(crate) fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a string for use in HTML content
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
