//! Label text extraction
//!
//! Turns DOT label values into display lines: HTML labels lose their markup
//! (rows and `<br/>` become line breaks), record labels drop their `<port>`
//! tags and split on `|`, and the `\n`, `\l`, `\r` escapes break lines.

use super::parser::{DotEdge, DotNode, DotValue};

/// Display lines for a node, defaulting to its id
pub fn node_label_lines(node: &DotNode) -> Vec<String> {
    let default = DotValue::plain("\\N");
    let label = node.value("label").unwrap_or(&default);
    let record = matches!(node.attribute("shape"), Some("record") | Some("Mrecord"));
    let lines = label_lines(label, &node.id, record);
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Display lines for an edge label; empty when the edge has none
pub fn edge_label_lines(edge: &DotEdge) -> Vec<String> {
    edge.value("label")
        .map(|label| label_lines(label, "", false))
        .unwrap_or_default()
}

fn label_lines(label: &DotValue, id: &str, record: bool) -> Vec<String> {
    let text = if label.html {
        strip_html(&label.text)
    } else {
        let mut text = label
            .text
            .replace("\\N", id)
            .replace("\\n", "\n")
            .replace("\\l", "\n")
            .replace("\\r", "\n");
        if record {
            text = strip_ports(&text).replace(['{', '}'], "").replace('|', "\n");
        }
        text
    };

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Drop `<port>` tags from record fields; `\<` and `\>` stay as text
fn strip_ports(record: &str) -> String {
    let mut text = String::with_capacity(record.len());
    let mut chars = record.chars();
    let mut in_port = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ ('<' | '>')) if !in_port => text.push(escaped),
                Some(other) if !in_port => {
                    text.push('\\');
                    text.push(other);
                }
                _ => {}
            },
            '<' => in_port = true,
            '>' => in_port = false,
            _ if in_port => {}
            _ => text.push(c),
        }
    }
    text
}

/// Drop tags, breaking lines at rows and `<br/>`, and decode basic entities
fn strip_html(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('>').unwrap_or(after.len());
        let tag = after[..close].trim().to_lowercase();
        if tag.starts_with("br") || tag == "/tr" {
            text.push('\n');
        } else if tag == "/td" {
            text.push(' ');
        }
        rest = after.get(close + 1..).unwrap_or("");
    }
    text.push_str(rest);
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn node(id: &str, attributes: &[(&str, &str)]) -> DotNode {
        DotNode {
            id: id.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), DotValue::plain(*v)))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn html_node(markup: &str) -> DotNode {
        DotNode {
            id: "t".to_string(),
            attributes: [("label".to_string(), DotValue::html(markup))]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_default_label_is_id() {
        assert_eq!(node_label_lines(&node("BOOKS", &[])), ["BOOKS"]);
    }

    #[test]
    fn test_escaped_line_breaks() {
        let lines = node_label_lines(&node("t", &[("label", "PUBLIC\\nBOOKS\\l")]));
        assert_eq!(lines, ["PUBLIC", "BOOKS"]);
    }

    #[test]
    fn test_html_table_rows_become_lines() {
        let label = concat!(
            "<table><tr><td>BOOKS</td><td>[table]</td></tr>",
            "<tr><td>ID</td><td>INTEGER</td></tr></table>"
        );
        let lines = node_label_lines(&html_node(label));
        assert_eq!(lines, ["BOOKS [table]", "ID INTEGER"]);
    }

    #[test]
    fn test_html_entities_decoded() {
        let lines = node_label_lines(&html_node("a &amp; b<br/>&lt;c&gt;"));
        assert_eq!(lines, ["a & b", "<c>"]);
    }

    #[test]
    fn test_record_fields_split() {
        let lines = node_label_lines(&node(
            "t",
            &[("label", "{BOOKS|ID|TITLE}"), ("shape", "record")],
        ));
        assert_eq!(lines, ["BOOKS", "ID", "TITLE"]);
    }

    #[test]
    fn test_record_port_tags_dropped() {
        let lines = node_label_lines(&node(
            "t",
            &[("label", "{<f0> BOOKS|<f1> ID|<f2> \\<TITLE\\>}"), ("shape", "record")],
        ));
        assert_eq!(lines, ["BOOKS", "ID", "<TITLE>"]);
    }

    #[test]
    fn test_quoted_angle_brackets_stay_text() {
        let lines = node_label_lines(&node("t", &[("label", "<none>")]));
        assert_eq!(lines, ["<none>"]);
    }

    #[test]
    fn test_empty_label_keeps_one_line() {
        assert_eq!(node_label_lines(&node("t", &[("label", "")])), [""]);
    }

    #[test]
    fn test_edge_label() {
        let edge = DotEdge {
            tail: "a".to_string(),
            head: "b".to_string(),
            attributes: [("label".to_string(), DotValue::plain("FK_AUTHOR"))]
                .into_iter()
                .collect(),
        };
        assert_eq!(edge_label_lines(&edge), ["FK_AUTHOR"]);
        assert!(edge_label_lines(&DotEdge::default()).is_empty());
    }
}
