//! SVG and Graphviz `plain` output for the builtin engine

use std::collections::HashMap;
use std::io::{self, Write};

use super::layout::{Layout, NodeBox, POINTS_PER_INCH};
use super::parser::{DotGraph, DotNode};

const FONT_SIZE: f64 = 12.0;
const LINE_HEIGHT: f64 = 14.0;

/// Write `layout` as a standalone SVG document
pub fn write_svg<W: Write>(out: &mut W, graph: &DotGraph, layout: &Layout) -> io::Result<()> {
    writeln!(
        out,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#
    )?;
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}pt" height="{h:.0}pt" viewBox="0 0 {w:.2} {h:.2}">"#,
        w = layout.width,
        h = layout.height
    )?;
    if let Some(name) = &graph.name {
        writeln!(out, "<title>{}</title>", escape_xml(name))?;
    }
    writeln!(
        out,
        r#"<style>
  .node {{ fill: white; stroke: black; stroke-width: 1; }}
  .edge {{ stroke: black; stroke-width: 1; fill: none; }}
  text {{ font-family: Helvetica, Arial, sans-serif; font-size: {FONT_SIZE}px; }}
</style>"#
    )?;
    if graph.directed {
        writeln!(
            out,
            r#"<defs><marker id="arrowhead" markerWidth="10" markerHeight="7" refX="10" refY="3.5" orient="auto"><polygon points="0 0, 10 3.5, 0 7" /></marker></defs>"#
        )?;
    }

    // Edges first so nodes paint over their ends
    for edge in &layout.edges {
        let marker = if graph.directed {
            r#" marker-end="url(#arrowhead)""#
        } else {
            ""
        };
        writeln!(
            out,
            r#"<line class="edge" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"{} />"#,
            edge.start.0, edge.start.1, edge.end.0, edge.end.1, marker
        )?;
        if !edge.label.is_empty() {
            let (x, y) = edge.midpoint();
            write_text(out, &edge.label, x, y)?;
        }
    }

    let parsed = parsed_nodes(graph);
    for node in &layout.nodes {
        let shape = parsed
            .get(node.id.as_str())
            .and_then(|n| n.attribute("shape"))
            .unwrap_or("ellipse");
        write_node_shape(out, node, shape)?;
        write_text(out, &node.lines, node.x, node.y)?;
    }

    writeln!(out, "</svg>")?;
    Ok(())
}

fn write_node_shape<W: Write>(out: &mut W, node: &NodeBox, shape: &str) -> io::Result<()> {
    match shape {
        "none" | "plaintext" | "plain" => Ok(()),
        "ellipse" | "oval" | "circle" => writeln!(
            out,
            r#"<ellipse class="node" cx="{:.2}" cy="{:.2}" rx="{:.2}" ry="{:.2}" />"#,
            node.x,
            node.y,
            node.width / 2.0,
            node.height / 2.0
        ),
        _ => writeln!(
            out,
            r#"<rect class="node" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" />"#,
            node.x - node.width / 2.0,
            node.y - node.height / 2.0,
            node.width,
            node.height
        ),
    }
}

/// Centered multi-line text around `(x, y)`
fn write_text<W: Write>(out: &mut W, lines: &[String], x: f64, y: f64) -> io::Result<()> {
    let first_baseline = y - (lines.len() as f64 - 1.0) * LINE_HEIGHT / 2.0 + FONT_SIZE / 3.0;
    write!(out, r#"<text text-anchor="middle">"#)?;
    for (i, line) in lines.iter().enumerate() {
        write!(
            out,
            r#"<tspan x="{:.2}" y="{:.2}">{}</tspan>"#,
            x,
            first_baseline + i as f64 * LINE_HEIGHT,
            escape_xml(line)
        )?;
    }
    writeln!(out, "</text>")
}

/// Write `layout` in the Graphviz `plain` text format
///
/// Units are inches with the origin at the bottom left. Edges are written as
/// a four point straight spline.
pub fn write_plain<W: Write>(out: &mut W, graph: &DotGraph, layout: &Layout) -> io::Result<()> {
    let inches = |points: f64| points / POINTS_PER_INCH;
    let flip = |y: f64| inches(layout.height - y);

    writeln!(
        out,
        "graph 1 {:.3} {:.3}",
        inches(layout.width),
        inches(layout.height)
    )?;

    let parsed = parsed_nodes(graph);
    for node in &layout.nodes {
        let attribute = |key: &str, fallback: &'static str| {
            parsed
                .get(node.id.as_str())
                .and_then(|n| n.attribute(key))
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string())
        };
        writeln!(
            out,
            "node {} {:.3} {:.3} {:.3} {:.3} {} {} {} {} {}",
            quote(&node.id),
            inches(node.x),
            flip(node.y),
            inches(node.width),
            inches(node.height),
            quote(&node.lines.join("\\n")),
            quote(&attribute("style", "solid")),
            quote(&attribute("shape", "ellipse")),
            quote(&attribute("color", "black")),
            quote(&attribute("fillcolor", "lightgrey")),
        )?;
    }

    for edge in &layout.edges {
        write!(out, "edge {} {} 4", quote(&edge.tail), quote(&edge.head))?;
        let (x0, y0) = edge.start;
        let (x1, y1) = edge.end;
        for step in 0..4 {
            let t = step as f64 / 3.0;
            write!(
                out,
                " {:.3} {:.3}",
                inches(x0 + (x1 - x0) * t),
                flip(y0 + (y1 - y0) * t)
            )?;
        }
        if !edge.label.is_empty() {
            let (x, y) = edge.midpoint();
            write!(
                out,
                " {} {:.3} {:.3}",
                quote(&edge.label.join("\\n")),
                inches(x),
                flip(y)
            )?;
        }
        writeln!(out, " solid black")?;
    }

    writeln!(out, "stop")?;
    Ok(())
}

fn parsed_nodes(graph: &DotGraph) -> HashMap<&str, &DotNode> {
    graph
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect()
}

/// Quote a plain-format string unless it is a simple identifier
fn quote(value: &str) -> String {
    let simple = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if simple {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('"', "\\\""))
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
