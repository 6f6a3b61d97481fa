//! Rank-based layout for the builtin engine
//!
//! Nodes are assigned to ranks by longest path from the sources, with back
//! edges ignored so cycles still lay out. Within a rank nodes keep their
//! declaration order. Coordinates are in points with the origin at the top
//! left.

use std::collections::{HashMap, VecDeque};

use tracing::trace;
use unicode_width::UnicodeWidthStr;

use super::label::{edge_label_lines, node_label_lines};
use super::parser::DotGraph;

pub const POINTS_PER_INCH: f64 = 72.0;

const CHAR_WIDTH: f64 = 7.0;
const LINE_HEIGHT: f64 = 14.0;
const PADDING: f64 = 8.0;
const MIN_WIDTH: f64 = 54.0;
const MIN_HEIGHT: f64 = 36.0;
const RANK_SEP: f64 = 36.0;
const NODE_SEP: f64 = 18.0;
const MARGIN: f64 = 4.0;

/// Direction ranks advance in, from the `rankdir` graph attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

impl RankDir {
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_uppercase()).as_deref() {
            Some("LR") => RankDir::LeftRight,
            Some("RL") => RankDir::RightLeft,
            Some("BT") => RankDir::BottomTop,
            _ => RankDir::TopBottom,
        }
    }

    fn is_horizontal(&self) -> bool {
        matches!(self, RankDir::LeftRight | RankDir::RightLeft)
    }

    fn is_reversed(&self) -> bool {
        matches!(self, RankDir::BottomTop | RankDir::RightLeft)
    }
}

/// A positioned node; `x` and `y` are the center
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub id: String,
    pub lines: Vec<String>,
    pub rank: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NodeBox {
    /// Point where the segment from the center toward `(tx, ty)` leaves the box
    fn boundary_toward(&self, tx: f64, ty: f64) -> (f64, f64) {
        let dx = tx - self.x;
        let dy = ty - self.y;
        if dx == 0.0 && dy == 0.0 {
            return (self.x, self.y);
        }
        let sx = if dx == 0.0 {
            f64::INFINITY
        } else {
            (self.width / 2.0) / dx.abs()
        };
        let sy = if dy == 0.0 {
            f64::INFINITY
        } else {
            (self.height / 2.0) / dy.abs()
        };
        let scale = sx.min(sy).min(1.0);
        (self.x + dx * scale, self.y + dy * scale)
    }
}

/// A straight edge between two node boundaries
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub tail: String,
    pub head: String,
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub label: Vec<String>,
}

impl EdgePath {
    pub fn midpoint(&self) -> (f64, f64) {
        (
            (self.start.0 + self.end.0) / 2.0,
            (self.start.1 + self.end.1) / 2.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeBox>,
    pub edges: Vec<EdgePath>,
}

impl Layout {
    /// Lay out every node and edge of `graph`
    pub fn compute(graph: &DotGraph) -> Self {
        let rankdir = RankDir::from_attribute(graph.attribute("rankdir"));
        let ranks = assign_ranks(graph);

        let mut nodes: Vec<NodeBox> = graph
            .nodes
            .iter()
            .zip(&ranks)
            .map(|(node, &rank)| {
                let lines = node_label_lines(node);
                let (width, height) =
                    measure(&lines, node.attribute("width"), node.attribute("height"));
                NodeBox {
                    id: node.id.clone(),
                    lines,
                    rank,
                    x: 0.0,
                    y: 0.0,
                    width,
                    height,
                }
            })
            .collect();

        let (width, height) = position(&mut nodes, rankdir);
        trace!(nodes = nodes.len(), width, height, "Computed node positions");

        let lookup: HashMap<&str, &NodeBox> =
            nodes.iter().map(|node| (node.id.as_str(), node)).collect();
        let edges = graph
            .edges
            .iter()
            .filter_map(|edge| {
                let tail = lookup.get(edge.tail.as_str())?;
                let head = lookup.get(edge.head.as_str())?;
                Some(EdgePath {
                    tail: edge.tail.clone(),
                    head: edge.head.clone(),
                    start: tail.boundary_toward(head.x, head.y),
                    end: head.boundary_toward(tail.x, tail.y),
                    label: edge_label_lines(edge),
                })
            })
            .collect();

        Self {
            width,
            height,
            nodes,
            edges,
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeBox> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Size a node from its label, honoring `width`/`height` (inches) as minimums
fn measure(lines: &[String], width: Option<&str>, height: Option<&str>) -> (f64, f64) {
    let widest = lines.iter().map(|line| line.width()).max().unwrap_or(0);
    let text_width = widest as f64 * CHAR_WIDTH + 2.0 * PADDING;
    let text_height = lines.len().max(1) as f64 * LINE_HEIGHT + 2.0 * PADDING;

    let min_inches = |value: Option<&str>, fallback: f64| {
        value
            .and_then(|v| v.trim().parse::<f64>().ok())
            .map(|inches| inches * POINTS_PER_INCH)
            .unwrap_or(fallback)
    };

    (
        text_width.max(min_inches(width, MIN_WIDTH)),
        text_height.max(min_inches(height, MIN_HEIGHT)),
    )
}

/// Longest-path ranking over the edges that do not close a cycle
fn assign_ranks(graph: &DotGraph) -> Vec<usize> {
    let count = graph.nodes.len();
    let index: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); count];
    for edge in &graph.edges {
        if let (Some(&tail), Some(&head)) =
            (index.get(edge.tail.as_str()), index.get(edge.head.as_str()))
        {
            adjacency[tail].push(head);
        }
    }

    let forward = forward_edges(&adjacency);

    let mut in_degree = vec![0usize; count];
    for targets in &forward {
        for &head in targets {
            in_degree[head] += 1;
        }
    }

    let mut ranks = vec![0usize; count];
    let mut queue: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
    while let Some(tail) = queue.pop_front() {
        for &head in &forward[tail] {
            ranks[head] = ranks[head].max(ranks[tail] + 1);
            in_degree[head] -= 1;
            if in_degree[head] == 0 {
                queue.push_back(head);
            }
        }
    }
    ranks
}

/// Drop edges that point back to a node on the current DFS path
fn forward_edges(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let count = adjacency.len();
    let mut marks = vec![Mark::Unvisited; count];
    let mut forward: Vec<Vec<usize>> = vec![Vec::new(); count];

    for root in 0..count {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        // Iterative DFS: (node, next child position)
        let mut stack = vec![(root, 0usize)];
        marks[root] = Mark::OnPath;
        while let Some(top) = stack.last_mut() {
            let node = top.0;
            if let Some(&child) = adjacency[node].get(top.1) {
                top.1 += 1;
                match marks[child] {
                    Mark::OnPath => {}
                    Mark::Done => forward[node].push(child),
                    Mark::Unvisited => {
                        forward[node].push(child);
                        marks[child] = Mark::OnPath;
                        stack.push((child, 0));
                    }
                }
            } else {
                marks[node] = Mark::Done;
                stack.pop();
            }
        }
    }
    forward
}

/// Place nodes rank by rank and return the drawing size
fn position(nodes: &mut [NodeBox], rankdir: RankDir) -> (f64, f64) {
    if nodes.is_empty() {
        return (2.0 * MARGIN, 2.0 * MARGIN);
    }

    let horizontal = rankdir.is_horizontal();
    let main_size = |node: &NodeBox| if horizontal { node.width } else { node.height };
    let cross_size = |node: &NodeBox| if horizontal { node.height } else { node.width };

    let rank_count = nodes.iter().map(|node| node.rank).max().unwrap_or(0) + 1;
    let mut rank_main = vec![0.0f64; rank_count];
    let mut rank_cross = vec![0.0f64; rank_count];
    let mut rank_members = vec![0usize; rank_count];
    for node in nodes.iter() {
        rank_main[node.rank] = rank_main[node.rank].max(main_size(node));
        rank_cross[node.rank] += cross_size(node);
        rank_members[node.rank] += 1;
    }
    for rank in 0..rank_count {
        if rank_members[rank] > 1 {
            rank_cross[rank] += NODE_SEP * (rank_members[rank] - 1) as f64;
        }
    }

    let mut rank_offset = vec![0.0f64; rank_count];
    let mut cursor = 0.0;
    for rank in 0..rank_count {
        rank_offset[rank] = cursor;
        cursor += rank_main[rank];
        if rank_members[rank] > 0 {
            cursor += RANK_SEP;
        }
    }
    let total_main = (cursor - RANK_SEP).max(0.0);
    let total_cross = rank_cross.iter().cloned().fold(0.0, f64::max);

    let mut cross_cursor: Vec<f64> = rank_cross
        .iter()
        .map(|extent| (total_cross - extent) / 2.0)
        .collect();

    for node in nodes.iter_mut() {
        let cross = cross_size(node);
        let cross_center = cross_cursor[node.rank] + cross / 2.0;
        cross_cursor[node.rank] += cross + NODE_SEP;

        let mut main_center = rank_offset[node.rank] + rank_main[node.rank] / 2.0;
        if rankdir.is_reversed() {
            main_center = total_main - main_center;
        }

        let (x, y) = if horizontal {
            (main_center, cross_center)
        } else {
            (cross_center, main_center)
        };
        node.x = x + MARGIN;
        node.y = y + MARGIN;
    }

    let (width, height) = if horizontal {
        (total_main, total_cross)
    } else {
        (total_cross, total_main)
    };
    (width + 2.0 * MARGIN, height + 2.0 * MARGIN)
}
