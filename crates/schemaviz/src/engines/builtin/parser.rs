//! DOT parser using chumsky
//!
//! Covers the part of the DOT language that schema diagrams use: `graph` and
//! `digraph` (optionally `strict`), attribute statements, `id = id`
//! assignments, node and edge statements, nested subgraphs, quoted strings
//! with `+` concatenation, HTML strings and `/* */` comments. Keywords are
//! case-insensitive. Ports on node ids (`"table":"column":w`) are accepted
//! and dropped.
//!
//! `//` and `#` line comments are not supported. The renderer joins the
//! source into one line before any engine sees it, so a line comment would
//! swallow the rest of the graph.

use std::collections::{BTreeMap, HashMap};

use anyhow::{anyhow, Result};
use chumsky::prelude::*;

type Extra<'src> = extra::Err<Rich<'src, char>>;
type Attributes = Vec<(String, DotValue)>;

/// An attribute value, remembering whether it was written as `<...>` HTML
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DotValue {
    pub text: String,
    pub html: bool,
}

impl DotValue {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: false,
        }
    }

    /// HTML value; `markup` excludes the outer angle brackets
    pub fn html(markup: impl Into<String>) -> Self {
        Self {
            text: markup.into(),
            html: true,
        }
    }
}

/// A parsed graph with subgraphs flattened and attribute defaults applied
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DotGraph {
    pub strict: bool,
    pub directed: bool,
    pub name: Option<String>,
    pub attributes: BTreeMap<String, DotValue>,
    pub nodes: Vec<DotNode>,
    pub edges: Vec<DotEdge>,
}

impl DotGraph {
    pub fn node(&self, id: &str) -> Option<&DotNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.value(key).map(|value| value.text.as_str())
    }

    pub fn value(&self, key: &str) -> Option<&DotValue> {
        self.attributes.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DotNode {
    pub id: String,
    pub attributes: BTreeMap<String, DotValue>,
}

impl DotNode {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.value(key).map(|value| value.text.as_str())
    }

    pub fn value(&self, key: &str) -> Option<&DotValue> {
        self.attributes.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DotEdge {
    pub tail: String,
    pub head: String,
    pub attributes: BTreeMap<String, DotValue>,
}

impl DotEdge {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.value(key).map(|value| value.text.as_str())
    }

    pub fn value(&self, key: &str) -> Option<&DotValue> {
        self.attributes.get(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrTarget {
    Graph,
    Node,
    Edge,
}

#[derive(Debug, Clone, PartialEq)]
enum Statement {
    Attr(AttrTarget, Attributes),
    Assign(String, DotValue),
    Node(String, Attributes),
    Edge(Vec<String>, Attributes),
    Subgraph(Vec<Statement>),
}

/// Parse DOT source into a [`DotGraph`]
pub fn parse_dot(source: &str) -> Result<DotGraph> {
    let (((strict, directed), name), statements) = graph_parser()
        .parse(source)
        .into_result()
        .map_err(|errors| {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| format!("{} at offset {}", e, e.span().start))
                .collect();
            anyhow!("{}", messages.join("; "))
        })?;

    let mut builder = GraphBuilder::new(strict, directed, name);
    builder.apply(statements);
    Ok(builder.finish())
}

fn graph_parser<'src>(
) -> impl Parser<'src, &'src str, (((bool, bool), Option<String>), Vec<Statement>), Extra<'src>>
{
    let strict = keyword("strict")
        .then_ignore(ws())
        .or_not()
        .map(|s| s.is_some());
    let kind = keyword("digraph").to(true).or(keyword("graph").to(false));

    ws().ignore_then(strict)
        .then(kind)
        .then_ignore(ws())
        .then(id().then_ignore(ws()).or_not())
        .then(block(statement()))
        .then_ignore(ws())
        .then_ignore(end())
}

fn statement<'src>() -> impl Parser<'src, &'src str, Statement, Extra<'src>> + Clone {
    recursive(|statement| {
        let subgraph = keyword("subgraph")
            .ignore_then(ws())
            .ignore_then(id().then_ignore(ws()).or_not())
            .or_not()
            .ignore_then(block(statement))
            .map(Statement::Subgraph);

        choice((
            attr_statement(),
            subgraph,
            edge_statement(),
            assignment(),
            node_statement(),
        ))
    })
}

/// `{ stmt ; stmt ... }`
fn block<'src, P>(statement: P) -> impl Parser<'src, &'src str, Vec<Statement>, Extra<'src>> + Clone
where
    P: Parser<'src, &'src str, Statement, Extra<'src>> + Clone,
{
    statement
        .padded_by(ws())
        .then_ignore(just(';').or_not())
        .repeated()
        .collect::<Vec<Statement>>()
        .then_ignore(ws())
        .delimited_by(just('{'), just('}'))
}

/// `graph [..]`, `node [..]` or `edge [..]`
fn attr_statement<'src>() -> impl Parser<'src, &'src str, Statement, Extra<'src>> + Clone {
    choice((
        keyword("graph").to(AttrTarget::Graph),
        keyword("node").to(AttrTarget::Node),
        keyword("edge").to(AttrTarget::Edge),
    ))
    .then_ignore(ws())
    .then(attr_list())
    .map(|(target, attributes)| Statement::Attr(target, attributes))
}

/// `a -> b -> c [..]`
fn edge_statement<'src>() -> impl Parser<'src, &'src str, Statement, Extra<'src>> + Clone {
    let edge_op = just("->").or(just("--"));

    node_id()
        .then(
            edge_op
                .padded_by(ws())
                .ignore_then(node_id())
                .repeated()
                .at_least(1)
                .collect::<Vec<String>>(),
        )
        .then(ws().ignore_then(attr_list()).or_not())
        .map(|((first, rest), attributes)| {
            let mut ids = Vec::with_capacity(rest.len() + 1);
            ids.push(first);
            ids.extend(rest);
            Statement::Edge(ids, attributes.unwrap_or_default())
        })
}

/// `rankdir = RL`
fn assignment<'src>() -> impl Parser<'src, &'src str, Statement, Extra<'src>> + Clone {
    id().then_ignore(just('=').padded_by(ws()))
        .then(value())
        .map(|(key, value)| Statement::Assign(key, value))
}

fn node_statement<'src>() -> impl Parser<'src, &'src str, Statement, Extra<'src>> + Clone {
    node_id()
        .then(ws().ignore_then(attr_list()).or_not())
        .map(|(id, attributes)| Statement::Node(id, attributes.unwrap_or_default()))
}

/// A node id with optional `:port` and `:compass` suffixes, which are dropped
fn node_id<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    id().then_ignore(just(':').ignore_then(id()).repeated())
}

/// One or more `[key=value, ...]` lists, merged in order
fn attr_list<'src>() -> impl Parser<'src, &'src str, Attributes, Extra<'src>> + Clone {
    let pair = id()
        .then_ignore(just('=').padded_by(ws()))
        .then(value())
        .then_ignore(ws())
        .then_ignore(one_of(",;").then_ignore(ws()).or_not());

    let list = pair
        .repeated()
        .collect::<Attributes>()
        .delimited_by(just('[').then(ws()), just(']'));

    list.separated_by(ws())
        .at_least(1)
        .collect::<Vec<Attributes>>()
        .map(|lists| lists.into_iter().flatten().collect())
}

/// An attribute value in any of the three id forms
fn value<'src>() -> impl Parser<'src, &'src str, DotValue, Extra<'src>> + Clone {
    choice((
        quoted_string().map(DotValue::plain),
        html_string().map(DotValue::html),
        bare_id().map(DotValue::plain),
    ))
    .labelled("identifier")
}

/// A name; HTML names keep their inner markup as text
fn id<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    value().map(|value| value.text)
}

/// A whole alphabetic word equal to `word`, ignoring ASCII case
fn keyword<'src>(word: &'static str) -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_ascii_alphabetic())
        .repeated()
        .at_least(1)
        .to_slice()
        .try_map(move |found: &str, span| {
            if found.eq_ignore_ascii_case(word) {
                Ok(())
            } else {
                Err(Rich::custom(span, format!("expected keyword '{}'", word)))
            }
        })
}

/// Letters, digits, `_` and `.`, with an optional leading `-` for numerals
fn bare_id<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    let id_char = any().filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == '.');

    just('-')
        .or_not()
        .then(id_char.repeated().at_least(1).collect::<String>())
        .map(|(sign, rest)| match sign {
            Some(_) => format!("-{}", rest),
            None => rest,
        })
}

/// `"..."`, possibly concatenated with `+`; only `\"` is unescaped
fn quoted_string<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    let character = choice((just("\\\"").to('"'), none_of('"')));

    character
        .repeated()
        .collect::<String>()
        .delimited_by(just('"'), just('"'))
        .separated_by(just('+').padded_by(ws()))
        .at_least(1)
        .collect::<Vec<String>>()
        .map(|parts| parts.concat())
}

/// `<...>` with balanced nested angle brackets; yields the inner text
fn html_string<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    recursive(|html| {
        choice((
            none_of("<>").map(|c: char| c.to_string()),
            html.map(|inner: String| format!("<{}>", inner)),
        ))
        .repeated()
        .collect::<Vec<String>>()
        .map(|parts| parts.concat())
        .delimited_by(just('<'), just('>'))
    })
}

fn block_comment<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    just("/*")
        .then(any().and_is(just("*/").not()).repeated())
        .then(just("*/"))
        .ignored()
}

/// Optional whitespace and block comments
fn ws<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    one_of(" \t\r\n")
        .ignored()
        .or(block_comment())
        .repeated()
        .ignored()
}

/// Flattens statements into a [`DotGraph`], tracking attribute defaults per
/// subgraph scope
struct GraphBuilder {
    graph: DotGraph,
    node_defaults: BTreeMap<String, DotValue>,
    edge_defaults: BTreeMap<String, DotValue>,
    index: HashMap<String, usize>,
}

impl GraphBuilder {
    fn new(strict: bool, directed: bool, name: Option<String>) -> Self {
        Self {
            graph: DotGraph {
                strict,
                directed,
                name,
                ..DotGraph::default()
            },
            node_defaults: BTreeMap::new(),
            edge_defaults: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    fn apply(&mut self, statements: Vec<Statement>) {
        for statement in statements {
            match statement {
                Statement::Attr(AttrTarget::Graph, attributes) => {
                    self.graph.attributes.extend(attributes);
                }
                Statement::Attr(AttrTarget::Node, attributes) => {
                    self.node_defaults.extend(attributes);
                }
                Statement::Attr(AttrTarget::Edge, attributes) => {
                    self.edge_defaults.extend(attributes);
                }
                Statement::Assign(key, value) => {
                    self.graph.attributes.insert(key, value);
                }
                Statement::Node(id, attributes) => {
                    self.touch_node(id, attributes);
                }
                Statement::Edge(ids, attributes) => {
                    for id in &ids {
                        self.touch_node(id.clone(), Vec::new());
                    }
                    for pair in ids.windows(2) {
                        self.add_edge(&pair[0], &pair[1], &attributes);
                    }
                }
                Statement::Subgraph(statements) => {
                    // Defaults and graph attributes set inside a subgraph stay there
                    let node_defaults = self.node_defaults.clone();
                    let edge_defaults = self.edge_defaults.clone();
                    let graph_attributes = self.graph.attributes.clone();
                    self.apply(statements);
                    self.node_defaults = node_defaults;
                    self.edge_defaults = edge_defaults;
                    self.graph.attributes = graph_attributes;
                }
            }
        }
    }

    fn touch_node(&mut self, id: String, attributes: Attributes) {
        match self.index.get(&id) {
            Some(&position) => {
                self.graph.nodes[position].attributes.extend(attributes);
            }
            None => {
                let mut merged = self.node_defaults.clone();
                merged.extend(attributes);
                self.index.insert(id.clone(), self.graph.nodes.len());
                self.graph.nodes.push(DotNode {
                    id,
                    attributes: merged,
                });
            }
        }
    }

    fn add_edge(&mut self, tail: &str, head: &str, attributes: &Attributes) {
        if self.graph.strict
            && self.graph.edges.iter().any(|edge| {
                (edge.tail == tail && edge.head == head)
                    || (!self.graph.directed && edge.tail == head && edge.head == tail)
            })
        {
            return;
        }

        let mut merged = self.edge_defaults.clone();
        merged.extend(attributes.iter().cloned());
        self.graph.edges.push(DotEdge {
            tail: tail.to_string(),
            head: head.to_string(),
            attributes: merged,
        });
    }

    fn finish(self) -> DotGraph {
        self.graph
    }
}
