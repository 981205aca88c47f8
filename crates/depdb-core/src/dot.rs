//! Reader and writer for Graphviz DOT graphs.
//!
//! # Overview
//!
//! CMake's `--graphviz` option writes one DOT file per target set. This module
//! parses the subset of the DOT language those files (and hand-written
//! variants of them) use into an explicit node/edge structure:
//!
//! - `strict`, `graph` and `digraph` headers, with an optional name
//! - node statements with attribute lists, merged when a node is repeated
//! - edge statements, including chains (`a -> b -> c`) and subgraph endpoints
//! - `node [...]`, `edge [...]` and `graph [...]` default attributes, scoped
//!   to the enclosing subgraph
//! - `key = value` graph attributes
//! - nested `subgraph` blocks (flattened into the parent graph)
//! - `//`, `#` and `/* */` comments, quoted strings with escapes, `+`
//!   concatenation, HTML-like `<...>` strings and node ports
//!
//! [`DotGraph::to_dot`] writes a graph back out in a canonical form that this
//! parser reads again.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use tracing::trace;

use crate::error::{Error, Result};

pub type Attrs = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Graph structure
// ---------------------------------------------------------------------------

/// A parsed DOT graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotGraph {
    pub strict: bool,
    pub directed: bool,
    pub name: Option<String>,
    /// Graph-level attributes (`key = value` statements and `graph [...]`).
    pub attrs: Attrs,
    /// Nodes in first-mention order.
    pub nodes: Vec<DotNode>,
    /// Edges in statement order.
    pub edges: Vec<DotEdge>,
}

/// A node statement, with all attribute lists for the same id merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotNode {
    pub id: String,
    pub attrs: Attrs,
}

impl DotNode {
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// The node label, which defaults to the node id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.attr("label").unwrap_or(&self.id)
    }

    #[must_use]
    pub fn shape(&self) -> Option<&str> {
        self.attr("shape")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotEdge {
    pub tail: String,
    pub head: String,
    pub attrs: Attrs,
}

impl DotGraph {
    /// Read and parse a DOT file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Dot`] if
    /// it is not valid DOT.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        text.parse().map_err(|source| Error::Dot {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&DotNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Render the graph as DOT text.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        if self.strict {
            out.push_str("strict ");
        }
        out.push_str(if self.directed { "digraph" } else { "graph" });
        if let Some(name) = &self.name {
            let _ = write!(out, " {}", quote(name));
        }
        out.push_str(" {\n");
        for (key, value) in &self.attrs {
            let _ = writeln!(out, "    {} = {};", quote(key), quote(value));
        }
        for node in &self.nodes {
            let _ = writeln!(out, "    {}{};", quote(&node.id), attr_list(&node.attrs));
        }
        let op = if self.directed { "->" } else { "--" };
        for edge in &self.edges {
            let _ = writeln!(
                out,
                "    {} {op} {}{};",
                quote(&edge.tail),
                quote(&edge.head),
                attr_list(&edge.attrs)
            );
        }
        out.push_str("}\n");
        out
    }
}

impl FromStr for DotGraph {
    type Err = DotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = Lexer::new(s).tokenize()?;
        Parser::new(tokens).parse_graph()
    }
}

fn quote(s: &str) -> String {
    if has_dangling_backslash(s) && is_balanced_html(s) {
        return format!("<{s}>");
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => match chars.peek() {
                // Lossy: reads back as a doubled backslash.
                None | Some('"' | '\n') => out.push_str("\\\\"),
                Some(&next) => {
                    out.push('\\');
                    out.push(next);
                    chars.next();
                }
            },
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A backslash that a quoted string cannot carry verbatim: one that ends the
/// value or sits before a quote or newline.
fn has_dangling_backslash(s: &str) -> bool {
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' && matches!(chars.next(), None | Some('"' | '\n')) {
            return true;
        }
    }
    false
}

fn is_balanced_html(s: &str) -> bool {
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn attr_list(attrs: &Attrs) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let body: Vec<String> = attrs
        .iter()
        .map(|(k, v)| format!("{}={}", quote(k), quote(v)))
        .collect();
    format!(" [ {} ]", body.join(" "))
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A syntax error with the 1-based position where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}, column {column}: {message}")]
pub struct DotError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    /// Identifier, numeral, quoted or HTML string. `quoted` keeps keywords
    /// such as `"node"` usable as plain ids.
    Id { text: String, quoted: bool },
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Equals,
    Semi,
    Comma,
    Colon,
    Plus,
    Arrow,
    DashDash,
}

#[derive(Debug, Clone)]
struct Spanned {
    tok: Tok,
    line: usize,
    column: usize,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> DotError {
        DotError {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Spanned>, DotError> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if c == '#' || (c == '/' && self.peek_next() == Some('/')) {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
            if c == '/' && self.peek_next() == Some('*') {
                self.skip_block_comment()?;
                continue;
            }

            let (line, column) = (self.line, self.column);
            let tok = match c {
                '{' => self.single(Tok::LBrace),
                '}' => self.single(Tok::RBrace),
                '[' => self.single(Tok::LBracket),
                ']' => self.single(Tok::RBracket),
                '=' => self.single(Tok::Equals),
                ';' => self.single(Tok::Semi),
                ',' => self.single(Tok::Comma),
                ':' => self.single(Tok::Colon),
                '+' => self.single(Tok::Plus),
                '"' => self.quoted()?,
                '<' => self.html()?,
                '-' if self.peek_next() == Some('>') => {
                    self.bump();
                    self.single(Tok::Arrow)
                }
                '-' if self.peek_next() == Some('-') => {
                    self.bump();
                    self.single(Tok::DashDash)
                }
                c if is_id_char(c) || c == '-' => self.bare(),
                other => return Err(self.error(format!("unexpected character {other:?}"))),
            };
            tokens.push(Spanned { tok, line, column });
        }
        Ok(tokens)
    }

    fn single(&mut self, tok: Tok) -> Tok {
        self.bump();
        tok
    }

    fn skip_block_comment(&mut self) -> Result<(), DotError> {
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(self.error("unterminated comment")),
            }
        }
    }

    fn quoted(&mut self) -> Result<Tok, DotError> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('"') => text.push('"'),
                    // Line continuation.
                    Some('\n') => {}
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                    }
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => text.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
        Ok(Tok::Id { text, quoted: true })
    }

    fn html(&mut self) -> Result<Tok, DotError> {
        self.bump();
        let mut depth = 1usize;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('<') => {
                    depth += 1;
                    text.push('<');
                }
                Some('>') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    text.push('>');
                }
                Some(c) => text.push(c),
                None => return Err(self.error("unterminated HTML string")),
            }
        }
        Ok(Tok::Id { text, quoted: true })
    }

    fn bare(&mut self) -> Tok {
        let mut text = String::new();
        if self.peek() == Some('-') {
            self.bump();
            text.push('-');
        }
        while let Some(c) = self.peek() {
            if !is_id_char(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        Tok::Id {
            text,
            quoted: false,
        }
    }
}

fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || !c.is_ascii()
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Default attributes in effect inside one `{ ... }` block.
#[derive(Debug, Clone, Default)]
struct Scope {
    node_defaults: Attrs,
    edge_defaults: Attrs,
    /// Node ids mentioned inside the block, used for subgraph endpoints.
    members: Vec<String>,
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    graph: DotGraph,
}

impl Parser {
    fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            pos: 0,
            graph: DotGraph::default(),
        }
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|s| &s.tok)
    }

    fn peek_at(&self, offset: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + offset).map(|s| &s.tok)
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).map(|s| s.tok.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>) -> DotError {
        let (line, column) = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or((1, 1), |s| (s.line, s.column));
        DotError {
            line,
            column,
            message: message.into(),
        }
    }

    fn expect(&mut self, want: &Tok, what: &str) -> Result<(), DotError> {
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    /// True if the next token is the unquoted keyword `kw`.
    fn at_keyword(&self, kw: &str) -> bool {
        self.keyword_at(0, kw)
    }

    fn keyword_at(&self, offset: usize, kw: &str) -> bool {
        matches!(
            self.peek_at(offset),
            Some(Tok::Id { text, quoted: false }) if text.eq_ignore_ascii_case(kw)
        )
    }

    fn parse_id(&mut self) -> Result<String, DotError> {
        let Some(Tok::Id { text, quoted }) = self.peek().cloned() else {
            return Err(self.error("expected identifier"));
        };
        self.bump();
        let mut text = text;
        if quoted {
            while self.peek() == Some(&Tok::Plus) {
                self.bump();
                match self.bump() {
                    Some(Tok::Id { text: more, quoted: true }) => text.push_str(&more),
                    _ => return Err(self.error("expected quoted string after '+'")),
                }
            }
        }
        Ok(text)
    }

    fn parse_graph(mut self) -> Result<DotGraph, DotError> {
        if self.at_keyword("strict") {
            self.bump();
            self.graph.strict = true;
        }
        if self.at_keyword("digraph") {
            self.graph.directed = true;
        } else if !self.at_keyword("graph") {
            return Err(self.error("expected 'graph' or 'digraph'"));
        }
        self.bump();
        if matches!(self.peek(), Some(Tok::Id { .. })) {
            self.graph.name = Some(self.parse_id()?);
        }
        self.expect(&Tok::LBrace, "'{'")?;
        let mut scope = Scope::default();
        self.parse_stmt_list(&mut scope)?;
        self.expect(&Tok::RBrace, "'}'")?;
        if self.pos != self.tokens.len() {
            return Err(self.error("unexpected content after graph"));
        }
        Ok(self.graph)
    }

    fn parse_stmt_list(&mut self, scope: &mut Scope) -> Result<(), DotError> {
        loop {
            match self.peek() {
                None | Some(Tok::RBrace) => return Ok(()),
                Some(Tok::Semi) => {
                    self.bump();
                }
                _ => self.parse_stmt(scope)?,
            }
        }
    }

    fn parse_stmt(&mut self, scope: &mut Scope) -> Result<(), DotError> {
        for kw in ["graph", "node", "edge"] {
            if self.at_keyword(kw) {
                self.bump();
                let attrs = self.parse_attr_lists()?;
                match kw {
                    "node" => scope.node_defaults.extend(attrs),
                    "edge" => scope.edge_defaults.extend(attrs),
                    _ => self.graph.attrs.extend(attrs),
                }
                return Ok(());
            }
        }

        // `key = value` graph attribute.
        if matches!(self.peek(), Some(Tok::Id { .. })) && self.peek_at(1) == Some(&Tok::Equals) {
            let key = self.parse_id()?;
            self.bump();
            let value = self.parse_id()?;
            self.graph.attrs.insert(key, value);
            return Ok(());
        }

        let first = self.parse_endpoint(scope)?;
        if matches!(self.peek(), Some(Tok::Arrow | Tok::DashDash)) {
            return self.parse_edge_chain(scope, first);
        }

        // A bare subgraph is a complete statement; otherwise it is a node.
        if let Endpoint::Node(id) = first {
            let attrs = self.parse_attr_lists()?;
            self.touch_node(scope, &id, attrs);
        }
        Ok(())
    }

    fn parse_endpoint(&mut self, scope: &mut Scope) -> Result<Endpoint, DotError> {
        if self.at_keyword("subgraph") || self.peek() == Some(&Tok::LBrace) {
            return self.parse_subgraph(scope).map(Endpoint::Subgraph);
        }
        let id = self.parse_id()?;
        // Ports do not affect connectivity.
        for _ in 0..2 {
            if self.peek() == Some(&Tok::Colon) {
                self.bump();
                self.parse_id()?;
            }
        }
        Ok(Endpoint::Node(id))
    }

    fn parse_subgraph(&mut self, parent: &mut Scope) -> Result<Vec<String>, DotError> {
        if self.at_keyword("subgraph") {
            self.bump();
            if matches!(self.peek(), Some(Tok::Id { .. })) {
                self.parse_id()?;
            }
        }
        self.expect(&Tok::LBrace, "'{'")?;
        let mut scope = Scope {
            node_defaults: parent.node_defaults.clone(),
            edge_defaults: parent.edge_defaults.clone(),
            members: Vec::new(),
        };
        self.parse_stmt_list(&mut scope)?;
        self.expect(&Tok::RBrace, "'}'")?;
        for id in &scope.members {
            if !parent.members.contains(id) {
                parent.members.push(id.clone());
            }
        }
        Ok(scope.members)
    }

    fn parse_edge_chain(&mut self, scope: &mut Scope, first: Endpoint) -> Result<(), DotError> {
        let mut endpoints = vec![first];
        while let Some(op) = self.peek().cloned() {
            match (&op, self.graph.directed) {
                (Tok::Arrow, true) | (Tok::DashDash, false) => {}
                (Tok::Arrow | Tok::DashDash, _) => {
                    return Err(self.error("edge operator does not match graph type"));
                }
                _ => break,
            }
            self.bump();
            endpoints.push(self.parse_endpoint(scope)?);
        }
        let mut attrs = scope.edge_defaults.clone();
        attrs.extend(self.parse_attr_lists()?);

        let ids: Vec<Vec<String>> = endpoints.into_iter().map(Endpoint::into_ids).collect();
        for group in &ids {
            for id in group {
                self.touch_node(scope, id, Attrs::new());
            }
        }
        for pair in ids.windows(2) {
            for tail in &pair[0] {
                for head in &pair[1] {
                    self.graph.edges.push(DotEdge {
                        tail: tail.clone(),
                        head: head.clone(),
                        attrs: attrs.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Zero or more `[ a = b, c = d ]` lists, merged.
    fn parse_attr_lists(&mut self) -> Result<Attrs, DotError> {
        let mut attrs = Attrs::new();
        while self.peek() == Some(&Tok::LBracket) {
            self.bump();
            loop {
                match self.peek() {
                    Some(Tok::RBracket) => {
                        self.bump();
                        break;
                    }
                    Some(Tok::Comma | Tok::Semi) => {
                        self.bump();
                    }
                    Some(Tok::Id { .. }) => {
                        let key = self.parse_id()?;
                        let value = if self.peek() == Some(&Tok::Equals) {
                            self.bump();
                            self.parse_id()?
                        } else {
                            "true".to_string()
                        };
                        attrs.insert(key, value);
                    }
                    _ => return Err(self.error("expected attribute or ']'")),
                }
            }
        }
        Ok(attrs)
    }

    /// Declare `id` (with the scope's node defaults) or merge attributes into
    /// an existing node.
    fn touch_node(&mut self, scope: &mut Scope, id: &str, attrs: Attrs) {
        if !scope.members.iter().any(|m| m == id) {
            scope.members.push(id.to_string());
        }
        if let Some(node) = self.graph.nodes.iter_mut().find(|n| n.id == id) {
            node.attrs.extend(attrs);
            return;
        }
        trace!(id, "declaring DOT node");
        let mut merged = scope.node_defaults.clone();
        merged.extend(attrs);
        self.graph.nodes.push(DotNode {
            id: id.to_string(),
            attrs: merged,
        });
    }
}

enum Endpoint {
    Node(String),
    Subgraph(Vec<String>),
}

impl Endpoint {
    fn into_ids(self) -> Vec<String> {
        match self {
            Self::Node(id) => vec![id],
            Self::Subgraph(ids) => ids,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const CMAKE_OUTPUT: &str = r#"digraph "KF5DNSSD" {
node [
  fontsize = "12"
];
subgraph clusterLegend {
  label = "Legend";
  color = black;
  edge [ style = invis ];
  legendNode0 [ label = "Executable", shape = egg ];
}
    "node0" [ label="KF5DNSSD" shape="polygon"];
    "node1" [ label="Qt5::Network" shape="ellipse"];
    "node0" -> "node1" // KF5DNSSD -> Qt5::Network
    "node2" [ label = "KF5::DNSSD", shape = "ellipse" ];
}
"#;

    fn parse(src: &str) -> DotGraph {
        src.parse().expect("valid DOT")
    }

    #[test]
    fn parses_cmake_graphviz_output() {
        let g = parse(CMAKE_OUTPUT);
        assert!(g.directed);
        assert_eq!(g.name.as_deref(), Some("KF5DNSSD"));

        let ids: Vec<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["legendNode0", "node0", "node1", "node2"]);

        let node0 = g.node("node0").expect("node0");
        assert_eq!(node0.label(), "KF5DNSSD");
        assert_eq!(node0.shape(), Some("polygon"));
        // Node defaults apply to declared nodes.
        assert_eq!(node0.attr("fontsize"), Some("12"));

        assert_eq!(g.edges.len(), 1);
        assert_eq!(g.edges[0].tail, "node0");
        assert_eq!(g.edges[0].head, "node1");
    }

    #[test]
    fn edge_chains_expand_to_pairs() {
        let g = parse("digraph { a -> b -> c [style=dotted]; }");
        let pairs: Vec<(&str, &str)> = g
            .edges
            .iter()
            .map(|e| (e.tail.as_str(), e.head.as_str()))
            .collect();
        assert_eq!(pairs, [("a", "b"), ("b", "c")]);
        assert!(g.edges.iter().all(|e| e.attrs["style"] == "dotted"));
        assert_eq!(g.nodes.len(), 3);
    }

    #[test]
    fn subgraph_endpoint_connects_every_member() {
        let g = parse("digraph { a -> { b c } }");
        assert_eq!(g.edges.len(), 2);
        assert_eq!(g.edges[1].head, "c");
    }

    #[test]
    fn implicit_nodes_have_id_as_label() {
        let g = parse("digraph { x -> y }");
        let y = g.node("y").expect("implicit node");
        assert_eq!(y.label(), "y");
        assert_eq!(y.shape(), None);
    }

    #[test]
    fn repeated_node_statements_merge_attributes() {
        let g = parse(r#"digraph { a [label="A"]; a [shape=house]; }"#);
        assert_eq!(g.nodes.len(), 1);
        assert_eq!(g.nodes[0].label(), "A");
        assert_eq!(g.nodes[0].shape(), Some("house"));
    }

    #[test]
    fn quoted_strings_support_escapes_and_concatenation() {
        let g = parse(r#"digraph { "a\"b" [label="x" + "y"]; }"#);
        assert_eq!(g.nodes[0].id, "a\"b");
        assert_eq!(g.nodes[0].label(), "xy");
    }

    #[test]
    fn quoted_keywords_are_plain_ids() {
        let g = parse(r#"digraph { "node" -> "edge" }"#);
        assert_eq!(g.edges[0].tail, "node");
    }

    #[test]
    fn comments_are_ignored() {
        let g = parse("/* header */ digraph {\n# hash\n a // trailing\n }");
        assert_eq!(g.nodes.len(), 1);
    }

    #[test]
    fn ports_are_dropped() {
        let g = parse("digraph { a:p1:n -> b:s }");
        assert_eq!(g.edges[0].tail, "a");
        assert_eq!(g.edges[0].head, "b");
    }

    #[test]
    fn undirected_operator_in_digraph_is_rejected() {
        let err = "digraph { a -- b }".parse::<DotGraph>().expect_err("mismatch");
        assert!(err.message.contains("edge operator"));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn unterminated_string_reports_position() {
        let err = "digraph {\n \"a }".parse::<DotGraph>().expect_err("unterminated");
        assert_eq!(err.message, "unterminated string");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!("digraph { } }".parse::<DotGraph>().is_err());
        assert!("digraph { a [label=] }".parse::<DotGraph>().is_err());
    }

    #[test]
    fn written_graph_reads_back() {
        let g = parse(CMAKE_OUTPUT);
        let again = parse(&g.to_dot());
        assert_eq!(again.nodes, g.nodes);
        assert_eq!(again.edges, g.edges);
        assert_eq!(again.name, g.name);
    }

    #[test]
    fn html_label_ending_in_backslash_reads_back() {
        let g = parse(r#"digraph { n [label=<foo\> shape="ellipse"]; }"#);
        assert_eq!(g.nodes[0].label(), r"foo\");
        let again = parse(&g.to_dot());
        assert_eq!(again.nodes, g.nodes);
    }

    #[test]
    fn backslash_before_quote_stays_parseable() {
        let mut g = parse("digraph { n }");
        g.nodes[0].attrs.insert("label".into(), r#"a\"b<"#.into());
        let again = parse(&g.to_dot());
        assert_eq!(again.nodes.len(), 1);
        assert!(again.nodes[0].label().starts_with('a'));
    }

    #[test]
    fn escaped_backslash_pairs_round_trip() {
        let g = parse(r#"digraph { "a\\" -> "b\n" }"#);
        assert_eq!(g.edges[0].tail, r"a\\");
        let again = parse(&g.to_dot());
        assert_eq!(again.edges, g.edges);
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = DotGraph::read(&dir.path().join("missing.dot")).expect_err("missing file");
        assert!(matches!(err, Error::Io { .. }));
    }
}
