//! Reader for GML, the bracketed key/value graph markup used by the
//! classic community-detection benchmarks.
//!
//! Only topology is consumed: nodes are keyed by their `label` attribute
//! (falling back to `id`), edges by `source`/`target` ids. Every other
//! attribute is parsed for well-formedness and then ignored.

use crate::error::{GmlError, LoadError};
use crate::graph::{EdgeInsert, Network};
use log::{debug, warn};
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Key(String),
    Int(i64),
    Real(f64),
    Str(String),
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<Entry>),
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    value: Value,
    line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NodeKey {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKey::Int(i) => write!(f, "{i}"),
            NodeKey::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl Value {
    fn render(&self) -> Option<String> {
        match self {
            Value::Int(i) => Some(i.to_string()),
            Value::Real(r) => Some(r.to_string()),
            Value::Str(s) => Some(s.clone()),
            Value::List(_) => None,
        }
    }

    fn node_key(&self) -> Option<NodeKey> {
        match self {
            Value::Int(i) => Some(NodeKey::Int(*i)),
            Value::Real(r) => Some(NodeKey::Text(r.to_string())),
            Value::Str(s) => Some(NodeKey::Text(s.clone())),
            Value::List(_) => None,
        }
    }
}

/// Read a GML file from disk.
pub fn read_gml(path: impl AsRef<Path>) -> Result<Network, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    debug!("read {} bytes of GML from {}", text.len(), path.display());
    Ok(parse_gml(&text)?)
}

/// Parse GML text into a [`Network`].
pub fn parse_gml(text: &str) -> Result<Network, GmlError> {
    parse_gml_skipping(text, 0)
}

/// Parse GML text after discarding its first `skip` lines.
pub fn parse_gml_skipping(text: &str, skip: usize) -> Result<Network, GmlError> {
    let body = text.split('\n').skip(skip).collect::<Vec<_>>().join("\n");
    let tokens = tokenize(&body, skip + 1)?;
    let entries = parse_list(&tokens, &mut 0, false)?;
    build_network(entries)
}

fn tokenize(text: &str, first_line: usize) -> Result<Vec<(Token, usize)>, GmlError> {
    let mut tokens = Vec::new();
    let mut line = first_line;
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '[' => {
                chars.next();
                tokens.push((Token::Open, line));
            }
            ']' => {
                chars.next();
                tokens.push((Token::Close, line));
            }
            '"' => {
                let start = line;
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            s.push(c);
                        }
                        None => return Err(GmlError::new(start, "unterminated string")),
                    }
                }
                tokens.push((Token::Str(s), start));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut key = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        key.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::Key(key), line));
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                let mut num = String::new();
                while let Some(&c) = chars.peek() {
                    let exponent_sign =
                        (c == '-' || c == '+') && matches!(num.chars().last(), Some('e' | 'E'));
                    if c.is_ascii_digit()
                        || c == '.'
                        || c == 'e'
                        || c == 'E'
                        || exponent_sign
                        || (num.is_empty() && (c == '-' || c == '+'))
                    {
                        num.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let token = if num.contains(['.', 'e', 'E']) {
                    num.parse().map(Token::Real)
                        .map_err(|_| GmlError::new(line, format!("invalid number {num:?}")))?
                } else {
                    num.parse().map(Token::Int)
                        .map_err(|_| GmlError::new(line, format!("invalid number {num:?}")))?
                };
                tokens.push((token, line));
            }
            other => {
                return Err(GmlError::new(line, format!("unexpected character {other:?}")));
            }
        }
    }

    Ok(tokens)
}

fn parse_list(tokens: &[(Token, usize)], pos: &mut usize, nested: bool) -> Result<Vec<Entry>, GmlError> {
    let mut entries = Vec::new();

    while *pos < tokens.len() {
        let (token, line) = &tokens[*pos];
        *pos += 1;
        let key = match token {
            Token::Key(key) => key.clone(),
            Token::Close if nested => return Ok(entries),
            Token::Close => return Err(GmlError::new(*line, "unbalanced ']'")),
            other => return Err(GmlError::new(*line, format!("expected a key, found {other:?}"))),
        };

        let Some((token, value_line)) = tokens.get(*pos) else {
            return Err(GmlError::new(*line, format!("key {key:?} has no value")));
        };
        *pos += 1;
        let value = match token {
            Token::Int(i) => Value::Int(*i),
            Token::Real(r) => Value::Real(*r),
            Token::Str(s) => Value::Str(s.clone()),
            Token::Open => Value::List(parse_list(tokens, pos, true)?),
            other => {
                return Err(GmlError::new(*value_line, format!("expected a value for {key:?}, found {other:?}")));
            }
        };
        entries.push(Entry { key, value, line: *line });
    }

    if nested {
        let line = tokens.last().map(|(_, line)| *line).unwrap_or(1);
        return Err(GmlError::new(line, "unterminated list"));
    }
    Ok(entries)
}

fn attribute<'a>(entries: &'a [Entry], key: &str) -> Option<&'a Value> {
    entries.iter().find(|entry| entry.key == key).map(|entry| &entry.value)
}

fn build_network(entries: Vec<Entry>) -> Result<Network, GmlError> {
    let mut graphs = entries.into_iter().filter(|entry| entry.key == "graph");
    let graph = graphs.next().ok_or_else(|| GmlError::new(1, "input contains no graph"))?;
    if let Some(extra) = graphs.next() {
        return Err(GmlError::new(extra.line, "input contains more than one graph"));
    }
    let Value::List(body) = graph.value else {
        return Err(GmlError::new(graph.line, "graph is not a list"));
    };

    if matches!(attribute(&body, "directed"), Some(Value::Int(1))) {
        warn!("GML graph is directed; loading it as undirected");
    }

    let mut network = Network::new();
    let mut ids: HashMap<NodeKey, NodeIndex> = HashMap::new();

    for entry in body.iter().filter(|entry| entry.key == "node") {
        let Value::List(attrs) = &entry.value else {
            return Err(GmlError::new(entry.line, "node is not a list"));
        };
        let id = attribute(attrs, "id")
            .and_then(Value::node_key)
            .ok_or_else(|| GmlError::new(entry.line, "node has no scalar 'id'"))?;
        let label = match attribute(attrs, "label") {
            Some(value) => value
                .render()
                .ok_or_else(|| GmlError::new(entry.line, "node label is a list"))?,
            None => match &id {
                NodeKey::Int(i) => i.to_string(),
                NodeKey::Text(s) => s.clone(),
            },
        };

        if ids.contains_key(&id) {
            return Err(GmlError::new(entry.line, format!("node id {id} is duplicated")));
        }
        if network.index_of(&label).is_some() {
            return Err(GmlError::new(entry.line, format!("node label {label:?} is duplicated")));
        }
        let index = network.add_node(label);
        ids.insert(id, index);
    }

    let mut duplicates = 0usize;
    let mut self_loops = 0usize;
    for entry in body.iter().filter(|entry| entry.key == "edge") {
        let Value::List(attrs) = &entry.value else {
            return Err(GmlError::new(entry.line, "edge is not a list"));
        };
        let endpoint = |name: &str| -> Result<NodeIndex, GmlError> {
            let key = attribute(attrs, name)
                .and_then(Value::node_key)
                .ok_or_else(|| GmlError::new(entry.line, format!("edge has no scalar '{name}'")))?;
            ids.get(&key)
                .copied()
                .ok_or_else(|| GmlError::new(entry.line, format!("edge {name} {key} is not a node id")))
        };
        let source = endpoint("source")?;
        let target = endpoint("target")?;
        match network.add_edge_by_index(source, target) {
            EdgeInsert::Added => {}
            EdgeInsert::Duplicate => duplicates += 1,
            EdgeInsert::SelfLoop => self_loops += 1,
        }
    }

    if duplicates > 0 {
        debug!("collapsed {duplicates} duplicate GML edges");
    }
    if self_loops > 0 {
        debug!("dropped {self_loops} GML self-loops");
    }
    Ok(network)
}
