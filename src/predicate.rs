//! Boolean predicate trees from query session files
//!
//! A filter is a tree of `AndPredicate` / `OrPredicate` / `NotPredicate`
//! combinators over leaf tests. On the wire every node is
//! `{"type": ..., "parameter": ...}`:
//!
//! ```json
//! {"type": "AndPredicate", "parameter": {
//!     "Lhs": {"type": "ExistsPredicate", "parameter": {"Path": "/user/name"}},
//!     "Rhs": {"type": "NotPredicate", "parameter":
//!         {"type": "IsStringPredicate", "parameter": {"Path": "/id"}}}
//! }}
//! ```
//!
//! Any type tag other than the three combinators is a leaf, so new leaf
//! kinds need no code changes here.

use crate::json;
use serde::de::{self, Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use std::mem;
use thiserror::Error;

pub const AND_PREDICATE: &str = "AndPredicate";
pub const OR_PREDICATE: &str = "OrPredicate";
pub const NOT_PREDICATE: &str = "NotPredicate";

/// Parameter key holding a leaf's attribute path
pub const PATH_KEY: &str = "Path";

const TYPE_KEY: &str = "type";
const PARAMETER_KEY: &str = "parameter";
const LHS_KEY: &str = "Lhs";
const RHS_KEY: &str = "Rhs";

/// Errors for structurally invalid predicate nodes
#[derive(Error, Debug)]
pub enum PredicateError {
    #[error("predicate node must be a JSON object, found {0}")]
    NotAnObject(Value),

    #[error("predicate node is missing its `type`")]
    MissingType,

    #[error("predicate `type` must be a string, found {0}")]
    InvalidType(Value),

    #[error("{kind} is missing its `parameter`")]
    MissingParameter { kind: String },

    #[error("{kind} requires an object parameter with a {operand} operand")]
    MissingOperand {
        kind: &'static str,
        operand: &'static str,
    },

    #[error("{kind} has a non-string Path parameter: {value}")]
    InvalidPath { kind: String, value: Value },
}

/// A node of a boolean filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    And {
        lhs: Box<Predicate>,
        rhs: Box<Predicate>,
    },
    Or {
        lhs: Box<Predicate>,
        rhs: Box<Predicate>,
    },
    Not(Box<Predicate>),
    Leaf(Leaf),
}

/// A leaf test such as `IntEqualityPredicate` or `ExistsPredicate`
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    kind: String,
    path: Option<String>,
    parameter: Value,
}

impl Leaf {
    /// Build a leaf, extracting `Path` from an object parameter
    pub fn new(kind: impl Into<String>, parameter: Value) -> Result<Self, PredicateError> {
        let kind = kind.into();
        let path = match parameter.get(PATH_KEY) {
            None => None,
            Some(Value::String(path)) => Some(path.clone()),
            Some(other) => {
                return Err(PredicateError::InvalidPath {
                    kind,
                    value: other.clone(),
                })
            }
        };

        Ok(Self {
            kind,
            path,
            parameter,
        })
    }

    /// Predicate type tag (the node's `type`)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Attribute path tested by this leaf, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Raw `parameter` value as it appeared in the input
    pub fn parameter(&self) -> &Value {
        &self.parameter
    }
}

/// Pending work while building a tree from JSON
enum Frame {
    Visit(Value),
    And,
    Or,
    Not,
}

/// Split a wire node into its `type` and `parameter`
///
/// `parameter` must be present on every node; an explicit `null` is fine.
fn split_node(value: Value) -> Result<(String, Value), PredicateError> {
    let mut node = match value {
        Value::Object(node) => node,
        other => return Err(PredicateError::NotAnObject(other)),
    };

    let kind = match node.remove(TYPE_KEY) {
        Some(Value::String(kind)) => kind,
        Some(other) => return Err(PredicateError::InvalidType(other)),
        None => return Err(PredicateError::MissingType),
    };
    let parameter = node
        .remove(PARAMETER_KEY)
        .ok_or_else(|| PredicateError::MissingParameter { kind: kind.clone() })?;

    Ok((kind, parameter))
}

fn operands(kind: &'static str, parameter: Value) -> Result<(Value, Value), PredicateError> {
    let mut operands: Map<String, Value> = match parameter {
        Value::Object(operands) => operands,
        _ => {
            return Err(PredicateError::MissingOperand {
                kind,
                operand: LHS_KEY,
            })
        }
    };

    let mut take = |operand: &'static str| {
        operands
            .remove(operand)
            .ok_or(PredicateError::MissingOperand { kind, operand })
    };
    let lhs = take(LHS_KEY)?;
    let rhs = take(RHS_KEY)?;
    Ok((lhs, rhs))
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Predicate::from_value(value).map_err(de::Error::custom)
    }
}

impl Predicate {
    pub fn and(lhs: Predicate, rhs: Predicate) -> Self {
        Predicate::And {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn or(lhs: Predicate, rhs: Predicate) -> Self {
        Predicate::Or {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Parse a single predicate node from JSON text
    ///
    /// Nesting depth is not limited.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        json::from_str_unbounded(input)
    }

    /// Build a tree from an already parsed wire node
    ///
    /// Children are moved out of `value` node by node on an explicit stack.
    pub fn from_value(value: Value) -> Result<Self, PredicateError> {
        let mut frames = vec![Frame::Visit(value)];
        let mut built: Vec<Predicate> = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Visit(value) => {
                    let (kind, parameter) = split_node(value)?;
                    let combinator = match kind.as_str() {
                        AND_PREDICATE => Some((AND_PREDICATE, Frame::And)),
                        OR_PREDICATE => Some((OR_PREDICATE, Frame::Or)),
                        _ => None,
                    };

                    if let Some((kind, join)) = combinator {
                        let (lhs, rhs) = operands(kind, parameter)?;
                        frames.push(join);
                        frames.push(Frame::Visit(rhs));
                        frames.push(Frame::Visit(lhs));
                    } else if kind == NOT_PREDICATE {
                        frames.push(Frame::Not);
                        frames.push(Frame::Visit(parameter));
                    } else {
                        built.push(Predicate::Leaf(Leaf::new(kind, parameter)?));
                    }
                }
                Frame::Not => {
                    let Some(inner) = built.pop() else {
                        unreachable!("negated child is built before its NotPredicate")
                    };
                    built.push(Predicate::not(inner));
                }
                join => {
                    let (Some(rhs), Some(lhs)) = (built.pop(), built.pop()) else {
                        unreachable!("operands are built before their combinator")
                    };
                    built.push(match join {
                        Frame::And => Predicate::and(lhs, rhs),
                        _ => Predicate::or(lhs, rhs),
                    });
                }
            }
        }

        match built.pop() {
            Some(root) => Ok(root),
            None => unreachable!("a visited root always yields one predicate"),
        }
    }

    /// Flatten the tree into its leaves, left operand before right
    ///
    /// Uses an explicit stack so arbitrarily deep trees are safe.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut leaves = Vec::new();
        let mut stack: Vec<&Predicate> = vec![self];

        while let Some(node) = stack.pop() {
            match node {
                Predicate::And { lhs, rhs } | Predicate::Or { lhs, rhs } => {
                    stack.push(rhs.as_ref());
                    stack.push(lhs.as_ref());
                }
                Predicate::Not(inner) => stack.push(inner.as_ref()),
                Predicate::Leaf(leaf) => leaves.push(leaf),
            }
        }

        leaves
    }

    /// Nesting depth; a lone leaf has depth 1
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&Predicate, usize)> = vec![(self, 1)];

        while let Some((node, level)) = stack.pop() {
            max_depth = max_depth.max(level);
            match node {
                Predicate::And { lhs, rhs } | Predicate::Or { lhs, rhs } => {
                    stack.push((rhs.as_ref(), level + 1));
                    stack.push((lhs.as_ref(), level + 1));
                }
                Predicate::Not(inner) => stack.push((inner.as_ref(), level + 1)),
                Predicate::Leaf(_) => {}
            }
        }

        max_depth
    }

    /// Type tag this node carries on the wire
    pub fn kind(&self) -> &str {
        match self {
            Predicate::And { .. } => AND_PREDICATE,
            Predicate::Or { .. } => OR_PREDICATE,
            Predicate::Not(_) => NOT_PREDICATE,
            Predicate::Leaf(leaf) => leaf.kind(),
        }
    }

    /// Move this node's children into `out`, leaving empty leaves behind
    fn detach_children(&mut self, out: &mut Vec<Predicate>) {
        match self {
            Predicate::And { lhs, rhs } | Predicate::Or { lhs, rhs } => {
                out.push(mem::replace(lhs.as_mut(), Predicate::empty()));
                out.push(mem::replace(rhs.as_mut(), Predicate::empty()));
            }
            Predicate::Not(inner) => out.push(mem::replace(inner.as_mut(), Predicate::empty())),
            Predicate::Leaf(_) => {}
        }
    }

    fn empty() -> Self {
        Predicate::Leaf(Leaf {
            kind: String::new(),
            path: None,
            parameter: Value::Null,
        })
    }
}

impl Drop for Predicate {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

enum Piece<'a> {
    Node(&'a Predicate),
    Text(&'static str),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Node(self)];

        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Node(Predicate::And { lhs, rhs }) => stack.extend([
                    Piece::Text(")"),
                    Piece::Node(rhs.as_ref()),
                    Piece::Text(" AND "),
                    Piece::Node(lhs.as_ref()),
                    Piece::Text("("),
                ]),
                Piece::Node(Predicate::Or { lhs, rhs }) => stack.extend([
                    Piece::Text(")"),
                    Piece::Node(rhs.as_ref()),
                    Piece::Text(" OR "),
                    Piece::Node(lhs.as_ref()),
                    Piece::Text("("),
                ]),
                Piece::Node(Predicate::Not(inner)) => {
                    stack.extend([Piece::Node(inner.as_ref()), Piece::Text("NOT ")])
                }
                Piece::Node(Predicate::Leaf(leaf)) => write!(f, "{}", leaf)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}('{}')", self.kind, path),
            None => write!(f, "{}", self.kind),
        }
    }
}
