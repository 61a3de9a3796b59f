//! The heterogeneous value domain that transformation chains operate on.
//!
//! Every pipeline stage maps one [`Value`] to another. The enum makes each
//! transformation's applicability a pattern match instead of a scattered
//! runtime type check: a stage that receives a variant it does not handle
//! returns [`Value::Inapplicable`] and the chain keeps going.

use std::fmt;

/// A value flowing through a transformation chain.
///
/// Generic over the document backend's node type `N`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<N> {
    /// A single document node.
    Node(N),
    /// An ordered sequence of document nodes, as produced by `select-all`.
    NodeList(Vec<N>),
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<Value<N>>),
    /// Absent input: a selector that matched nothing, or a node
    /// transformation applied to an already-absent value.
    Null,
    /// The type-guard sentinel: a transformation received input of a
    /// runtime type it does not act on. Coerces to `"false"`.
    Inapplicable,
}

impl<N> Value<N> {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Node(_) => "node",
            Value::NodeList(_) => "node list",
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Null => "null",
            Value::Inapplicable => "inapplicable",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_inapplicable(&self) -> bool {
        matches!(self, Value::Inapplicable)
    }

    /// Borrow the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }
}

/// The `to-string` coercion.
///
/// - `Null` coerces to the empty string (the documented coercion of
///   absence).
/// - `Inapplicable` coerces to `"false"`, the sentinel's conventional
///   spelling.
/// - `List` joins element coercions with `,`.
/// - Nodes are opaque to the value layer and coerce to a host-object tag.
impl<N> fmt::Display for Value<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Node(_) => write!(f, "[object Node]"),
            Value::NodeList(_) => write!(f, "[object NodeList]"),
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Null => Ok(()),
            Value::Inapplicable => write!(f, "false"),
        }
    }
}
