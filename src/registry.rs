//! Transform registry: named, composable unary transformations.
//!
//! The registry maps transformation names to entries. An entry is either a
//! direct unary transformation (`trim`, `inner-text`, ...) or a factory
//! that takes static construction arguments and returns the actual unary
//! transformation (`select-one`, `get-attribute`, `split`, ...).
//!
//! Every [`Extractor`](crate::Extractor) owns its registry, so registering
//! a custom transformation never mutates shared process state. Registries
//! default to the built-in set and are extensible before extraction:
//!
//! ```ignore
//! use domnom::{Extractor, Value};
//!
//! let mut extractor = Extractor::new();
//! extractor.registry_mut().register("shout", |_doc, value| {
//!     Ok(match value {
//!         Value::String(s) => Value::String(s.to_uppercase()),
//!         _ => Value::Inapplicable,
//!     })
//! });
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::document::Document;
use crate::error::ExtractError;
use crate::extractor::Descriptor;
use crate::transforms;
use crate::value::Value;

/// Trait for unary transformation functions.
///
/// A transformation maps one [`Value`] to another. It receives the document
/// so node transformations can delegate to the backend's query and read
/// capabilities. Implementations must tolerate any input variant: a variant
/// the transformation does not act on yields [`Value::Inapplicable`]
/// (or [`Value::Null`] for node transformations applied to absent input)
/// rather than an error.
pub trait TransformOp<D: Document>: Send + Sync {
    /// Apply the transformation to `input`.
    fn apply(&self, doc: &D, input: Value<D::Node>) -> Result<Value<D::Node>, ExtractError>;
}

impl<D, F> TransformOp<D> for F
where
    D: Document,
    F: Fn(&D, Value<D::Node>) -> Result<Value<D::Node>, ExtractError> + Send + Sync,
{
    fn apply(&self, doc: &D, input: Value<D::Node>) -> Result<Value<D::Node>, ExtractError> {
        self(doc, input)
    }
}

/// A ready-to-apply transformation, shareable across chain applications.
pub type Transform<D> = Arc<dyn TransformOp<D>>;

/// Factory invoked with the positional arguments of a compound descriptor.
pub type TransformFactory<D> =
    Box<dyn Fn(&[String]) -> Result<Transform<D>, ExtractError> + Send + Sync>;

enum TransformEntry<D: Document> {
    /// Applied as-is; takes no static arguments.
    Direct(Transform<D>),
    /// Builds the transformation from static arguments.
    Factory(TransformFactory<D>),
}

/// Registry of named transformations for one extractor instance.
pub struct TransformRegistry<D: Document> {
    entries: HashMap<String, TransformEntry<D>>,
}

impl<D: Document> TransformRegistry<D> {
    /// Create an empty registry with no transformations at all.
    ///
    /// Most callers want [`TransformRegistry::builtin`] (also the
    /// `Default`), which pre-registers the standard set.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in transformations.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        transforms::install(&mut registry);
        registry
    }

    /// Register a direct unary transformation.
    ///
    /// Names must not contain `:`; that character separates a name from
    /// its arguments in the compact descriptor form, so such a name would
    /// be unreachable. Re-registering a name replaces the previous entry.
    pub fn register<T>(&mut self, name: impl Into<String>, op: T)
    where
        T: TransformOp<D> + 'static,
    {
        let name = name.into();
        debug_assert!(!name.contains(':'), "transform names must not contain ':'");
        if self.entries.insert(name.clone(), TransformEntry::Direct(Arc::new(op))).is_some() {
            tracing::debug!(transform = %name, "transform re-registered");
        }
    }

    /// Register a parameterized transformation factory.
    ///
    /// The factory receives the positional string arguments of the
    /// compound descriptor form (`name:arg0:arg1`) and returns the
    /// concrete unary transformation. A bare reference to the name invokes
    /// the factory with no arguments.
    pub fn register_factory<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&[String]) -> Result<Transform<D>, ExtractError> + Send + Sync + 'static,
    {
        let name = name.into();
        debug_assert!(!name.contains(':'), "transform names must not contain ':'");
        if self
            .entries
            .insert(name.clone(), TransformEntry::Factory(Box::new(factory)))
            .is_some()
        {
            tracing::debug!(transform = %name, "transform re-registered");
        }
    }

    /// Check if a transformation is registered.
    pub fn has_transform(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get all registered transformation names.
    pub fn transform_names(&self) -> Vec<&String> {
        self.entries.keys().collect()
    }

    /// Get the number of registered transformations.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Resolve a descriptor into a ready-to-apply transformation.
    ///
    /// Resolution order: an exact registered name wins (including one that
    /// happens to contain the separator), then the compound form is looked
    /// up as name plus arguments, then the reference is a configuration
    /// error.
    ///
    /// # Errors
    /// * [`ExtractError::TransformNotFound`] - the name is not registered
    /// * [`ExtractError::InvalidArgs`] - a factory rejected its arguments,
    ///   or a direct transformation was given arguments
    pub fn resolve(&self, descriptor: &Descriptor<D>) -> Result<Transform<D>, ExtractError> {
        match descriptor {
            Descriptor::Inline(op) => Ok(op.clone()),
            Descriptor::ByName(name) => self.instantiate(name, &[]),
            Descriptor::ByNameWithArgs { name, args } => {
                // Descriptor::parse splits losslessly, so the unsplit
                // form can be checked against registered names before
                // compound resolution.
                let raw = format!("{}:{}", name, args.join(":"));
                if self.entries.contains_key(&raw) {
                    return self.instantiate(&raw, &[]);
                }
                self.instantiate(name, args)
            }
        }
    }

    fn instantiate(&self, name: &str, args: &[String]) -> Result<Transform<D>, ExtractError> {
        match self.entries.get(name) {
            None => Err(ExtractError::TransformNotFound(name.to_string())),
            Some(TransformEntry::Direct(op)) => {
                if args.is_empty() {
                    Ok(op.clone())
                } else {
                    Err(ExtractError::InvalidArgs {
                        transform: name.to_string(),
                        message: "takes no static arguments".to_string(),
                    })
                }
            }
            Some(TransformEntry::Factory(factory)) => factory(args),
        }
    }
}

impl<D: Document> Default for TransformRegistry<D> {
    fn default() -> Self {
        Self::builtin()
    }
}
