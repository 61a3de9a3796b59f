//! The extraction interpreter.
//!
//! An [`Extractor`] evaluates an [`ExtractionConfig`] against a document:
//! for each field it resolves the optional selector (memoized per call),
//! folds the transformation chain left-to-right over the resolved value,
//! and assembles the results into the output mapping. Entries are
//! independent; no field may depend on another field's output.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::document::Document;
use crate::error::ExtractError;
use crate::registry::{Transform, TransformOp, TransformRegistry};
use crate::value::Value;

/// Zero-argument predicate gating a field. When it evaluates false the
/// field is omitted from the output entirely.
pub type Condition = Box<dyn Fn() -> bool + Send + Sync>;

/// One pipeline stage as written in a configuration.
///
/// The compact string form is parsed once, ahead of application:
/// `"trim"` becomes [`Descriptor::ByName`] and `"split:,:2"` becomes
/// [`Descriptor::ByNameWithArgs`] with arguments `[",", "2"]`.
pub enum Descriptor<D: Document> {
    /// A bare registry name.
    ByName(String),
    /// A name plus positional arguments from the `name:arg0:arg1` form.
    ByNameWithArgs { name: String, args: Vec<String> },
    /// A transformation supplied directly by host code.
    Inline(Transform<D>),
}

impl<D: Document> Descriptor<D> {
    /// Parse the compact string form.
    ///
    /// The string is split on the first `:` into a name and a remainder;
    /// the remainder is split on the same separator into positional
    /// arguments, with no trimming or coercion. Whether the name resolves
    /// is decided later, against the extractor's registry.
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((name, rest)) => Descriptor::ByNameWithArgs {
                name: name.to_string(),
                args: rest.split(':').map(str::to_string).collect(),
            },
            None => Descriptor::ByName(text.to_string()),
        }
    }

    /// Wrap a host-supplied transformation.
    pub fn inline<T>(op: T) -> Self
    where
        T: TransformOp<D> + 'static,
    {
        Descriptor::Inline(std::sync::Arc::new(op))
    }
}

impl<D: Document> std::fmt::Debug for Descriptor<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Descriptor::ByName(name) => f.debug_tuple("ByName").field(name).finish(),
            Descriptor::ByNameWithArgs { name, args } => f
                .debug_struct("ByNameWithArgs")
                .field("name", name)
                .field("args", args)
                .finish(),
            Descriptor::Inline(_) => f.write_str("Inline"),
        }
    }
}

/// Describes how to derive one output value.
pub struct FieldSpec<D: Document> {
    /// Optional gate; a false evaluation skips the field entirely.
    pub condition: Option<Condition>,
    /// Optional query resolved against the root node. Absent means the
    /// field operates on the root node itself.
    pub selector: Option<String>,
    /// Ordered pipeline applied to the resolved value.
    pub transformations: Vec<Descriptor<D>>,
}

impl<D: Document> FieldSpec<D> {
    pub fn new() -> Self {
        Self {
            condition: None,
            selector: None,
            transformations: Vec::new(),
        }
    }

    /// Set the selector.
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Append a stage in the compact string form.
    pub fn transform(mut self, descriptor: &str) -> Self {
        self.transformations.push(Descriptor::parse(descriptor));
        self
    }

    /// Append a host-supplied transformation stage.
    pub fn transform_fn<T>(mut self, op: T) -> Self
    where
        T: TransformOp<D> + 'static,
    {
        self.transformations.push(Descriptor::inline(op));
        self
    }

    /// Gate the field on a predicate.
    pub fn condition<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Box::new(predicate));
        self
    }
}

impl<D: Document> Default for FieldSpec<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration mapping output keys to field specs.
pub struct ExtractionConfig<D: Document> {
    fields: IndexMap<String, FieldSpec<D>>,
}

impl<D: Document> ExtractionConfig<D> {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Add a field, replacing any previous spec under the same key.
    pub fn field(mut self, key: impl Into<String>, spec: FieldSpec<D>) -> Self {
        self.fields.insert(key.into(), spec);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, spec: FieldSpec<D>) {
        self.fields.insert(key.into(), spec);
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldSpec<D>)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<D: Document> Default for ExtractionConfig<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> FromIterator<(String, FieldSpec<D>)> for ExtractionConfig<D> {
    fn from_iter<I: IntoIterator<Item = (String, FieldSpec<D>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Output mapping: key to derived value. Fields skipped by their
/// condition are absent, not null-valued.
pub type Output<N> = IndexMap<String, Value<N>>;

/// The extraction interpreter. Owns its transformation registry, so
/// registering custom transformations on one extractor never affects
/// another.
pub struct Extractor<D: Document> {
    registry: TransformRegistry<D>,
}

impl<D: Document> Extractor<D> {
    /// Create an extractor with the built-in transformation set.
    pub fn new() -> Self {
        Self {
            registry: TransformRegistry::builtin(),
        }
    }

    /// Create an extractor with a custom registry.
    pub fn with_registry(registry: TransformRegistry<D>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TransformRegistry<D> {
        &self.registry
    }

    /// Mutable access for registering custom transformations before
    /// extraction. This is the sole extension mechanism.
    pub fn registry_mut(&mut self) -> &mut TransformRegistry<D> {
        &mut self.registry
    }

    /// Extract all configured fields from `doc`, starting at `root`.
    ///
    /// Within one call each distinct selector string is queried against
    /// the document at most once, however many fields reference it; the
    /// cache also remembers selectors that matched nothing. The cache
    /// lives and dies with the call.
    ///
    /// # Errors
    /// Configuration errors (an unresolvable transformation reference,
    /// bad static arguments, an invalid selector) abort the whole call;
    /// no partial output is returned. Type mismatches inside a chain are
    /// not errors (see [`Value::Inapplicable`]).
    pub fn extract(
        &self,
        doc: &D,
        root: D::Node,
        config: &ExtractionConfig<D>,
    ) -> Result<Output<D::Node>, ExtractError> {
        tracing::debug!(fields = config.len(), "starting extraction");
        let mut memoized: HashMap<&str, Option<D::Node>> = HashMap::new();
        let mut output = Output::new();

        for (key, spec) in config.fields() {
            if let Some(condition) = &spec.condition {
                if !condition() {
                    tracing::debug!(field = %key, "condition rejected field");
                    continue;
                }
            }

            let mut current = Value::Node(root.clone());

            if let Some(selector) = &spec.selector {
                let resolved = match memoized.get(selector.as_str()) {
                    Some(hit) => {
                        tracing::trace!(field = %key, selector = %selector, "memoized selection");
                        hit.clone()
                    }
                    None => {
                        let found = doc.query_one(&root, selector)?;
                        memoized.insert(selector.as_str(), found.clone());
                        found
                    }
                };
                current = match resolved {
                    Some(node) => Value::Node(node),
                    None => Value::Null,
                };
            }

            for descriptor in &spec.transformations {
                let transform = self.registry.resolve(descriptor)?;
                current = transform.apply(doc, current)?;
            }

            output.insert(key.clone(), current);
        }

        Ok(output)
    }
}

impl<D: Document> Default for Extractor<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract in one call with the built-in transformation set.
///
/// Construction and extraction are the same act; use [`Extractor`] only
/// when you need to register custom transformations first.
pub fn extract<D: Document>(
    doc: &D,
    root: D::Node,
    config: &ExtractionConfig<D>,
) -> Result<Output<D::Node>, ExtractError> {
    Extractor::new().extract(doc, root, config)
}
