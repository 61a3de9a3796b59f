//! # Domnom: Declarative DOM Data Extraction
//!
//! Domnom derives a flat mapping of named values from a tree-shaped
//! document. Each output field names a location in the document (a
//! selector) and an ordered chain of transformations to apply to whatever
//! was found there.
//!
//! ## Features
//!
//! - **Transformation registry**: named, composable unary transformations
//!   over nodes, strings, numbers and arrays, extensible per extractor
//!   instance
//! - **Compact descriptors**: pipeline stages written as `"trim"` or
//!   `"split:,:2"`, or supplied as inline functions
//! - **Backend-agnostic**: the document is behind a trait; an HTML
//!   backend built on `scraper` is included
//! - **Memoized selection**: within one extraction call each selector
//!   string is queried at most once
//! - **Declarative plans**: load field definitions from YAML or JSON
//!
//! ## Example
//!
//! ```ignore
//! use domnom::{extract, ExtractionPlan};
//! use scraper::Html;
//!
//! let html = Html::parse_document(r#"
//!     <article>
//!       <h1 class="title">  Domnom  </h1>
//!       <span class="price">  19.90 EUR </span>
//!     </article>
//! "#);
//!
//! let plan = ExtractionPlan::from_yaml_str(r#"
//! fields:
//!   title:
//!     selector: ".title"
//!     transformations: ["inner-text", "trim"]
//!   price:
//!     selector: ".price"
//!     transformations: ["inner-text", "trim", "to-float"]
//! "#)?;
//!
//! let output = extract(&html, html.root_element().id(), &plan.to_config())?;
//! ```
//!
//! Type mismatches inside a chain do not fail the call: a transformation
//! that receives input it does not act on yields the `Inapplicable`
//! sentinel and the chain continues. Unresolvable transformation names,
//! by contrast, are configuration errors that abort the whole call.

// Core modules
pub mod document;
pub mod error;
pub mod extractor;
pub mod plan;
pub mod registry;
pub mod value;

// Built-in transformation set
mod transforms;

// HTML backend
pub mod html;

// Re-export key types
pub use document::Document;
pub use error::{ExtractError, PlanError};
pub use extractor::{
    extract, Condition, Descriptor, ExtractionConfig, Extractor, FieldSpec, Output,
};
pub use html::extract_from_html;
pub use plan::{ExtractionPlan, FieldDef};
pub use registry::{Transform, TransformFactory, TransformOp, TransformRegistry};
pub use value::Value;
