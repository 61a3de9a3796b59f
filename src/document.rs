//! The boundary between the engine and the document it reads.
//!
//! The engine never walks a tree itself; everything it needs from the host
//! document is behind the [`Document`] trait. Implement it to extract from
//! any tree-shaped format with a string selector language. A `scraper`
//! backed implementation for HTML lives in [`crate::html`].

use crate::error::ExtractError;

/// Query and read capabilities required from a document backend.
///
/// All methods are read-only; the engine never mutates the tree, so
/// concurrent extraction calls over one document are safe as long as
/// nothing else mutates it. Backends own their tree (`'static`), and
/// nodes are handles into it rather than borrows.
pub trait Document: 'static {
    /// Handle to a node within the document. Handles are cheap to clone
    /// and only meaningful together with the document they came from.
    type Node: Clone;

    /// Find the first descendant of `scope` matching `selector`.
    ///
    /// # Errors
    /// Returns [`ExtractError::InvalidSelector`] if the backend rejects
    /// the selector string. An invalid selector is a configuration error
    /// and aborts the extraction call.
    fn query_one(
        &self,
        scope: &Self::Node,
        selector: &str,
    ) -> Result<Option<Self::Node>, ExtractError>;

    /// Find all descendants of `scope` matching `selector`, in document
    /// order. An empty result is not an error.
    fn query_all(
        &self,
        scope: &Self::Node,
        selector: &str,
    ) -> Result<Vec<Self::Node>, ExtractError>;

    /// The serialized markup content of the node.
    fn inner_html(&self, node: &Self::Node) -> String;

    /// The rendered text content of the node and its descendants.
    fn inner_text(&self, node: &Self::Node) -> String;

    /// The form-control value of the node, if it has one.
    fn form_value(&self, node: &Self::Node) -> Option<String>;

    /// A named attribute of the node, or `None` if absent.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Parse `markup` as a detached fragment and return its decoded text
    /// content. The fragment is scratch space: it must never be attached
    /// to the document tree and must not outlive the call. Markup with no
    /// text content yields the empty string.
    fn fragment_text(&self, markup: &str) -> String;
}
