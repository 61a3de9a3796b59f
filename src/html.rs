//! HTML document backend built on `scraper`.
//!
//! Nodes are `ego_tree` node ids: plain handles into the parsed tree, so
//! extracted values do not borrow the document and one [`Extractor`]
//! serves any number of documents.
//!
//! ```ignore
//! use domnom::{extract, ExtractionPlan};
//! use scraper::Html;
//!
//! let html = Html::parse_document(r#"<p class="title">  Hello World  </p>"#);
//! let plan = ExtractionPlan::from_yaml_str(
//!     "fields:\n  title:\n    selector: \".title\"\n    transformations: [\"inner-text\", \"trim\"]\n",
//! )?;
//! let output = extract(&html, html.root_element().id(), &plan.to_config())?;
//! ```

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::document::Document;
use crate::error::ExtractError;
use crate::extractor::{extract, ExtractionConfig, Output};

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn element_of(html: &Html, id: NodeId) -> Option<ElementRef<'_>> {
    html.tree.get(id).and_then(ElementRef::wrap)
}

impl Document for Html {
    type Node = NodeId;

    fn query_one(&self, scope: &NodeId, selector: &str) -> Result<Option<NodeId>, ExtractError> {
        let selector = parse_selector(selector)?;
        // A non-element scope has no element descendants to match.
        Ok(element_of(self, *scope)
            .and_then(|el| el.select(&selector).next())
            .map(|found| found.id()))
    }

    fn query_all(&self, scope: &NodeId, selector: &str) -> Result<Vec<NodeId>, ExtractError> {
        let selector = parse_selector(selector)?;
        Ok(element_of(self, *scope)
            .map(|el| el.select(&selector).map(|found| found.id()).collect())
            .unwrap_or_default())
    }

    fn inner_html(&self, node: &NodeId) -> String {
        element_of(self, *node).map(|el| el.inner_html()).unwrap_or_default()
    }

    fn inner_text(&self, node: &NodeId) -> String {
        element_of(self, *node)
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    fn form_value(&self, node: &NodeId) -> Option<String> {
        let el = element_of(self, *node)?;
        match el.value().name() {
            // A textarea's value is its text content; an input's value
            // defaults to the empty string when the attribute is absent.
            "textarea" => Some(el.text().collect()),
            "input" => Some(el.value().attr("value").unwrap_or("").to_string()),
            _ => el.value().attr("value").map(str::to_string),
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        element_of(self, *node).and_then(|el| el.value().attr(name).map(str::to_string))
    }

    fn fragment_text(&self, markup: &str) -> String {
        // Detached scratch fragment; entities decode during parsing and
        // the fragment is dropped before returning.
        let fragment = Html::parse_fragment(markup);
        fragment.root_element().text().collect()
    }
}

/// Extract from a parsed HTML document, starting at its root element.
pub fn extract_from_html(
    html: &Html,
    config: &ExtractionConfig<Html>,
) -> Result<Output<NodeId>, ExtractError> {
    extract(html, html.root_element().id(), config)
}
