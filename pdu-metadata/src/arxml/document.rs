//! In-memory ARXML documents and element navigation helpers
//!
//! ARXML files are parsed into a read-only `roxmltree` tree. Elements are
//! matched by local name within the configured AUTOSAR namespace; no schema
//! validation is performed, so partially populated documents are accepted.

use crate::types::{ExtractError, Result};
use roxmltree::{Document, Node};
use std::path::Path;

/// Namespace of AUTOSAR R4.x documents
pub const AUTOSAR_NS: &str = "http://autosar.org/schema/r4.0";

/// Raw ARXML text together with the name it was loaded from
#[derive(Debug, Clone)]
pub struct ArxmlDocument {
    source: String,
    text: String,
}

impl ArxmlDocument {
    /// Read an ARXML file into memory
    pub fn from_path(path: &Path) -> Result<Self> {
        log::info!("Loading ARXML file: {:?}", path);

        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }

        let source = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.arxml")
            .to_string();

        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_string(source, text))
    }

    /// Wrap ARXML text that is already in memory
    pub fn from_string(source: impl Into<String>, text: impl Into<String>) -> Self {
        let mut text = text.into();
        if text.starts_with('\u{feff}') {
            text.replace_range(..'\u{feff}'.len_utf8(), "");
        }
        Self {
            source: source.into(),
            text,
        }
    }

    /// File name (or caller-supplied label) of this document
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parse the document, matching elements in `namespace`
    pub fn tree(&self, namespace: &str) -> Result<ArxmlTree<'_>> {
        ArxmlTree::parse(&self.source, &self.text, namespace)
    }
}

/// A parsed ARXML document
pub struct ArxmlTree<'input> {
    document: Document<'input>,
    namespace: String,
}

impl<'input> ArxmlTree<'input> {
    /// Parse ARXML text; malformed XML is reported with the source name
    pub fn parse(source: &str, text: &'input str, namespace: &str) -> Result<Self> {
        let document = Document::parse(text).map_err(|e| ExtractError::XmlParseError {
            source_name: source.to_string(),
            message: e.to_string(),
        })?;

        log::debug!(
            "Parsed {} ({} nodes)",
            source,
            document.descendants().count()
        );

        Ok(Self {
            document,
            namespace: namespace.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Every element named `name`, anywhere in the document, in document order
    pub fn elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
        self.document
            .descendants()
            .filter(move |node| self.is_named(node, name))
    }

    /// True if `node` is an AUTOSAR element with local name `name`
    pub fn is_named(&self, node: &Node<'_, '_>, name: &str) -> bool {
        node.is_element()
            && node.tag_name().name() == name
            && node.tag_name().namespace() == Some(self.namespace.as_str())
    }

    /// First direct child named `name`
    pub fn find_sub_element<'a>(&self, element: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
        element.children().find(|child| self.is_named(child, name))
    }

    /// All direct children named `name`
    pub fn find_all_sub_elements<'a>(&self, element: Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
        element
            .children()
            .filter(|child| self.is_named(child, name))
            .collect()
    }

    /// First element named `name` below `element` (at any depth)
    pub fn find_descendant<'a>(&self, element: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
        element
            .descendants()
            .skip(1)
            .find(|node| self.is_named(node, name))
    }

    /// Follow a chain of direct children, e.g. `["COMPU-CONST", "VT"]`
    pub fn find_path<'a>(&self, element: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
        path.iter()
            .try_fold(element, |current, name| self.find_sub_element(current, name))
    }

    /// All elements matching `path` where the first step may be at any depth
    /// below `element` and the remaining steps are direct children.
    pub fn find_all_by_path<'a>(&self, element: Node<'a, 'input>, path: &[&str]) -> Vec<Node<'a, 'input>> {
        let Some((first, rest)) = path.split_first() else {
            return Vec::new();
        };

        let mut current: Vec<Node<'a, 'input>> = element
            .descendants()
            .skip(1)
            .filter(|node| self.is_named(node, first))
            .collect();

        for name in rest {
            current = current
                .into_iter()
                .flat_map(|node| self.find_all_sub_elements(node, name))
                .collect();
        }

        current
    }

    /// Text of the direct child `name`; `None` only when the child is missing
    pub fn get_sub_element_text(&self, element: Node<'_, 'input>, name: &str) -> Option<String> {
        self.find_sub_element(element, name).map(element_text)
    }

    /// SHORT-NAME of an identifiable element
    pub fn short_name(&self, element: Node<'_, 'input>) -> Option<String> {
        self.get_sub_element_text(element, "SHORT-NAME")
    }

    /// AUTOSAR path of an element: the short names of it and its identifiable
    /// ancestors, outermost first, e.g. `/Types/ApplicationTypes/Speed`.
    pub fn autosar_path(&self, element: Node<'_, 'input>) -> Option<String> {
        let mut names: Vec<String> = element
            .ancestors()
            .filter_map(|node| self.short_name(node))
            .collect();

        if names.is_empty() {
            return None;
        }

        names.reverse();
        Some(format!("/{}", names.join("/")))
    }
}

/// Trimmed text content of an element (empty for elements without text)
pub fn element_text(node: Node<'_, '_>) -> String {
    node.text().map(str::trim).unwrap_or_default().to_string()
}

/// Short name a reference points at: the last segment of its path
pub fn reference_target_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
