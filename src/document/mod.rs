//! Mutable SVG document tree
//!
//! Raw bytes are parsed with `roxmltree` and copied into a small owned tree
//! of elements, text and comments. The tree only supports what the template
//! pipeline needs: attribute get/set/remove on elements and traversal by tag
//! name. Namespace declarations are kept as plain `xmlns` attributes so the
//! serialized markup stays embeddable.

mod serialize;

pub use serialize::SerializeOptions;

use indexmap::IndexMap;
use log::trace;

use crate::config::ExtraAttribute;
use crate::error::TemplateError;

/// Elements whose whitespace-only text is significant
const WHITESPACE_PRESERVING: &[&str] = &["text", "tspan", "textPath", "title", "desc", "style"];

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A node in the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An element with its ordered attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified tag name, including any prefix (`svg`, `svg:svg`)
    pub name: String,
    /// Attributes in document order
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Tag name without its namespace prefix
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute, keeping the order of the others
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Iterate over direct child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Visit this element and every descendant element, parents first
    pub fn visit_elements_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        visit(self);
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.visit_elements_mut(visit);
            }
        }
    }

    /// Merge adjacent text, drop empty text and ignorable whitespace
    ///
    /// Whitespace is kept anywhere under a text content element or under
    /// `xml:space="preserve"`.
    pub fn normalize(&mut self) {
        self.normalize_within(false);
    }

    fn normalize_within(&mut self, inherited_preserve: bool) {
        let preserve = WHITESPACE_PRESERVING.contains(&self.local_name())
            || match self.attribute("xml:space") {
                Some("preserve") => true,
                Some("default") => false,
                _ => inherited_preserve,
            };

        let mut merged: Vec<Node> = Vec::with_capacity(self.children.len());
        for child in std::mem::take(&mut self.children) {
            match child {
                Node::Text(text) => {
                    if let Some(Node::Text(previous)) = merged.last_mut() {
                        previous.push_str(&text);
                    } else {
                        merged.push(Node::Text(text));
                    }
                }
                Node::Element(mut element) => {
                    element.normalize_within(preserve);
                    merged.push(Node::Element(element));
                }
                comment => merged.push(comment),
            }
        }

        let has_markup = merged.iter().any(|node| !matches!(node, Node::Text(_)));
        merged.retain(|node| match node {
            Node::Text(text) => {
                !text.is_empty() && (preserve || !has_markup || !text.trim().is_empty())
            }
            _ => true,
        });

        self.children = merged;
    }
}

/// Presentational overrides applied to a parsed document
///
/// Empty strings are treated like unset values.
#[derive(Debug, Clone, Default)]
pub struct Overrides<'a> {
    pub fill: Option<&'a str>,
    pub stroke: Option<&'a str>,
    pub width: Option<&'a str>,
    pub height: Option<&'a str>,
    pub classes: Vec<&'a str>,
    pub extra_attribute: Option<&'a ExtraAttribute>,
    pub id: Option<&'a str>,
}

/// A parsed SVG document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    root: Element,
}

impl SvgDocument {
    /// Parse raw bytes as XML
    ///
    /// Fails if the bytes are not UTF-8, not well-formed, or contain no
    /// root element. A DOCTYPE is accepted; a leading byte order mark is
    /// skipped.
    pub fn parse(bytes: &[u8]) -> Result<Self, TemplateError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| TemplateError::parse(format!("content is not valid UTF-8: {}", e)))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        if text.trim().is_empty() {
            return Err(TemplateError::parse("document has no root element"));
        }

        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)
            .map_err(|e| TemplateError::parse(e.to_string()))?;

        let root = convert_element(text, doc.root_element());
        trace!(root = root.name.as_str(); "Parsed SVG document");
        Ok(Self { root })
    }

    /// Wrap an existing element tree
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Apply overrides and normalize the tree
    ///
    /// Fill, stroke, dimensions, classes and the extra attribute go on the
    /// root element. The `id` pass runs last over every `svg` element: each
    /// gets the override id, or loses its own id when no override is set.
    pub fn apply(&mut self, overrides: &Overrides<'_>) {
        let root = &mut self.root;

        if let Some(fill) = non_empty(overrides.fill) {
            root.set_attribute("fill", fill);
        }
        if let Some(stroke) = non_empty(overrides.stroke) {
            root.set_attribute("stroke", stroke);
        }
        if let Some(width) = non_empty(overrides.width) {
            root.set_attribute("width", format!("{}px", width));
        }
        if let Some(height) = non_empty(overrides.height) {
            root.set_attribute("height", format!("{}px", height));
        }
        if !overrides.classes.is_empty() {
            root.set_attribute("class", overrides.classes.join(" "));
        }
        if let Some(attribute) = overrides.extra_attribute {
            root.set_attribute(attribute.name.as_str(), attribute.value.as_str());
        }

        let id = non_empty(overrides.id);
        self.root.visit_elements_mut(&mut |element| {
            if element.local_name() != "svg" {
                return;
            }
            match id {
                Some(id) => element.set_attribute("id", id),
                None => {
                    element.remove_attribute("id");
                }
            }
        });

        self.normalize();
    }

    pub fn normalize(&mut self) {
        self.root.normalize();
    }

    /// Serialize to embeddable markup
    pub fn serialize(&self, options: &SerializeOptions) -> String {
        serialize::write_document(self, options)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn convert_element(input: &str, node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(element_name(input, node));

    // Only declarations introduced here; inherited ones live on an ancestor
    let inherited = node
        .parent_element()
        .map(|parent| parent.namespaces().collect::<Vec<_>>())
        .unwrap_or_default();
    for namespace in node.namespaces() {
        if namespace.name() == Some("xml") {
            continue;
        }
        let is_inherited = inherited
            .iter()
            .any(|ns| ns.name() == namespace.name() && ns.uri() == namespace.uri());
        if is_inherited {
            continue;
        }
        let name = match namespace.name() {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        element.set_attribute(name, namespace.uri());
    }

    for attribute in node.attributes() {
        let name = attribute_name(node, attribute.namespace(), attribute.name());
        element.set_attribute(name, attribute.value());
    }

    for child in node.children() {
        if child.is_element() {
            element
                .children
                .push(Node::Element(convert_element(input, child)));
        } else if child.is_text() {
            element
                .children
                .push(Node::Text(child.text().unwrap_or_default().to_string()));
        } else if child.is_comment() {
            element
                .children
                .push(Node::Comment(child.text().unwrap_or_default().to_string()));
        }
    }

    element
}

/// Tag name exactly as written in the start tag
///
/// Several prefixes (or the default namespace) can map to the same URI, so
/// the name is read back from the source rather than rebuilt from the URI.
fn element_name(input: &str, node: roxmltree::Node<'_, '_>) -> String {
    let local = node.tag_name().name();
    let written = input
        .get(node.range().start + 1..)
        .and_then(|rest| {
            rest.find(|c: char| c.is_whitespace() || c == '/' || c == '>')
                .map(|end| &rest[..end])
        })
        .filter(|name| name.rsplit(':').next() == Some(local));

    match written {
        Some(name) => name.to_string(),
        None => {
            let default_uri = node
                .namespaces()
                .find(|ns| ns.name().is_none())
                .map(|ns| ns.uri());
            match node.tag_name().namespace() {
                Some(uri) if default_uri != Some(uri) => attribute_name(node, Some(uri), local),
                _ => local.to_string(),
            }
        }
    }
}

/// Attributes never take the default namespace, so only named prefixes count
fn attribute_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let Some(uri) = namespace else {
        return local.to_string();
    };
    let prefix = if uri == XML_NAMESPACE {
        Some("xml")
    } else {
        node.namespaces()
            .find(|ns| ns.uri() == uri && ns.name().is_some())
            .and_then(|ns| ns.name())
    };
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}
