//! Per-render request state

use indexmap::IndexSet;

use crate::config::{ExtraAttribute, TemplateConfig};
use crate::document::Overrides;

/// Everything one render needs to know about the asset and its overrides
///
/// Built through [`super::SvgTemplate`] and consumed by a single render.
#[derive(Debug, Clone)]
pub struct SvgRequest {
    pub(crate) name: String,
    pub(crate) id: Option<String>,
    pub(crate) fill: Option<String>,
    pub(crate) stroke: Option<String>,
    pub(crate) width: Option<String>,
    pub(crate) height: Option<String>,
    pub(crate) custom_base_path: Option<String>,
    pub(crate) extra_classes: IndexSet<String>,
    pub(crate) extra_attribute: Option<ExtraAttribute>,
    pub(crate) subfolders: Vec<String>,
    pub(crate) verify_tls: bool,
}

impl SvgRequest {
    /// Seed a request from the configuration defaults
    ///
    /// The class list starts with the configured defaults followed by the
    /// derived `svg-<name>` class.
    pub fn new(config: &TemplateConfig, name: impl Into<String>) -> Self {
        let name = name.into();
        let mut extra_classes: IndexSet<String> =
            config.default_extra_classes.iter().cloned().collect();
        extra_classes.insert(derived_class(&name));

        Self {
            name,
            id: None,
            fill: None,
            stroke: None,
            width: None,
            height: None,
            custom_base_path: None,
            extra_classes,
            extra_attribute: config.default_extra_attribute.clone(),
            subfolders: Vec::new(),
            verify_tls: config.verify_tls,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn custom_base_path(&self) -> Option<&str> {
        self.custom_base_path.as_deref()
    }

    pub fn extra_classes(&self) -> impl Iterator<Item = &str> {
        self.extra_classes.iter().map(|s| s.as_str())
    }

    pub fn extra_attribute(&self) -> Option<&ExtraAttribute> {
        self.extra_attribute.as_ref()
    }

    pub fn subfolders(&self) -> &[String] {
        &self.subfolders
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// Borrow the document overrides this request describes
    pub fn overrides(&self) -> Overrides<'_> {
        Overrides {
            fill: self.fill.as_deref(),
            stroke: self.stroke.as_deref(),
            width: self.width.as_deref(),
            height: self.height.as_deref(),
            classes: self.extra_classes().collect(),
            extra_attribute: self.extra_attribute.as_ref(),
            id: self.id.as_deref(),
        }
    }
}

/// Class added to every request for its asset name
pub fn derived_class(name: &str) -> String {
    format!("svg-{}", name)
}

/// Strip leading and trailing path separators
pub(crate) fn trim_separators(segment: &str) -> &str {
    segment.trim_matches(std::path::is_separator)
}
