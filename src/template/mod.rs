//! SVG template facade
//!
//! [`SvgTemplate`] is the builder a view layer uses to render an inline SVG
//! asset. It resolves the asset location, fetches its markup, applies the
//! configured overrides and serializes the result.
//!
//! # Example
//!
//! ```rust,no_run
//! use svg_template::{SvgTemplate, TemplateConfig};
//!
//! let config = TemplateConfig::new().with_base_path("assets/svg/");
//! let markup = SvgTemplate::new(&config, "arrow")
//!     .add_subfolder("icons")
//!     .fill("#333")
//!     .size(16, 16)
//!     .extra_class("is-active")
//!     .render_opt()
//!     .unwrap_or_default();
//! ```

mod fetcher;
mod request;
mod resolver;

pub use fetcher::{DefaultFetcher, ResourceFetcher};
pub use request::{derived_class, SvgRequest};
pub use resolver::{resolve_location, AssetLocation};

use std::fmt;

use log::{debug, warn};

use crate::config::{ConfigError, ExtraAttribute, TemplateConfig};
use crate::document::{SerializeOptions, SvgDocument};
use crate::error::TemplateError;

use request::trim_separators;

/// Builder for a single SVG render
#[derive(Debug, Clone)]
pub struct SvgTemplate<'c> {
    config: &'c TemplateConfig,
    request: SvgRequest,
}

impl<'c> SvgTemplate<'c> {
    /// Start a render for the named asset
    ///
    /// `name` is a file name under the asset directory (with or without
    /// extension) or a full `http(s)` URL.
    pub fn new(config: &'c TemplateConfig, name: impl Into<String>) -> Self {
        Self {
            config,
            request: SvgRequest::new(config, name),
        }
    }

    /// Start a render with an element id override
    pub fn with_id(
        config: &'c TemplateConfig,
        name: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self::new(config, name).id(id)
    }

    /// Set the id given to every `svg` element
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.request.id = Some(id.into());
        self
    }

    /// Set the root fill color
    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.request.fill = Some(color.into());
        self
    }

    /// Set the root stroke color
    pub fn stroke(mut self, color: impl Into<String>) -> Self {
        self.request.stroke = Some(color.into());
        self
    }

    /// Set the root width in pixels
    pub fn width(mut self, width: impl fmt::Display) -> Self {
        self.request.width = Some(width.to_string());
        self
    }

    /// Set the root height in pixels
    pub fn height(mut self, height: impl fmt::Display) -> Self {
        self.request.height = Some(height.to_string());
        self
    }

    /// Set both width and height
    pub fn size(self, width: impl fmt::Display, height: impl fmt::Display) -> Self {
        self.width(width).height(height)
    }

    /// Use a different asset directory for this render
    pub fn custom_base_path(mut self, path: impl AsRef<str>) -> Self {
        self.request.custom_base_path = Some(trim_separators(path.as_ref()).to_string());
        self
    }

    /// Append a class to the root `class` attribute
    pub fn extra_class(mut self, class: impl Into<String>) -> Self {
        self.request.extra_classes.insert(class.into());
        self
    }

    /// Replace the extra root attribute
    pub fn extra_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.extra_attribute = Some(ExtraAttribute::new(name, value));
        self
    }

    /// Replace the extra root attribute from its `name/value` form
    pub fn extra_attribute_str(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.request.extra_attribute = Some(ExtraAttribute::parse(raw)?);
        Ok(self)
    }

    /// Append a folder between the asset directory and the file name
    pub fn add_subfolder(mut self, folder: impl AsRef<str>) -> Self {
        self.request
            .subfolders
            .push(trim_separators(folder.as_ref()).to_string());
        self
    }

    pub fn request(&self) -> &SvgRequest {
        &self.request
    }

    /// Where this render will read the asset from
    pub fn location(&self) -> AssetLocation {
        resolve_location(&self.request, self.config)
    }

    /// Render with the default fetcher
    pub fn render(self) -> Result<String, TemplateError> {
        let fetcher = self.default_fetcher();
        self.run(&fetcher)
    }

    /// Render through a caller-supplied fetcher
    pub fn render_with(self, fetcher: &dyn ResourceFetcher) -> Result<String, TemplateError> {
        self.run(fetcher)
    }

    /// Render, collapsing every failure into `None`
    pub fn render_opt(self) -> Option<String> {
        self.render().ok()
    }

    fn default_fetcher(&self) -> DefaultFetcher {
        DefaultFetcher::from_config(self.config).with_verify_tls(self.request.verify_tls)
    }

    fn run(&self, fetcher: &dyn ResourceFetcher) -> Result<String, TemplateError> {
        let location = self.location();
        debug!(
            name = self.request.name.as_str(),
            location:% = location,
            external = location.is_external();
            "Rendering SVG template"
        );

        let result = fetcher
            .fetch(&location)
            .and_then(|bytes| SvgDocument::parse(&bytes))
            .map(|mut doc| {
                doc.apply(&self.request.overrides());
                let options = SerializeOptions::new().with_pretty_print(self.config.pretty_print);
                doc.serialize(&options)
            });

        if let Err(err) = &result {
            warn!(name = self.request.name.as_str(), error:% = err; "SVG template produced no output");
        }
        result
    }
}

/// Writes the rendered markup, or nothing if the render fails
impl fmt::Display for SvgTemplate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.run(&self.default_fetcher()) {
            Ok(markup) => f.write_str(&markup),
            Err(_) => Ok(()),
        }
    }
}
