//! SVG Template - inline SVG assets with presentational overrides
//!
//! This library resolves a named SVG asset to a local file or remote URL,
//! fetches its markup, applies overrides (fill, stroke, pixel size, classes,
//! one extra attribute, element id) to the root element and serializes the
//! result as markup ready to embed in an HTML page.
//!
//! # Example
//!
//! ```rust
//! use svg_template::{SvgTemplate, TemplateConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::create_dir_all(dir.path().join("assets/svg")).unwrap();
//! std::fs::write(
//!     dir.path().join("assets/svg/home.svg"),
//!     r#"<svg id="home" viewBox="0 0 24 24"><path d="M0 0"/></svg>"#,
//! )
//! .unwrap();
//!
//! let config = TemplateConfig::new()
//!     .with_root_dir(dir.path())
//!     .with_base_path("assets/svg/");
//!
//! let svg = SvgTemplate::new(&config, "home")
//!     .fill("currentColor")
//!     .width(24)
//!     .render()
//!     .unwrap();
//!
//! assert_eq!(
//!     svg,
//!     r#"<svg viewBox="0 0 24 24" fill="currentColor" width="24px" class="svg-home"><path d="M0 0"/></svg>"#
//! );
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod template;

pub use config::{verify_tls_for, ConfigError, ExtraAttribute, TemplateConfig};
pub use document::{Element, Node, Overrides, SerializeOptions, SvgDocument};
pub use error::{FailureKind, TemplateError};
pub use template::{
    resolve_location, AssetLocation, DefaultFetcher, ResourceFetcher, SvgRequest, SvgTemplate,
};
