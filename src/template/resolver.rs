//! Asset location resolution - turns a request into a file path or URL

use std::fmt;
use std::path::PathBuf;

use crate::config::TemplateConfig;

use super::request::{trim_separators, SvgRequest};

/// Names starting with this prefix are fetched remotely
const EXTERNAL_PREFIX: &str = "http";

/// Where an asset's markup lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    /// A file under the configured asset directory
    Local(PathBuf),
    /// A remote URL, used verbatim
    External(String),
}

impl AssetLocation {
    pub fn is_external(&self) -> bool {
        matches!(self, AssetLocation::External(_))
    }
}

impl fmt::Display for AssetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLocation::Local(path) => write!(f, "{}", path.display()),
            AssetLocation::External(url) => f.write_str(url),
        }
    }
}

/// Resolve a request to its asset location
///
/// Names starting with `http` are external and returned unchanged. Anything
/// else becomes `root_dir / base_path / subfolders... / file`, where the
/// base path is the request's custom one if set. The file is the name as-is
/// when it contains a `.`, otherwise the name plus the configured extension.
///
/// No existence check happens here.
pub fn resolve_location(request: &SvgRequest, config: &TemplateConfig) -> AssetLocation {
    if request.name.starts_with(EXTERNAL_PREFIX) {
        return AssetLocation::External(request.name.clone());
    }

    let mut path = config.root_dir.clone();
    let base_path = request
        .custom_base_path
        .as_deref()
        .unwrap_or(&config.base_path);
    push_segment(&mut path, base_path);

    for subfolder in &request.subfolders {
        push_segment(&mut path, subfolder);
    }

    if request.name.contains('.') {
        push_segment(&mut path, &request.name);
    } else {
        push_segment(&mut path, &format!("{}.{}", request.name, config.extension));
    }

    AssetLocation::Local(path)
}

/// Append a segment, keeping it relative so it can't escape the base
fn push_segment(path: &mut PathBuf, segment: &str) {
    let segment = trim_separators(segment);
    if !segment.is_empty() {
        path.push(segment);
    }
}
