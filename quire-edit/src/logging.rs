//! Log formatting helpers.

use serde::Serialize;
use std::fmt::Debug;

/// Renders a serializable value as YAML inside a log line.
///
/// ```ignore
/// use quire_edit::Pretty;
/// use tracing::debug;
///
/// debug!("breadcrumbs: {}", Pretty(&trail));
/// ```
///
/// The YAML starts on a new line. Falls back to `{:#?}` if serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> Pretty<T> {
    fn render(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml.trim_end()),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.render(f)
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.render(f)
    }
}
