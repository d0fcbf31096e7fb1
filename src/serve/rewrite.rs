use crate::engine::index::ResourceIndex;
use crate::serve::url_calculator::UrlCalculator;
use crate::shared::path::strip_leading_slash;
use tracing::{debug, warn};
use url::Url;

/// Serve-time reference rewriting: resolve a reference found in markup, look
/// it up in the content index, and replace it with the CDN URL for the node
/// the content hashes to.
///
/// Read-only after construction and shared across all in-flight requests; a
/// failure to rewrite any single reference degrades to serving the original
/// string, never to failing the response.
#[derive(Debug)]
pub struct RewriteEngine {
    index: ResourceIndex,
    calculator: UrlCalculator,
}

impl RewriteEngine {
    pub fn new(index: ResourceIndex, calculator: UrlCalculator) -> Self {
        Self { index, calculator }
    }

    /// Resolves a reference to the logical index path it addresses, if any:
    /// standard URI-reference resolution against `base`, restricted to the
    /// page's own authority, minus the servlet context prefix and the
    /// leading slash. `None` for URIs without a usable path (`mailto:` and
    /// friends) and for other hosts' URLs.
    pub fn resolve(reference: &str, base: &Url, context_path: &str) -> Option<String> {
        let resolved = base.join(reference).ok()?;
        if !matches!(resolved.scheme(), "http" | "https") {
            return None;
        }
        if resolved.host_str() != base.host_str()
            || resolved.port_or_known_default() != base.port_or_known_default()
        {
            return None;
        }

        let mut path = resolved.path();
        if !context_path.is_empty() {
            path = path.strip_prefix(context_path).unwrap_or(path);
        }
        let logical = strip_leading_slash(path);
        if logical.is_empty() {
            None
        } else {
            Some(logical.to_string())
        }
    }

    /// Rewrites one reference. Always returns *some* string: anything that
    /// cannot be resolved, is not managed by the index, or fails node
    /// selection comes back unchanged.
    pub fn rewrite(&self, reference: &str, base: &Url, context_path: &str) -> String {
        if base.join(reference).is_err() {
            debug!(target: "serve::rewrite", reference, "Unparseable reference, passing through");
            return reference.to_string();
        }

        let Some(logical) = Self::resolve(reference, base, context_path) else {
            return reference.to_string();
        };
        let Some(label) = self.index.lookup(&logical) else {
            debug!(target: "serve::rewrite", path = logical, "Not a managed resource");
            return reference.to_string();
        };

        match self.calculator.calculate_url(label, base) {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    target: "serve::rewrite",
                    path = logical,
                    error = %e,
                    "Node selection failed, serving original reference"
                );
                reference.to_string()
            }
        }
    }

    pub fn index(&self) -> &ResourceIndex {
        &self.index
    }
}
