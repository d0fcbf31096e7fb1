use crate::serve::errors::NodeTableError;
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// URL scheme a page is served under. CDN nodes carry an independent URL
/// template per scheme, usually the same host with a different port or
/// path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// The table to use for a page's base URI. Only https selects the https
    /// template; anything else falls back to http.
    pub fn of(base: &Url) -> Self {
        if base.scheme() == "https" {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// The CDN node tables: per scheme, node name (host) to base URL.
///
/// Loaded from a newline-delimited list of `http://host[:port][/prefix]` and
/// `https://…` entries; blank lines are ignored, every node must appear under
/// both schemes exactly once, and every entry is normalized to end in `/` so
/// a fingerprinted path can be appended directly.
#[derive(Debug, Clone)]
pub struct NodeTable {
    http: BTreeMap<String, String>,
    https: BTreeMap<String, String>,
}

impl NodeTable {
    pub fn parse(text: &str) -> Result<Self, NodeTableError> {
        let mut http = BTreeMap::new();
        let mut https = BTreeMap::new();

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }

            let url = Url::parse(entry).map_err(|_| NodeTableError::Malformed {
                line: line_no,
                entry: entry.to_string(),
            })?;
            let table = match url.scheme() {
                "http" => &mut http,
                "https" => &mut https,
                other => {
                    return Err(NodeTableError::UnsupportedScheme {
                        line: line_no,
                        scheme: other.to_string(),
                    });
                }
            };
            let node = url
                .host_str()
                .ok_or_else(|| NodeTableError::Malformed {
                    line: line_no,
                    entry: entry.to_string(),
                })?
                .to_string();

            let mut base = url.as_str().to_string();
            if !base.ends_with('/') {
                base.push('/');
            }

            let scheme = if url.scheme() == "http" {
                "http"
            } else {
                "https"
            };
            if table.insert(node.clone(), base).is_some() {
                return Err(NodeTableError::Duplicate { node, scheme });
            }
        }

        if http.is_empty() && https.is_empty() {
            return Err(NodeTableError::Empty);
        }
        for node in http.keys() {
            if !https.contains_key(node) {
                return Err(NodeTableError::MissingScheme {
                    node: node.clone(),
                    scheme: "https",
                });
            }
        }
        for node in https.keys() {
            if !http.contains_key(node) {
                return Err(NodeTableError::MissingScheme {
                    node: node.clone(),
                    scheme: "http",
                });
            }
        }

        Ok(Self { http, https })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, NodeTableError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Node names, one per host, in stable order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.http.keys().map(String::as_str)
    }

    pub fn base_for(&self, scheme: Scheme, node: &str) -> Option<&str> {
        let table = match scheme {
            Scheme::Http => &self.http,
            Scheme::Https => &self.https,
        };
        table.get(node).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.http.len()
    }

    pub fn is_empty(&self) -> bool {
        self.http.is_empty()
    }
}
