/// Scheme used when none is configured
pub const DEFAULT_PROTOCOL: &str = "oxidize://";

/// The custom-protocol scheme that marks links needing resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    scheme: String,
}

impl ProtocolConfig {
    /// Accepts `"mypdf"` or `"mypdf://"`; both configure the same scheme
    pub fn new(scheme: &str) -> Self {
        let bare = scheme.trim().trim_end_matches("://");
        Self {
            scheme: format!("{}://", bare.to_ascii_lowercase()),
        }
    }

    /// The scheme including the `://` separator
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// If `target` uses this scheme (ASCII case-insensitive), the remainder
    /// after the separator
    pub fn strip<'a>(&self, target: &'a str) -> Option<&'a str> {
        let prefix = target.get(..self.scheme.len())?;
        if prefix.eq_ignore_ascii_case(&self.scheme) {
            Some(&target[self.scheme.len()..])
        } else {
            None
        }
    }

    pub fn matches(&self, target: &str) -> bool {
        self.strip(target).is_some()
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOL)
    }
}
