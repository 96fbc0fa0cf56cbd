//! Channel naming: `<prefix>/<namespace>/<event>`.

use std::fmt;

/// Default channel prefix.
pub const DEFAULT_PREFIX: &str = "snapshot";

/// Namespace used when none is given.
pub const DEFAULT_NAMESPACE: &str = "default";

/// The channel scope of one namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Channel {
    prefix: String,
    namespace: String,
}

impl Default for Channel {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_NAMESPACE)
    }
}

impl Channel {
    /// Creates a channel scope. Empty parts fall back to the defaults.
    pub fn new(prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let namespace = namespace.into();
        Self {
            prefix: if prefix.is_empty() { DEFAULT_PREFIX.to_string() } else { prefix },
            namespace: if namespace.is_empty() { DEFAULT_NAMESPACE.to_string() } else { namespace },
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Full channel name of `event`.
    pub fn event(&self, event: &str) -> String {
        format!("{}/{}/{}", self.prefix, self.namespace, event)
    }

    /// Extracts the event name from `channel` if it belongs to this scope.
    pub fn parse<'c>(&self, channel: &'c str) -> Option<&'c str> {
        let rest = channel.strip_prefix(self.prefix.as_str())?.strip_prefix('/')?;
        let event = rest.strip_prefix(self.namespace.as_str())?.strip_prefix('/')?;
        if event.is_empty() || event.contains('/') {
            None
        } else {
            Some(event)
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name() {
        let channel = Channel::default();
        assert_eq!(channel.event("contentUpdated"), "snapshot/default/contentUpdated");
        assert_eq!(channel.to_string(), "snapshot/default");
    }

    #[test]
    fn test_empty_parts_default() {
        let channel = Channel::new("", "");
        assert_eq!(channel, Channel::default());
    }

    #[test]
    fn test_parse() {
        let channel = Channel::new("snapshot", "words");
        assert_eq!(channel.parse("snapshot/words/perPage"), Some("perPage"));
        assert_eq!(channel.parse("snapshot/default/perPage"), None);
        assert_eq!(channel.parse("other/words/perPage"), None);
        assert_eq!(channel.parse("snapshot/wordsmith/perPage"), None);
        assert_eq!(channel.parse("snapshot/words/"), None);
        assert_eq!(channel.parse("snapshot/words/a/b"), None);
    }
}
