//! Form configuration

use serde::{Deserialize, Serialize};

/// Default capacity for the form event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Tunables for a [`Form`](crate::Form).
///
/// Deserializes with defaults for missing keys, so hosts can embed it in
/// their own configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Buffer size of the [`FormEvent`](crate::FormEvent) channel. Slow
    /// subscribers that fall further behind skip ahead.
    pub event_capacity: usize,
    /// Re-validate touched confirmation fields when their target changes.
    pub revalidate_confirmations: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            revalidate_confirmations: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: FormConfig = serde_json::from_str(r#"{ "event_capacity": 8 }"#).unwrap();
        assert_eq!(config.event_capacity, 8);
        assert!(config.revalidate_confirmations);
    }
}
