//! When a field validates on its own

use bitflags::bitflags;

bitflags! {
    /// Events that start a validation run without an explicit request.
    ///
    /// `validate_now` and form submission always run, whatever the policy,
    /// so [`TriggerPolicy::MANUAL`] describes on-demand / on-submit fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TriggerPolicy: u8 {
        /// Validate whenever the value is set.
        const ON_VALUE_CHANGE = 0b0000_0001;
        /// Validate when the field loses focus.
        const ON_BLUR = 0b0000_0010;
    }
}

impl TriggerPolicy {
    /// No automatic trigger.
    pub const MANUAL: Self = Self::empty();
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self::ON_VALUE_CHANGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_value_change() {
        assert_eq!(TriggerPolicy::default(), TriggerPolicy::ON_VALUE_CHANGE);
    }

    #[test]
    fn combinations() {
        let both = TriggerPolicy::ON_VALUE_CHANGE | TriggerPolicy::ON_BLUR;
        assert!(both.contains(TriggerPolicy::ON_BLUR));
        assert!(!TriggerPolicy::MANUAL.contains(TriggerPolicy::ON_VALUE_CHANGE));
    }
}
