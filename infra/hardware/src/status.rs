use std::fmt;

/// Where a toggle servo currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServoStatus {
    Disabled,
    /// At rest, coming from the disabled position.
    RestDisabled,
    /// At rest, coming from the enabled position.
    RestEnabled,
    Enabled,
}

impl ServoStatus {
    /// Short text for telemetry.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::RestDisabled | Self::RestEnabled => "rest",
            Self::Enabled => "enabled",
        }
    }

    /// Whether the next toggle moves to the disabled position.
    #[must_use]
    pub const fn next_state_is_off(self) -> bool {
        matches!(self, Self::RestEnabled | Self::Enabled)
    }

    #[must_use]
    pub const fn is_resting(self) -> bool {
        matches!(self, Self::RestDisabled | Self::RestEnabled)
    }

    /// The rest status reached from `self`.
    #[must_use]
    pub const fn to_rest(self) -> Self {
        if self.next_state_is_off() { Self::RestEnabled } else { Self::RestDisabled }
    }
}

impl fmt::Display for ServoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptions_and_next_state() {
        assert_eq!(ServoStatus::Enabled.to_string(), "enabled");
        assert_eq!(ServoStatus::RestDisabled.description(), "rest");
        assert!(ServoStatus::Enabled.next_state_is_off());
        assert!(ServoStatus::RestEnabled.next_state_is_off());
        assert!(!ServoStatus::Disabled.next_state_is_off());
        assert!(!ServoStatus::RestDisabled.next_state_is_off());
    }

    #[test]
    fn rest_remembers_the_origin() {
        assert_eq!(ServoStatus::Enabled.to_rest(), ServoStatus::RestEnabled);
        assert_eq!(ServoStatus::Disabled.to_rest(), ServoStatus::RestDisabled);
        assert_eq!(ServoStatus::RestEnabled.to_rest(), ServoStatus::RestEnabled);
        assert!(ServoStatus::RestDisabled.is_resting());
    }
}
