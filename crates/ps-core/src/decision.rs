use std::fmt;

use serde::{Serialize, Serializer};

/// Human-readable screening outcome.
///
/// Label semantics are inverted with respect to intuition: a raw label of
/// `0` means the condition WAS detected. This is the encoding the classifier
/// artifacts were trained with and must be preserved as is.
///
/// # Example
/// ```
/// use ps_core::decision::Decision;
/// assert_eq!(Decision::from_label(0).as_str(), "condition detected");
/// assert_eq!(Decision::from_label(1).as_str(), "condition not detected");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Raw label `0`.
    ConditionDetected,
    /// Any other raw label.
    ConditionNotDetected,
}

impl Decision {
    /// Literal string for label `0`.
    pub const DETECTED: &'static str = "condition detected";
    /// Literal string for every other label.
    pub const NOT_DETECTED: &'static str = "condition not detected";

    /// Map a raw classifier label to a decision.
    #[must_use]
    pub fn from_label(label: i64) -> Self {
        if label == 0 {
            Self::ConditionDetected
        } else {
            Self::ConditionNotDetected
        }
    }

    /// The fixed decision string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConditionDetected => Self::DETECTED,
            Self::ConditionNotDetected => Self::NOT_DETECTED,
        }
    }
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_zero_is_detected() {
        assert_eq!(Decision::from_label(0), Decision::ConditionDetected);
        assert_eq!(Decision::from_label(0).to_string(), "condition detected");
    }

    #[test]
    fn any_non_zero_label_is_not_detected() {
        for label in [1, -1, 2, i64::MAX, i64::MIN] {
            assert_eq!(
                Decision::from_label(label).as_str(),
                "condition not detected",
                "label {label}"
            );
        }
    }
}
