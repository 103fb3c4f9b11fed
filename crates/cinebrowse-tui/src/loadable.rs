//! Three-state wrapper for independently fetched values.

/// Status of one independently fetched value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Loadable<T> {
    /// Request in flight.
    #[default]
    Pending,
    /// Value received.
    Ready(T),
    /// Request failed; no automatic retry.
    Failed,
}

impl<T> Loadable<T> {
    /// Converts a fetch outcome, logging the failure.
    pub fn from_outcome(outcome: anyhow::Result<T>, what: &str) -> Self {
        match outcome {
            Ok(value) => Self::Ready(value),
            Err(e) => {
                tracing::warn!(error = %e, "{what} fetch failed");
                Self::Failed
            }
        }
    }

    /// Whether the request is still in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether the request failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Received value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Pending | Self::Failed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_outcome() {
        // Arrange & Act
        let ok: Loadable<u32> = Loadable::from_outcome(Ok(3), "test");
        let failed: Loadable<u32> = Loadable::from_outcome(Err(anyhow::anyhow!("boom")), "test");

        // Assert
        assert_eq!(ok.value(), Some(&3));
        assert!(failed.is_failed());
        assert!(Loadable::<u32>::default().is_pending());
    }
}
