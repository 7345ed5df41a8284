//! Error types for store adapters

/// Failure of a store operation
///
/// Callers may classify with [`StoreError::is_connection`], but no operation
/// is retried on their behalf.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Store cannot be reached
    #[error("cannot reach store: {0}")]
    Connection(String),

    /// Credentials rejected
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Query malformed or rejected, including constraint violations
    #[error("query failed: {0}")]
    Query(String),

    /// Returned row could not be turned into a record
    #[error("cannot decode record: {0}")]
    Decode(String),
}

impl StoreError {
    /// Check if the store was unreachable
    #[inline]
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if the error is fatal when raised at startup
    #[inline]
    #[must_use]
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Authentication(_))
    }
}

impl From<neo4rs::Error> for StoreError {
    fn from(err: neo4rs::Error) -> Self {
        match &err {
            neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
                Self::Connection(err.to_string())
            }
            neo4rs::Error::AuthenticationError(msg) => Self::Authentication(msg.clone()),
            _ => Self::Query(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(StoreError::Connection("refused".into()).is_connection());
        assert!(!StoreError::Query("syntax".into()).is_connection());

        assert!(StoreError::Authentication("bad password".into()).is_fatal_at_startup());
        assert!(!StoreError::Decode("n".into()).is_fatal_at_startup());
    }

    #[test]
    fn display() {
        let err = StoreError::Connection("connection refused".into());
        assert_eq!(err.to_string(), "cannot reach store: connection refused");
    }

    #[test]
    fn driver_connection_error_maps_to_connection() {
        let err = StoreError::from(neo4rs::Error::ConnectionError);
        assert!(err.is_connection());
    }

    #[test]
    fn driver_auth_error_maps_to_authentication() {
        let err = StoreError::from(neo4rs::Error::AuthenticationError("nope".into()));
        assert_eq!(err, StoreError::Authentication("nope".into()));
    }
}
