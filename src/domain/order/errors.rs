// ============================================================================
// Order Service Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed request or a referenced product that does not exist
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Order is in a state that does not allow the operation
    #[error("{0}")]
    Conflict(String),

    /// Store failure, passed through untranslated
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// HTTP-style status code for the boundary layer.
    ///
    /// A state conflict reports 400, not 409, and so does a missing product.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 400,
            Self::Store(_) => 500,
        }
    }

    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Store(_) => "store",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::bad_request("x").status_code(), 400);
        assert_eq!(ServiceError::not_found("x").status_code(), 404);
        assert_eq!(ServiceError::conflict("x").status_code(), 400);
        assert_eq!(
            ServiceError::from(anyhow::anyhow!("connection reset")).status_code(),
            500
        );
    }

    #[test]
    fn test_message_is_the_payload() {
        let err = ServiceError::not_found("Order not found");
        assert_eq!(err.message(), "Order not found");
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = ServiceError::from(anyhow::anyhow!("duplicate key value"));
        assert_eq!(err.to_string(), "duplicate key value");
        assert_eq!(err.kind(), "store");
    }
}
