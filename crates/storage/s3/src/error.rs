use lexcase_storage::StorageError;

/// Classify an AWS SDK error string into the appropriate [`StorageError`].
///
/// Inspects the message for common patterns (throttling, timeout,
/// connection, credentials) and maps them to the matching variant.
pub fn classify_sdk_error(error_str: &str) -> StorageError {
    let lower = error_str.to_lowercase();
    if lower.contains("throttl") || lower.contains("slowdown") || lower.contains("too many") {
        StorageError::Throttled
    } else if lower.contains("timeout") || lower.contains("timed out") {
        StorageError::Timeout
    } else if lower.contains("nosuchbucket")
        || lower.contains("accessdenied")
        || lower.contains("credential")
    {
        StorageError::Configuration(error_str.to_owned())
    } else if lower.contains("connection")
        || lower.contains("connect")
        || lower.contains("dns")
        || lower.contains("network")
    {
        StorageError::Connection(error_str.to_owned())
    } else {
        StorageError::Backend(error_str.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_throttled() {
        let err = classify_sdk_error("SlowDown: Please reduce your request rate");
        assert!(matches!(err, StorageError::Throttled));
    }

    #[test]
    fn classify_timeout() {
        let err = classify_sdk_error("Request timed out after 30s");
        assert!(matches!(err, StorageError::Timeout));
    }

    #[test]
    fn classify_missing_bucket() {
        let err = classify_sdk_error("NoSuchBucket: The specified bucket does not exist");
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn classify_connection() {
        let err = classify_sdk_error("Connection refused: localhost:4566");
        assert!(matches!(err, StorageError::Connection(_)));
    }

    #[test]
    fn classify_generic_service_error() {
        let err = classify_sdk_error("InternalError: We encountered an internal error");
        assert!(matches!(err, StorageError::Backend(_)));
    }
}
