/// User input errors, raised before any retrieval or completion call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Completion API key is not set")]
    MissingCredential,

    #[error("Query is empty")]
    EmptyQuery,
}

impl QueryError {
    /// Credential first, then query, matching the order the surface checks them
    pub fn validate(api_key: &str, query: &str) -> Result<(), QueryError> {
        if api_key.trim().is_empty() {
            return Err(QueryError::MissingCredential);
        }
        if query.trim().is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_is_checked_before_query() {
        assert_eq!(QueryError::validate("", ""), Err(QueryError::MissingCredential));
        assert_eq!(QueryError::validate("sk-test", "  "), Err(QueryError::EmptyQuery));
        assert_eq!(QueryError::validate("sk-test", "阿保机"), Ok(()));
    }
}
