use serde::Serialize;

/// Outcome of one assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub success: bool,
    /// Empty on success.
    pub error_message: String,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            success: true,
            error_message: String::new(),
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Error messages of every failed result, in order.
pub fn failure_messages(results: &[ValidationResult]) -> Vec<&str> {
    results
        .iter()
        .filter(|result| !result.success)
        .map(|result| result.error_message.as_str())
        .collect()
}
