//! Status line shown after an operation.

use std::fmt;

/// One-line outcome of a user action.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        assert_eq!(
            OperationStatus::success("Timeline deleted.").to_string(),
            "Success: Timeline deleted.\n"
        );
        assert_eq!(
            OperationStatus::failure("Failed to delete timeline").to_string(),
            "Error: Failed to delete timeline\n"
        );
    }
}
