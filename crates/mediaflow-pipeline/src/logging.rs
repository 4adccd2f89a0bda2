//! Structured item-scoped logging.

use tracing::{error, info, warn, Span};

use mediaflow_models::MediaItemId;

/// Logger for media item lifecycle events with consistent formatting.
#[derive(Debug, Clone)]
pub struct ItemLogger {
    item_id: String,
    operation: String,
}

impl ItemLogger {
    /// Create a new logger for a specific item and operation.
    pub fn new(item_id: &MediaItemId, operation: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Log the start of an operation.
    pub fn log_start(&self, message: &str) {
        info!(
            item_id = %self.item_id,
            operation = %self.operation,
            "Started: {}", message
        );
    }

    /// Log a progress update.
    pub fn log_progress(&self, message: &str) {
        info!(
            item_id = %self.item_id,
            operation = %self.operation,
            "Progress: {}", message
        );
    }

    /// Log a warning.
    pub fn log_warning(&self, message: &str) {
        warn!(
            item_id = %self.item_id,
            operation = %self.operation,
            "Warning: {}", message
        );
    }

    /// Log an error.
    pub fn log_error(&self, message: &str) {
        error!(
            item_id = %self.item_id,
            operation = %self.operation,
            "Error: {}", message
        );
    }

    /// Log the completion of an operation.
    pub fn log_completion(&self, message: &str) {
        info!(
            item_id = %self.item_id,
            operation = %self.operation,
            "Completed: {}", message
        );
    }

    /// Create a tracing span for this item.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "media_item",
            item_id = %self.item_id,
            operation = %self.operation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_logger_creation() {
        let id = MediaItemId::new();
        let logger = ItemLogger::new(&id, "process");
        assert_eq!(logger.item_id, id.to_string());
        assert_eq!(logger.operation, "process");
    }
}
