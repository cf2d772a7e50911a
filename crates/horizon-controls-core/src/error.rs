//! Error types for Horizon Controls.
//!
//! Every variant except [`ControlsError::Config`] and
//! [`ControlsError::LoaderRejected`] describes a usage error: the caller asked
//! the control tree to do something that breaks one of its invariants. The
//! tree is left untouched when one of these is returned.

/// A specialized Result type for Horizon Controls operations.
pub type Result<T> = std::result::Result<T, ControlsError>;

/// The main error type for Horizon Controls operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlsError {
    /// The widget handle is stale or was never issued by this tree.
    #[error("Invalid or destroyed widget id")]
    InvalidWidgetId,

    /// A child operation targeted a widget that cannot hold children.
    #[error("Widget is not a container")]
    NotAContainer,

    /// Attempted to insert a container into itself or one of its descendants.
    #[error("Cannot add a widget to itself or to one of its descendants")]
    CircularParentage,

    /// The widget is not a (transitive) member of the manager's tree.
    #[error("Widget is not part of this control manager's tree")]
    NotInTree,

    /// Content was unloaded with a handle other than the one it was loaded with.
    #[error("Trying to unload content using a different content handle")]
    ContentHandleMismatch,

    /// Content was loaded a second time with a different handle.
    #[error("Content is already loaded with a different content handle")]
    ContentAlreadyLoaded,

    /// Content was unloaded while nothing was loaded.
    #[error("Content is not loaded")]
    ContentNotLoaded,

    /// Content was loaded or unloaded on a widget that has a container. A
    /// child's content always follows its container's.
    #[error("Content of a child widget is managed by its container")]
    ContentManagedByParent,

    /// Configuration could not be parsed or is out of range.
    #[error("Invalid configuration: {message}")]
    Config {
        /// What was wrong with the configuration.
        message: String,
    },

    /// The data loader refused a key through its allow-key filter.
    #[error("Key rejected by the data loader's allow-key filter")]
    LoaderRejected,
}

impl ControlsError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error signals a programming bug rather than bad input.
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, Self::Config { .. } | Self::LoaderRejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ControlsError::ContentHandleMismatch.to_string(),
            "Trying to unload content using a different content handle"
        );
        assert_eq!(
            ControlsError::config("bad offset").to_string(),
            "Invalid configuration: bad offset"
        );
    }

    #[test]
    fn test_usage_error_classification() {
        assert!(ControlsError::NotInTree.is_usage_error());
        assert!(ControlsError::InvalidWidgetId.is_usage_error());
        assert!(ControlsError::ContentManagedByParent.is_usage_error());
        assert!(!ControlsError::config("x").is_usage_error());
        assert!(!ControlsError::LoaderRejected.is_usage_error());
    }
}
