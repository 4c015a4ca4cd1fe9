//! Error types for the agora-agents crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Reading holdings or preferences before they are initialized is a
//! precondition violation and is reported as [`AgentError::NotInitialized`].

/// Errors that can occur during ownership and preference operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// A component was used before its `init` call.
    #[error("{component} not initialized")]
    NotInitialized {
        /// The component that was accessed, e.g. "currency holdings".
        component: &'static str,
    },

    /// An arithmetic overflow occurred while updating holdings.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}

impl AgentError {
    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        Self::ArithmeticOverflow {
            context: context.into(),
        }
    }
}
