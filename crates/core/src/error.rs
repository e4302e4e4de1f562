//! Error types for the studio-fx core.

use crate::render::{ApiTier, ShaderStage};
use thiserror::Error;

/// Errors produced while building or driving an effect.
///
/// Every variant is local to a single effect controller. Hosts are expected
/// to log the error and leave the rest of the page untouched.
#[derive(Debug, Clone, Error)]
pub enum FxError {
    /// No graphics context could be acquired after exhausting the fallback chain.
    #[error("no graphics context available after {attempts} attempts")]
    ContextUnavailable { attempts: usize },

    /// The caller required a specific tier and the surface could not provide it.
    #[error("graphics context unavailable: {required} tier required but not supported")]
    UnsupportedTier { required: ApiTier },

    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError {
        stage: ShaderStage,
        /// Driver info log, prefixed with the numbered source.
        log: String,
        /// The exact source handed to the driver (after any downgrade).
        shader_source: String,
    },

    /// The program failed to link.
    #[error("shader link error:\n{log}")]
    LinkError { log: String },

    /// The driver refused to create a GPU object.
    #[error("failed to create {object}: {reason}")]
    Resource { object: &'static str, reason: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),
}

impl FxError {
    /// True for both ways of failing to obtain a context.
    pub fn is_context_unavailable(&self) -> bool {
        matches!(
            self,
            FxError::ContextUnavailable { .. } | FxError::UnsupportedTier { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_unavailable_includes_attempt_count() {
        let msg = FxError::ContextUnavailable { attempts: 6 }.to_string();
        assert!(msg.contains('6'), "missing attempt count in: {msg}");
    }

    #[test]
    fn unsupported_tier_names_the_tier() {
        let msg = FxError::UnsupportedTier {
            required: ApiTier::High,
        }
        .to_string();
        assert!(msg.contains("high"), "missing tier in: {msg}");
    }

    #[test]
    fn compile_error_display_includes_stage_and_log() {
        let err = FxError::CompileError {
            stage: ShaderStage::Fragment,
            log: "undeclared identifier".into(),
            shader_source: "void main() {}".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("fragment"), "missing stage in: {msg}");
        assert!(msg.contains("undeclared identifier"), "missing log in: {msg}");
    }

    #[test]
    fn link_error_display_includes_log() {
        let msg = FxError::LinkError {
            log: "varying mismatch".into(),
        }
        .to_string();
        assert!(msg.contains("varying mismatch"), "missing log in: {msg}");
    }

    #[test]
    fn both_context_failures_count_as_unavailable() {
        assert!(FxError::ContextUnavailable { attempts: 1 }.is_context_unavailable());
        assert!(FxError::UnsupportedTier {
            required: ApiTier::High
        }
        .is_context_unavailable());
        assert!(!FxError::InvalidColor("x".into()).is_context_unavailable());
    }

    #[test]
    fn fx_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FxError>();
    }
}
