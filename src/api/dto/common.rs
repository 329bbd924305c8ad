//! Common API DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard response envelope.
///
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
/// Mutations additionally carry a `notice` for the presentation layer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload. `null` on failure
    pub data: Option<T>,
    /// Error description. `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable status message for the presentation layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            notice: None,
        }
    }

    pub fn success_with_notice(data: T, notice: Notice) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            notice: Some(notice),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            notice: None,
        }
    }
}

/// Severity tag for a [`Notice`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeTag {
    Success,
    Warning,
    Error,
}

/// Status message handed to the presentation layer alongside a result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notice {
    /// Message text, e.g. `Ship "MSC Esperanza" registered`
    pub text: String,
    /// Severity: `success`, `warning` or `error`
    pub tag: NoticeTag,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: NoticeTag::Success,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: NoticeTag::Warning,
        }
    }
}
