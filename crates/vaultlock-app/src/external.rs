//! Requests handed to external, untrusted processes.

use std::fmt;

use thiserror::Error;

/// Kind of external capability a screen asks the platform for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntentAction {
    /// Pick any content (file picker).
    GetContent,
    /// Create a new document through the document provider.
    CreateDocument,
    /// Open an existing document through the document provider.
    OpenDocument,
    /// Grant access to a document tree.
    OpenDocumentTree,
    /// View a URI in another application.
    View,
    /// Share data with another application.
    Send,
    /// Capture an image with the camera application.
    ImageCapture,
    /// Any other platform action, by name.
    Other(String),
}

impl IntentAction {
    /// Document provider actions. Devices without a document provider are
    /// common enough that a missing handler is reported to the user instead
    /// of failing the caller.
    pub fn is_document_action(&self) -> bool {
        matches!(
            self,
            Self::GetContent | Self::CreateDocument | Self::OpenDocument | Self::OpenDocumentTree
        )
    }
}

impl fmt::Display for IntentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetContent => f.write_str("get-content"),
            Self::CreateDocument => f.write_str("create-document"),
            Self::OpenDocument => f.write_str("open-document"),
            Self::OpenDocumentTree => f.write_str("open-document-tree"),
            Self::View => f.write_str("view"),
            Self::Send => f.write_str("send"),
            Self::ImageCapture => f.write_str("image-capture"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// A hand-off to an external process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRequest {
    /// Requested capability.
    pub action: IntentAction,
    /// Request code the result is delivered under. `None` when no result is
    /// expected.
    pub request_code: Option<i32>,
}

impl ExternalRequest {
    /// Request that delivers a result under `request_code`.
    pub fn for_result(action: IntentAction, request_code: i32) -> Self {
        Self { action, request_code: Some(request_code) }
    }

    /// Request with no result.
    pub fn launch(action: IntentAction) -> Self {
        Self { action, request_code: None }
    }
}

/// Failure to hand control to an external process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    /// No installed application handles the requested action.
    ///
    /// Expected for document actions on stripped-down devices; anything
    /// else indicates a misconfigured request.
    #[error("no handler for {action}")]
    NotFound {
        /// Action nobody handles.
        action: IntentAction,
    },
}
