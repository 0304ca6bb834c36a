// Response envelopes
//
// Shapes extraction and upload results (or failures) into the
// `{"status": ...}` documents handed to callers.

use crate::analysis::Extraction;
use crate::error::{Error, Result};
use crate::scanner::DirectoryTree;
use crate::uploads::UploadRecord;
use serde::Serialize;

/// Value of the `status` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Success or error document with an HTTP-style status code
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Analysis {
        status: Status,
        structure: DirectoryTree,
        diagram: String,
    },
    Uploaded {
        status: Status,
        file_id: u64,
        file_name: String,
    },
    Failure {
        status: Status,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
        #[serde(skip)]
        code: u16,
    },
}

impl Envelope {
    pub fn analysis(extraction: Extraction) -> Self {
        Envelope::Analysis {
            status: Status::Success,
            structure: extraction.structure,
            diagram: extraction.diagram,
        }
    }

    pub fn uploaded(record: &UploadRecord) -> Self {
        Envelope::Uploaded {
            status: Status::Success,
            file_id: record.id,
            file_name: record.file_name.clone(),
        }
    }

    /// Wrap `err` under a caller-facing `message`; the error text goes in `details`
    pub fn failure(message: impl Into<String>, err: &Error) -> Self {
        Envelope::Failure {
            status: Status::Error,
            message: message.into(),
            details: Some(err.to_string()),
            code: err.status_code(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Envelope::Failure { code, .. } => *code,
            _ => 200,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Envelope::Failure { .. })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
