use crate::cleaner::Summary;
use crate::types::{ErrorType, Status};
use serde::Serialize;

/// Success response JSON structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SuccessResponse {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kept: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

impl SuccessResponse {
    pub fn cleaned(column: String, summary: Summary, output_file: String) -> Self {
        SuccessResponse {
            status: Status::Cleaned,
            message: summary.to_string(),
            iban_column: Some(column),
            checked: Some(summary.checked),
            removed: Some(summary.removed),
            kept: Some(summary.kept),
            output_file: Some(output_file),
        }
    }

    pub fn no_iban_column(message: String) -> Self {
        SuccessResponse {
            status: Status::NoIbanColumn,
            message,
            iban_column: None,
            checked: None,
            removed: None,
            kept: None,
            output_file: None,
        }
    }
}

/// Error response JSON structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    pub error: ErrorType,
    pub error_msg_user: String,
    pub error_msg_internal: String,
    pub file_name: String,
}

impl ErrorResponse {
    pub fn new(error_type: ErrorType, file_name: String) -> Self {
        ErrorResponse {
            error: error_type,
            error_msg_user: error_type.message().to_string(),
            error_msg_internal: String::new(),
            file_name,
        }
    }

    /// Set internal error message
    pub fn with_internal_message(mut self, msg: String) -> Self {
        self.error_msg_internal = msg;
        self
    }
}

/// Result of a run, printed as one JSON document
#[derive(Debug)]
pub enum Response {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        let json = match self {
            Response::Success(r) => serde_json::to_string(r),
            Response::Error(r) => serde_json::to_string(r),
        };
        json.unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaned_response_json() {
        let summary = Summary {
            checked: 3,
            removed: 2,
            kept: 1,
        };
        let response = Response::Success(SuccessResponse::cleaned(
            "Account".to_string(),
            summary,
            "accounts_cleaned.xlsx".to_string(),
        ));

        let json = response.to_json();
        assert!(json.contains("\"Status\":0"));
        assert!(json.contains(
            "\"Message\":\"3 rows checked: 2 invalid numbers removed, 1 rows remaining.\""
        ));
        assert!(json.contains("\"IbanColumn\":\"Account\""));
        assert!(json.contains("\"Kept\":1"));
        assert!(json.contains("\"OutputFile\":\"accounts_cleaned.xlsx\""));
        assert!(!response.is_error());
    }

    #[test]
    fn test_no_column_response_json() {
        let response = Response::Success(SuccessResponse::no_iban_column(
            "No column with Belgian IBANs found.".to_string(),
        ));

        assert_eq!(
            response.to_json(),
            "{\"Status\":1,\"Message\":\"No column with Belgian IBANs found.\"}"
        );
    }

    #[test]
    fn test_error_response_json() {
        let response = Response::Error(
            ErrorResponse::new(ErrorType::Format, "broken.xlsx".to_string())
                .with_internal_message("Format error: bad zip".to_string()),
        );

        let json = response.to_json();
        assert!(json.contains("\"Error\":1"));
        assert!(json.contains("\"ErrorMsgUser\":\"Could not read the file as a spreadsheet\""));
        assert!(json.contains("\"ErrorMsgInternal\":\"Format error: bad zip\""));
        assert!(response.is_error());
    }
}
