//! Request and response bodies of the Sheets v4 REST API.
//!
//! Only the fields this crate reads or writes are modelled; unknown fields
//! are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// `GET /v4/spreadsheets/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpreadsheetResponse {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetEntry {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetProperties {
    pub title: String,
}

/// `POST /v4/spreadsheets/{id}:batchUpdate`
#[derive(Debug, Clone, Serialize)]
pub struct BatchUpdateRequest {
    pub requests: Vec<BatchRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub add_sheet: AddSheetRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddSheetRequest {
    pub properties: SheetProperties,
}

impl BatchUpdateRequest {
    pub fn add_sheet(title: &str) -> Self {
        Self {
            requests: vec![BatchRequest {
                add_sheet: AddSheetRequest {
                    properties: SheetProperties {
                        title: title.to_string(),
                    },
                },
            }],
        }
    }
}

/// Body of the values `update` and `append` calls.
#[derive(Debug, Clone, Serialize)]
pub struct ValueRangeBody<'a> {
    pub values: &'a [Vec<String>],
}

/// Google's JSON error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorEnvelope {
    pub error: GoogleErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
