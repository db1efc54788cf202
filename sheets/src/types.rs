//! Wire types of the Sheets v4 REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `values.get` and `values.update` / `values.append` requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// A1 range the values cover
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// `ROWS` or `COLUMNS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Cell values; omitted by the API when the range is empty
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// Row-major values for a write.
    #[must_use]
    pub fn rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values: rows
                .into_iter()
                .map(|row| row.into_iter().map(Value::String).collect())
                .collect(),
        }
    }

    /// Every cell rendered as text.
    #[must_use]
    pub fn into_text_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

/// Renders a cell as the text a spreadsheet shows.
#[must_use]
pub fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

/// Subset of the `spreadsheets.get` response.
#[derive(Debug, Clone, Deserialize)]
pub struct Spreadsheet {
    /// Sheets in tab order
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

/// One sheet of a spreadsheet.
#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    /// Sheet properties
    pub properties: SheetProperties,
}

/// Properties identifying a sheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    /// Numeric sheet id
    pub sheet_id: i64,
    /// Tab title
    pub title: String,
}
