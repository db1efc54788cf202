//! Sheets API client implementation

use crate::error::SheetsError;
use crate::types::{Spreadsheet, ValueRange};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use slot_booking_core::store::{Range, Row, RowStore, SheetId, StoreFuture};
use std::time::Duration;

/// Production API root.
pub const DEFAULT_API_URL: &str = "https://sheets.googleapis.com/v4";

/// How requests are authenticated.
#[derive(Clone)]
pub enum Credentials {
    /// OAuth access token, sent as `Authorization: Bearer`
    Bearer(String),
    /// API key, sent as the `key` query parameter (read-only access)
    ApiKey(String),
}

impl Credentials {
    /// Picks the scheme from the secret's shape: Google API keys start with `AIza`.
    #[must_use]
    pub fn detect(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if secret.starts_with("AIza") {
            Self::ApiKey(secret)
        } else {
            Self::Bearer(secret)
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Bearer(token) => request.bearer_auth(token),
            Self::ApiKey(key) => request.query(&[("key", key)]),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(***)"),
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}

/// Row store backed by one Google spreadsheet
#[derive(Clone, Debug)]
pub struct SheetsClient {
    client: Client,
    api_url: Url,
    spreadsheet_id: String,
    credentials: Credentials,
}

impl SheetsClient {
    /// Create a client for `spreadsheet_id` against the production API
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::RequestFailed` if the HTTP client cannot be built
    pub fn new(
        spreadsheet_id: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SheetsError::RequestFailed(e.to_string()))?;
        Ok(Self {
            client,
            api_url: parse_api_url(DEFAULT_API_URL)?,
            spreadsheet_id: spreadsheet_id.into(),
            credentials,
        })
    }

    /// Point the client at another API root (an emulator or a mock server)
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::InvalidUrl` if `api_url` is not a base URL
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, SheetsError> {
        self.api_url = parse_api_url(api_url)?;
        Ok(self)
    }

    /// The spreadsheet this client reads and writes
    #[must_use]
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// `{api}/spreadsheets/{id}/{segments...}`
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| SheetsError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .push("spreadsheets")
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SheetsError> {
        let response = self
            .credentials
            .apply(request)
            .send()
            .await
            .map_err(|e| SheetsError::RequestFailed(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SheetsError> {
        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| SheetsError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(SheetsError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SheetsError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SheetsError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }

    /// Read every row of `range`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn get_values(&self, range: &Range) -> Result<Vec<Row>, SheetsError> {
        let a1 = range.a1();
        let url = self.endpoint(&[&self.spreadsheet_id, "values", &a1])?;
        tracing::debug!(range = %a1, "Reading values");
        let values: ValueRange = self.send(self.client.get(url)).await?;
        Ok(values.into_text_rows())
    }

    /// Append rows after the table found in `range`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn append_values(&self, range: &Range, rows: Vec<Row>) -> Result<(), SheetsError> {
        let a1 = range.a1();
        let target = format!("{a1}:append");
        let url = self.endpoint(&[&self.spreadsheet_id, "values", &target])?;
        tracing::debug!(range = %a1, rows = rows.len(), "Appending values");
        let request = self
            .client
            .post(url)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&ValueRange::rows(rows));
        self.send::<serde_json::Value>(request).await?;
        Ok(())
    }

    /// Overwrite cells starting at the top-left of `range`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn update_values(&self, range: &Range, rows: Vec<Row>) -> Result<(), SheetsError> {
        let a1 = range.a1();
        let url = self.endpoint(&[&self.spreadsheet_id, "values", &a1])?;
        tracing::debug!(range = %a1, rows = rows.len(), "Updating values");
        let request = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&ValueRange::rows(rows));
        self.send::<serde_json::Value>(request).await?;
        Ok(())
    }

    /// Look up the numeric id of the sheet titled `title`
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::SheetNotFound` if no sheet has that title, or
    /// errors for network failures, API errors, or parsing failures
    pub async fn sheet_id(&self, title: &str) -> Result<SheetId, SheetsError> {
        let url = self.endpoint(&[&self.spreadsheet_id])?;
        let request = self
            .client
            .get(url)
            .query(&[("fields", "sheets.properties")]);
        let spreadsheet: Spreadsheet = self.send(request).await?;
        spreadsheet
            .sheets
            .into_iter()
            .find(|sheet| sheet.properties.title == title)
            .map(|sheet| SheetId(sheet.properties.sheet_id))
            .ok_or_else(|| SheetsError::SheetNotFound(title.to_string()))
    }

    /// Remove rows `[start, end)` (zero-based) from a sheet
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn delete_dimension(
        &self,
        sheet_id: SheetId,
        start: usize,
        end: usize,
    ) -> Result<(), SheetsError> {
        let target = format!("{}:batchUpdate", self.spreadsheet_id);
        let url = self.endpoint(&[&target])?;
        tracing::debug!(%sheet_id, start, end, "Deleting rows");
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id.0,
                        "dimension": "ROWS",
                        "startIndex": start,
                        "endIndex": end,
                    }
                }
            }]
        });
        self.send::<serde_json::Value>(self.client.post(url).json(&body))
            .await?;
        Ok(())
    }
}

fn parse_api_url(api_url: &str) -> Result<Url, SheetsError> {
    let url = Url::parse(api_url).map_err(|e| SheetsError::InvalidUrl(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(SheetsError::InvalidUrl(api_url.to_string()));
    }
    Ok(url)
}

impl RowStore for SheetsClient {
    fn read_range(&self, range: Range) -> StoreFuture<'_, Vec<Row>> {
        Box::pin(async move { Ok(self.get_values(&range).await?) })
    }

    fn append_rows(&self, range: Range, rows: Vec<Row>) -> StoreFuture<'_, ()> {
        Box::pin(async move { Ok(self.append_values(&range, rows).await?) })
    }

    fn overwrite_range(&self, range: Range, rows: Vec<Row>) -> StoreFuture<'_, ()> {
        Box::pin(async move { Ok(self.update_values(&range, rows).await?) })
    }

    fn resolve_sheet_id(&self, sheet: String) -> StoreFuture<'_, SheetId> {
        Box::pin(async move { Ok(self.sheet_id(&sheet).await?) })
    }

    fn delete_rows(&self, sheet_id: SheetId, start: usize, end: usize) -> StoreFuture<'_, ()> {
        Box::pin(async move { Ok(self.delete_dimension(sheet_id, start, end).await?) })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use slot_booking_core::store::Table;

    fn client(api_url: &str) -> SheetsClient {
        SheetsClient::new("sheet-123", Credentials::detect("ya29.token"), Duration::from_secs(5))
            .unwrap()
            .with_api_url(api_url)
            .unwrap()
    }

    #[test]
    fn test_credentials_detection() {
        assert!(matches!(Credentials::detect("AIzaSyExample"), Credentials::ApiKey(_)));
        assert!(matches!(Credentials::detect("ya29.a0Af"), Credentials::Bearer(_)));
        assert_eq!(format!("{:?}", Credentials::detect("ya29.secret")), "Bearer(***)");
    }

    #[test]
    fn test_endpoints() {
        let client = client("https://sheets.googleapis.com/v4/");
        let range = Table::new("Slots", 3).full_range().a1();
        let url = client.endpoint(&["sheet-123", "values", &range]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/Slots!A:C"
        );

        let url = client.endpoint(&["sheet-123:batchUpdate"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123:batchUpdate"
        );
    }

    #[test]
    fn test_sheet_names_are_escaped() {
        let client = client("http://localhost:9000");
        let range = Table::new("My Slots", 3).column(0).a1();
        let url = client.endpoint(&["sheet-123", "values", &range]).unwrap();
        assert_eq!(url.path(), "/spreadsheets/sheet-123/values/My%20Slots!A:A");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let result = SheetsClient::new("id", Credentials::detect("t"), Duration::from_secs(1))
            .unwrap()
            .with_api_url("mailto:someone@example.com");
        assert!(matches!(result, Err(SheetsError::InvalidUrl(_))));
    }
}
