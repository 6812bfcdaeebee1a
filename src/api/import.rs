//! Spreadsheet import endpoints.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use super::ApiClient;
use crate::error::{AppError, Result};
use crate::models::import::{ImportPreview, ImportRequest, ImportResult};

/// MIME type sent for an upload, by extension.
pub fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xls") => "application/vnd.ms-excel",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Upload a spreadsheet for server-side parsing.
pub async fn preview(client: &ApiClient, path: &Path) -> Result<ImportPreview> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::validation("Nome de arquivo inválido"))?;

    tracing::info!("Uploading {} ({} bytes) for preview", file_name, bytes.len());

    let part = Part::bytes(bytes).file_name(file_name).mime_str(mime_for(path))?;
    let form = Form::new().part("file", part);
    client.post_multipart("import/preview", form).await
}

/// Import the previewed file into a contract using `request.mapping`.
pub async fn submit(client: &ApiClient, request: &ImportRequest) -> Result<ImportResult> {
    client.post("import/contract-items", request).await
}

/// Download the blank item spreadsheet template.
pub async fn template(client: &ApiClient) -> Result<Vec<u8>> {
    client.get_bytes("import/template").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(&PathBuf::from("a.CSV")), "text/csv");
        assert_eq!(mime_for(&PathBuf::from("a.xls")), "application/vnd.ms-excel");
        assert!(mime_for(&PathBuf::from("a.xlsx")).contains("spreadsheetml"));
        assert_eq!(mime_for(&PathBuf::from("a")), "application/octet-stream");
    }
}
