//! Google Drive document source
//!
//! Lists a folder (optionally recursively) and turns every readable file into a
//! [`Document`]. Google-native files go through the export endpoint; PDFs and
//! plain-text files are downloaded.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use super::auth::{GcpAuth, DRIVE_READONLY_SCOPE};
use crate::config::DriveConfig;
use crate::error::{Error, Result};
use crate::providers::document_source::{DocumentSource, ServiceAccountKey};
use crate::types::document::{META_MIME_TYPE, META_MODIFIED_TIME, META_PATH, META_TITLE};
use crate::types::Document;

const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const LIST_FIELDS: &str =
    "nextPageToken,files(id,name,mimeType,webViewLink,modifiedTime,size)";

/// How a Drive file is turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPlan {
    /// Walk into it
    Folder,
    /// `files.export` with this MIME type
    Export(&'static str),
    /// `alt=media` download, extracted as PDF
    DownloadPdf,
    /// `alt=media` download, decoded as UTF-8
    DownloadText,
    /// Not indexable
    Skip,
}

impl ReadPlan {
    /// Pick a plan from the Drive MIME type
    pub fn for_mime(mime: &str) -> Self {
        match mime {
            FOLDER_MIME => Self::Folder,
            "application/vnd.google-apps.document" => Self::Export("text/plain"),
            "application/vnd.google-apps.presentation" => Self::Export("text/plain"),
            "application/vnd.google-apps.spreadsheet" => Self::Export("text/csv"),
            "application/pdf" => Self::DownloadPdf,
            "application/json" | "application/xml" | "application/x-yaml" => Self::DownloadText,
            m if m.starts_with("text/") => Self::DownloadText,
            _ => Self::Skip,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    mime_type: String,
    #[serde(default)]
    web_view_link: Option<String>,
    #[serde(default)]
    modified_time: Option<String>,
    /// Drive reports sizes as decimal strings
    #[serde(default)]
    size: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Google Drive v3 document source
pub struct GoogleDriveSource {
    client: reqwest::Client,
    base_url: String,
    recursive: bool,
    max_file_bytes: u64,
}

impl GoogleDriveSource {
    /// Create from config
    pub fn new(config: &DriveConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(config, client))
    }

    /// Create from config with a caller-supplied HTTP client
    ///
    /// The client is also used for the token exchange.
    pub fn with_client(config: &DriveConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            recursive: config.recursive,
            max_file_bytes: config.max_file_bytes,
        }
    }

    /// Drive search expression for the direct children of a folder
    fn children_query(folder_id: &str) -> String {
        let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
        format!("'{}' in parents and trashed = false", escaped)
    }

    async fn list_children(&self, token: &str, folder_id: &str) -> Result<Vec<DriveFile>> {
        let url = format!("{}/drive/v3/files", self.base_url);
        let query = Self::children_query(folder_id);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).bearer_auth(token).query(&[
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", "1000"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ]);
            if let Some(ref page) = page_token {
                request = request.query(&[("pageToken", page.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| Error::source_unavailable(format!("Drive list request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::source_unavailable(format!(
                    "Drive list of folder {} failed ({}): {}",
                    folder_id, status, body
                )));
            }

            let page: FileList = response.json().await.map_err(|e| {
                Error::source_unavailable(format!("Failed to parse Drive file list: {}", e))
            })?;

            files.extend(page.files);
            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(files)
    }

    async fn download(&self, token: &str, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::source_unavailable(format!("Drive download failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::source_unavailable(format!(
                "Drive download failed ({}): {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::source_unavailable(format!("Drive download interrupted: {}", e)))?;
        Ok(bytes.to_vec())
    }

    /// Read one file according to its plan; `Ok(None)` means skip it
    async fn read_file(&self, token: &str, file: &DriveFile, plan: ReadPlan) -> Result<Option<String>> {
        let file_url = format!("{}/drive/v3/files/{}", self.base_url, file.id);

        match plan {
            ReadPlan::Export(mime) => {
                let bytes = self
                    .download(token, &format!("{}/export", file_url), &[("mimeType", mime)])
                    .await?;
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            ReadPlan::DownloadText => {
                let bytes = self
                    .download(token, &file_url, &[("alt", "media"), ("supportsAllDrives", "true")])
                    .await?;
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            ReadPlan::DownloadPdf => {
                let bytes = self
                    .download(token, &file_url, &[("alt", "media"), ("supportsAllDrives", "true")])
                    .await?;
                let name = file.name.clone();
                let extracted = tokio::task::spawn_blocking(move || {
                    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
                })
                .await
                .unwrap_or_else(|e| Err(format!("extractor panicked: {}", e)));

                match extracted {
                    Ok(text) => Ok(Some(text)),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable PDF '{}': {}", name, e);
                        Ok(None)
                    }
                }
            }
            ReadPlan::Folder | ReadPlan::Skip => Ok(None),
        }
    }

    fn is_too_large(&self, file: &DriveFile) -> bool {
        file.size
            .as_deref()
            .and_then(|s| s.parse::<u64>().ok())
            .is_some_and(|size| size > self.max_file_bytes)
    }
}

/// Build a document from Drive file metadata and its extracted text
fn to_document(file: &DriveFile, path: &str, content: String) -> Document {
    let source = file
        .web_view_link
        .clone()
        .unwrap_or_else(|| format!("https://drive.google.com/file/d/{}/view", file.id));

    let mut doc = Document::new(file.id.clone(), source, content)
        .with_metadata(META_TITLE, file.name.clone())
        .with_metadata(META_MIME_TYPE, file.mime_type.clone())
        .with_metadata(META_PATH, path.to_string());
    if let Some(ref modified) = file.modified_time {
        doc = doc.with_metadata(META_MODIFIED_TIME, modified.clone());
    }
    doc
}

#[async_trait]
impl DocumentSource for GoogleDriveSource {
    async fn fetch(&self, folder_id: &str, credentials: &ServiceAccountKey) -> Result<Vec<Document>> {
        let auth = GcpAuth::new(credentials.clone(), DRIVE_READONLY_SCOPE, self.client.clone())?;
        tracing::info!(
            "Fetching Drive folder {} as {} (recursive: {})",
            folder_id,
            auth.client_email(),
            self.recursive
        );

        let mut documents = Vec::new();
        let mut visited = HashSet::new();
        let mut pending = VecDeque::from([(folder_id.to_string(), String::new())]);

        while let Some((folder, path)) = pending.pop_front() {
            if !visited.insert(folder.clone()) {
                continue;
            }

            let token = auth.get_token().await?;
            let mut files = self.list_children(&token, &folder).await?;
            // Listing order is not guaranteed; keep ingestion deterministic
            files.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

            for file in files {
                let plan = ReadPlan::for_mime(&file.mime_type);
                match plan {
                    ReadPlan::Folder => {
                        if self.recursive {
                            let child_path = if path.is_empty() {
                                file.name.clone()
                            } else {
                                format!("{}/{}", path, file.name)
                            };
                            pending.push_back((file.id.clone(), child_path));
                        }
                    }
                    ReadPlan::Skip => {
                        tracing::debug!("Skipping '{}' ({})", file.name, file.mime_type);
                    }
                    _ if self.is_too_large(&file) => {
                        tracing::warn!("Skipping '{}': larger than {} bytes", file.name, self.max_file_bytes);
                    }
                    _ => {
                        let token = auth.get_token().await?;
                        if let Some(content) = self.read_file(&token, &file, plan).await? {
                            tracing::debug!("Fetched '{}' ({} bytes)", file.name, content.len());
                            documents.push(to_document(&file, &path, content));
                        }
                    }
                }
            }
        }

        tracing::info!("Fetched {} documents from Drive folder {}", documents.len(), folder_id);
        Ok(documents)
    }

    fn name(&self) -> &str {
        "google-drive"
    }
}
