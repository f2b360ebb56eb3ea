use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::models::{DownloadRequest, ErrorDetail, GenerateRequest, GeneratedSchedule, UploadedSchedule};

pub const SPREADSHEET_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The scheduler answered with a non-success status.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("Scheduler request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Whether a file name looks like a spreadsheet the scheduler can read.
pub fn is_spreadsheet_name(file_name: &str) -> bool {
    let lower = file_name.trim().to_lowercase();
    SPREADSHEET_EXTENSIONS
        .iter()
        .any(|extension| lower.len() > extension.len() && lower.ends_with(extension))
}

/// The external service that parses, fills in and exports rosters.
pub trait ScheduleService: Send + Sync {
    fn upload<'a>(
        &'a self,
        file_name: &'a str,
        contents: Vec<u8>,
    ) -> BoxFuture<'a, Result<UploadedSchedule, SchedulerError>>;

    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<GeneratedSchedule, SchedulerError>>;

    fn download<'a>(
        &'a self,
        request: &'a DownloadRequest,
    ) -> BoxFuture<'a, Result<Vec<u8>, SchedulerError>>;
}

#[derive(Clone)]
pub struct HttpScheduleService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScheduleService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SchedulerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into `Rejected`, keeping the scheduler's
    /// own message when it sent one.
    async fn check(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<reqwest::Response, SchedulerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorDetail>()
            .await
            .ok()
            .and_then(|body| body.message())
            .unwrap_or_else(|| fallback.to_string());

        log::warn!("Scheduler rejected request with {}: {}", status, detail);

        Err(SchedulerError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

impl ScheduleService for HttpScheduleService {
    fn upload<'a>(
        &'a self,
        file_name: &'a str,
        contents: Vec<u8>,
    ) -> BoxFuture<'a, Result<UploadedSchedule, SchedulerError>> {
        Box::pin(async move {
            let part = Part::bytes(contents)
                .file_name(file_name.to_string())
                .mime_str(XLSX_CONTENT_TYPE)?;
            let form = Form::new().part("file", part);

            let response = self
                .client
                .post(self.url("/api/upload"))
                .multipart(form)
                .send()
                .await?;

            let response = Self::check(response, "Failed to read the uploaded file").await?;
            Ok(response.json::<UploadedSchedule>().await?)
        })
    }

    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<GeneratedSchedule, SchedulerError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.url("/api/generate"))
                .json(request)
                .send()
                .await?;

            let response = Self::check(response, "Failed to generate the schedule").await?;
            Ok(response.json::<GeneratedSchedule>().await?)
        })
    }

    fn download<'a>(
        &'a self,
        request: &'a DownloadRequest,
    ) -> BoxFuture<'a, Result<Vec<u8>, SchedulerError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.url("/api/download"))
                .json(request)
                .send()
                .await?;

            let response = Self::check(response, "Failed to export the schedule").await?;
            Ok(response.bytes().await?.to_vec())
        })
    }
}
