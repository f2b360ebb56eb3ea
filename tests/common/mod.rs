#![allow(dead_code)]

use std::env;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use fake::Fake;
use fake::faker::lorem::en::Word;
use futures::future::BoxFuture;
use serde_json::Value;

use wardgrid::database::MemoryStore;
use wardgrid::handlers::shared::ApiResponse;
use wardgrid::models::{DownloadRequest, GenerateRequest, GeneratedSchedule, UploadedSchedule};
use wardgrid::services::{ScheduleService, SchedulerError};
use wardgrid::{AppState, Config};

/// Initialise the full route table over a `TestApp`'s services.
#[macro_export]
macro_rules! init_app {
    ($test_app:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($test_app.state.roster.clone()))
                .app_data(actix_web::web::Data::new($test_app.state.presets.clone()))
                .wrap(wardgrid::middleware::RequestIdMiddleware)
                .configure(wardgrid::routes::configure),
        )
        .await
    };
}

/// Scripted stand-in for the scheduler service.
pub struct FakeScheduler {
    pub upload_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
    upload: Mutex<Result<UploadedSchedule, (u16, String)>>,
    generate: Mutex<Result<GeneratedSchedule, (u16, String)>>,
    generate_delay: Mutex<Duration>,
    last_generate: Mutex<Option<GenerateRequest>>,
    last_download: Mutex<Option<DownloadRequest>>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self {
            upload_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            upload: Mutex::new(Ok(MockData::uploaded())),
            generate: Mutex::new(Ok(MockData::generated())),
            generate_delay: Mutex::new(Duration::ZERO),
            last_generate: Mutex::new(None),
            last_download: Mutex::new(None),
        }
    }

    pub fn set_upload(&self, response: Result<UploadedSchedule, (u16, String)>) {
        *self.upload.lock().unwrap() = response;
    }

    pub fn set_generate(&self, response: Result<GeneratedSchedule, (u16, String)>) {
        *self.generate.lock().unwrap() = response;
    }

    pub fn set_generate_delay(&self, delay: Duration) {
        *self.generate_delay.lock().unwrap() = delay;
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn last_generate(&self) -> Option<GenerateRequest> {
        self.last_generate.lock().unwrap().clone()
    }

    pub fn last_download(&self) -> Option<DownloadRequest> {
        self.last_download.lock().unwrap().clone()
    }

    fn rejected((status, detail): (u16, String)) -> SchedulerError {
        SchedulerError::Rejected { status, detail }
    }
}

impl ScheduleService for FakeScheduler {
    fn upload<'a>(
        &'a self,
        _file_name: &'a str,
        _contents: Vec<u8>,
    ) -> BoxFuture<'a, Result<UploadedSchedule, SchedulerError>> {
        Box::pin(async move {
            self.upload_calls.fetch_add(1, Ordering::SeqCst);
            let response = self.upload.lock().unwrap().clone();
            response.map_err(Self::rejected)
        })
    }

    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<GeneratedSchedule, SchedulerError>> {
        Box::pin(async move {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_generate.lock().unwrap() = Some(request.clone());

            let delay = *self.generate_delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let response = self.generate.lock().unwrap().clone();
            response.map_err(Self::rejected)
        })
    }

    fn download<'a>(
        &'a self,
        request: &'a DownloadRequest,
    ) -> BoxFuture<'a, Result<Vec<u8>, SchedulerError>> {
        Box::pin(async move {
            self.download_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_download.lock().unwrap() = Some(request.clone());
            Ok(MockData::workbook_bytes())
        })
    }
}

// Test application wrapper
pub struct TestApp {
    pub state: AppState,
    pub scheduler: Arc<FakeScheduler>,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Config::test_config();
        let scheduler = Arc::new(FakeScheduler::new());
        let state = AppState::new(&config, Arc::new(MemoryStore::new()), scheduler.clone());

        TestApp {
            state,
            scheduler,
            config,
        }
    }
}

// Mock data generators
pub struct MockData;

impl MockData {
    pub fn staff_ids() -> Vec<String> {
        vec!["001".to_string(), "002".to_string(), "003".to_string()]
    }

    /// Only the first staff member has pre-filled (fixed) shifts.
    pub fn uploaded() -> UploadedSchedule {
        UploadedSchedule {
            staff_ids: Self::staff_ids(),
            dates: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            schedule: rows(&[&["日", "夜", "公"], &["", "", ""], &["", "", ""]]),
        }
    }

    pub fn generated() -> GeneratedSchedule {
        GeneratedSchedule {
            schedule: rows(&[&["日", "夜", "公"], &["日", "", "休"], &["", "夜", "日"]]),
            warnings: vec!["Could not satisfy day coverage on day 2".to_string()],
        }
    }

    pub fn spreadsheet_name() -> String {
        format!("{}.xlsx", Word().fake::<String>())
    }

    pub fn workbook_bytes() -> Vec<u8> {
        // Zip local file header magic; enough to look like an xlsx.
        vec![0x50, 0x4b, 0x03, 0x04, 0x14, 0x00]
    }
}

pub fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

// Test assertion helpers
pub struct TestAssertions;

impl TestAssertions {
    pub fn assert_success_response(body: &[u8]) -> Value {
        let response: ApiResponse<Value> =
            serde_json::from_slice(body).expect("Failed to parse JSON response");

        assert!(
            response.success,
            "Expected successful response but got error: {:?}",
            response.message
        );
        response.data.expect("Expected data in successful response")
    }

    pub fn assert_error_message(body: &[u8]) -> String {
        let response: ApiResponse<Value> =
            serde_json::from_slice(body).expect("Failed to parse JSON response");

        assert!(!response.success, "Expected an error response");
        response.message.expect("Expected an error message")
    }
}

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}
