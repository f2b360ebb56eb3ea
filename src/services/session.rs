use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::DEFAULT_PRESET;
use crate::grid::{GridError, GridInput, GridView, PolicyConfig, YearMonth, build_grid};
use crate::models::{DownloadRequest, GenerateRequest, GeneratedSchedule, UploadedSchedule};

/// One user's working state between requests.
///
/// Transitions take the state by value and return the next one, so a failed
/// collaborator call simply never produces a new state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub upload: Option<UploadedSchedule>,
    pub generated: Option<GeneratedSchedule>,
    pub policy: PolicyConfig,
    /// Preset the policy came from, or the custom sentinel after manual edits.
    pub preset: String,
    pub calendar: Option<YearMonth>,
    /// Bumped on every upload so a generate started against an older upload
    /// can be recognised when it returns.
    #[serde(skip)]
    pub revision: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            upload: None,
            generated: None,
            policy: PolicyConfig::default(),
            preset: DEFAULT_PRESET.to_string(),
            calendar: None,
            revision: 0,
        }
    }
}

impl SessionState {
    pub fn with_upload(self, upload: UploadedSchedule) -> Self {
        Self {
            upload: Some(upload),
            generated: None,
            revision: self.revision + 1,
            ..self
        }
    }

    pub fn with_generated(self, generated: GeneratedSchedule) -> Self {
        Self {
            generated: Some(generated),
            ..self
        }
    }

    pub fn with_policy(self, policy: PolicyConfig, preset: impl Into<String>) -> Self {
        Self {
            policy,
            preset: preset.into(),
            ..self
        }
    }

    pub fn with_calendar(self, calendar: Option<YearMonth>) -> Self {
        Self { calendar, ..self }
    }

    /// The upload is sent as the fixed input; the scheduler fills the blanks.
    pub fn generate_request(&self) -> Option<GenerateRequest> {
        self.upload.as_ref().map(|upload| GenerateRequest {
            staff_ids: upload.staff_ids.clone(),
            dates: upload.dates.clone(),
            schedule: upload.schedule.clone(),
            settings: self.policy,
        })
    }

    /// Exports the generated roster, or the upload when nothing was generated.
    pub fn download_request(&self) -> Option<DownloadRequest> {
        let upload = self.upload.as_ref()?;
        let schedule = self
            .generated
            .as_ref()
            .map(|generated| generated.schedule.clone())
            .unwrap_or_else(|| upload.schedule.clone());

        Some(DownloadRequest {
            staff_ids: upload.staff_ids.clone(),
            dates: upload.dates.clone(),
            schedule,
        })
    }

    /// Render the current roster. After a generate the upload becomes the
    /// original, so its non-blank cells show as fixed.
    pub fn render(&self) -> Result<Option<GridView>, GridError> {
        let Some(upload) = self.upload.as_ref() else {
            return Ok(None);
        };

        let (schedule, original) = match &self.generated {
            Some(generated) => (&generated.schedule, Some(upload.schedule.as_slice())),
            None => (&upload.schedule, None),
        };

        build_grid(GridInput {
            staff_ids: &upload.staff_ids,
            dates: &upload.dates,
            schedule,
            original,
            policy: &self.policy,
            calendar: self.calendar,
        })
        .map(Some)
    }

    pub fn warnings(&self) -> &[String] {
        self.generated
            .as_ref()
            .map(|generated| generated.warnings.as_slice())
            .unwrap_or_default()
    }
}

/// A stored session: the state record plus the in-flight generate marker.
#[derive(Debug, Default)]
pub struct Session {
    pub state: Mutex<SessionState>,
    generating: AtomicBool,
}

/// Held for the duration of one generate call; clears the marker on drop,
/// including when the request is abandoned mid-flight.
pub struct GenerateGuard {
    session: Arc<Session>,
}

impl Drop for GenerateGuard {
    fn drop(&mut self) {
        self.session.generating.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    /// Claim the generate slot, or `None` if another generate is running.
    pub fn begin_generate(self: &Arc<Self>) -> Option<GenerateGuard> {
        self.generating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GenerateGuard {
                session: Arc::clone(self),
            })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub generating: bool,
    #[serde(flatten)]
    pub state: SessionState,
}

/// Sessions expire after sitting idle for the configured TTL.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<Uuid, Arc<Session>>,
}

impl SessionStore {
    pub fn new(time_to_idle: Duration, max_sessions: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(time_to_idle)
            .build();

        Self { cache }
    }

    pub async fn create(&self) -> (Uuid, Arc<Session>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Session::default());
        self.cache.insert(id, Arc::clone(&session)).await;
        log::info!("Created session {}", id);
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.cache.get(&id).await
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.cache.remove(&id).await.is_some()
    }

    pub async fn snapshot(&self, id: Uuid, session: &Session) -> SessionSnapshot {
        SessionSnapshot {
            id,
            generating: session.is_generating(),
            state: session.state.lock().await.clone(),
        }
    }
}
