use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::database::{CUSTOM_PRESET, PresetRepository};
use crate::error::AppError;
use crate::grid::{GridView, PolicyConfig, YearMonth};
use crate::services::scheduler::{ScheduleService, is_spreadsheet_name};
use crate::services::session::{Session, SessionSnapshot, SessionStore};

/// Drives one session through upload, generate and export.
///
/// Collaborator calls never run under the session lock, and their results are
/// committed only on success; a failure leaves the last good state in place.
#[derive(Clone)]
pub struct RosterService {
    sessions: SessionStore,
    scheduler: Arc<dyn ScheduleService>,
    presets: PresetRepository,
}

/// A rendered session roster plus everything shown alongside it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RenderedRoster {
    pub grid: GridView,
    pub findings: Vec<String>,
    pub warnings: Vec<String>,
}

impl RosterService {
    pub fn new(
        sessions: SessionStore,
        scheduler: Arc<dyn ScheduleService>,
        presets: PresetRepository,
    ) -> Self {
        Self {
            sessions,
            scheduler,
            presets,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    async fn session(&self, id: Uuid) -> Result<Arc<Session>, AppError> {
        self.sessions
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))
    }

    pub async fn create_session(&self) -> SessionSnapshot {
        let (id, session) = self.sessions.create().await;
        self.sessions.snapshot(id, &session).await
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot, AppError> {
        let session = self.session(id).await?;
        Ok(self.sessions.snapshot(id, &session).await)
    }

    pub async fn close_session(&self, id: Uuid) -> Result<(), AppError> {
        if self.sessions.remove(id).await {
            log::info!("Closed session {}", id);
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Session not found: {}", id)))
        }
    }

    pub async fn upload(
        &self,
        id: Uuid,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<SessionSnapshot, AppError> {
        if !is_spreadsheet_name(file_name) {
            return Err(AppError::BadRequest(
                "Upload an .xlsx or .xls spreadsheet".to_string(),
            ));
        }
        if contents.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        let session = self.session(id).await?;
        let upload = self.scheduler.upload(file_name, contents).await?;
        if upload.staff_ids.is_empty() {
            return Err(AppError::BadRequest(
                "No staff rows found; check the sheet layout".to_string(),
            ));
        }

        log::info!(
            "Session {}: uploaded {} ({} staff x {} dates)",
            id,
            file_name,
            upload.staff_ids.len(),
            upload.dates.len()
        );

        {
            let mut state = session.state.lock().await;
            *state = std::mem::take(&mut *state).with_upload(upload);
        }

        Ok(self.sessions.snapshot(id, &session).await)
    }

    pub async fn generate(&self, id: Uuid) -> Result<SessionSnapshot, AppError> {
        let session = self.session(id).await?;
        let guard = session.begin_generate().ok_or_else(|| {
            AppError::Conflict("A generate request is already running".to_string())
        })?;

        let (request, revision) = {
            let state = session.state.lock().await;
            let request = state.generate_request().ok_or_else(|| {
                AppError::BadRequest("Upload a roster before generating".to_string())
            })?;
            (request, state.revision)
        };

        let generated = self.scheduler.generate(&request).await?;

        {
            let mut state = session.state.lock().await;
            if state.revision != revision {
                return Err(AppError::Conflict(
                    "The roster was replaced while generating; generate again".to_string(),
                ));
            }

            log::info!(
                "Session {}: generated roster with {} warnings",
                id,
                generated.warnings.len()
            );
            *state = std::mem::take(&mut *state).with_generated(generated);
        }

        drop(guard);
        Ok(self.sessions.snapshot(id, &session).await)
    }

    pub async fn download(&self, id: Uuid) -> Result<Vec<u8>, AppError> {
        let session = self.session(id).await?;
        let request = session
            .state
            .lock()
            .await
            .download_request()
            .ok_or_else(|| AppError::BadRequest("Nothing to export yet".to_string()))?;

        Ok(self.scheduler.download(&request).await?)
    }

    /// Apply operator-entered thresholds. The policy is marked custom since
    /// it no longer matches a saved preset.
    pub async fn update_settings(
        &self,
        id: Uuid,
        raw: &HashMap<String, Value>,
    ) -> Result<SessionSnapshot, AppError> {
        let session = self.session(id).await?;
        let policy = PolicyConfig::from_raw(raw);

        {
            let mut state = session.state.lock().await;
            *state = std::mem::take(&mut *state).with_policy(policy, CUSTOM_PRESET);
        }

        Ok(self.sessions.snapshot(id, &session).await)
    }

    pub async fn apply_preset(&self, id: Uuid, name: &str) -> Result<SessionSnapshot, AppError> {
        let session = self.session(id).await?;
        let preset = self
            .presets
            .get(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Preset not found: {}", name)))?;

        {
            let mut state = session.state.lock().await;
            *state = std::mem::take(&mut *state).with_policy(preset.policy, preset.name);
        }

        Ok(self.sessions.snapshot(id, &session).await)
    }

    pub async fn select_calendar(
        &self,
        id: Uuid,
        calendar: Option<YearMonth>,
    ) -> Result<SessionSnapshot, AppError> {
        let session = self.session(id).await?;

        {
            let mut state = session.state.lock().await;
            *state = std::mem::take(&mut *state).with_calendar(calendar);
        }

        Ok(self.sessions.snapshot(id, &session).await)
    }

    pub async fn render(&self, id: Uuid) -> Result<RenderedRoster, AppError> {
        let session = self.session(id).await?;
        let state = session.state.lock().await;

        let grid = state
            .render()?
            .ok_or_else(|| AppError::NotFound("No roster uploaded yet".to_string()))?;

        Ok(RenderedRoster {
            findings: grid.findings(),
            warnings: state.warnings().to_vec(),
            grid,
        })
    }
}
