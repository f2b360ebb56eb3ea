use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result, http::header, web};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::grid::YearMonth;
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestIdExt;
use crate::services::RosterService;
use crate::services::scheduler::XLSX_CONTENT_TYPE;

pub const EXPORT_FILE_NAME: &str = "shift_schedule.xlsx";

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

/// Either `{"year": 2024, "month": 1}`, `{"period": "2024-01"}`, or `{}` to
/// clear the selection.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarSelection {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub period: Option<String>,
}

impl CalendarSelection {
    fn resolve(&self) -> Result<Option<YearMonth>, AppError> {
        if let Some(period) = &self.period {
            return period.parse().map(Some).map_err(AppError::BadRequest);
        }

        match (self.year, self.month) {
            (Some(year), Some(month)) if (1..=12).contains(&month) => {
                Ok(Some(YearMonth::new(year, month)))
            }
            (Some(_), Some(month)) => Err(AppError::BadRequest(format!(
                "Month must be between 1 and 12, got {}",
                month
            ))),
            (None, None) => Ok(None),
            _ => Err(AppError::BadRequest(
                "Both year and month are required".to_string(),
            )),
        }
    }
}

pub async fn create_session(roster: web::Data<RosterService>) -> Result<HttpResponse> {
    let snapshot = roster.create_session().await;
    Ok(HttpResponse::Created().json(ApiResponse::success(snapshot)))
}

pub async fn get_session(
    roster: web::Data<RosterService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let snapshot = roster.snapshot(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(snapshot)))
}

pub async fn delete_session(
    roster: web::Data<RosterService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    roster.close_session(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Session closed",
    )))
}

pub async fn upload(
    req: HttpRequest,
    roster: web::Data<RosterService>,
    path: web::Path<Uuid>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    log::info!(
        "Upload {} for session {} (correlation_id={})",
        query.filename,
        id,
        req.correlation_id().unwrap_or_default()
    );

    let snapshot = roster.upload(id, &query.filename, body.to_vec()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(snapshot)))
}

pub async fn generate(
    req: HttpRequest,
    roster: web::Data<RosterService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    log::info!(
        "Generate for session {} (correlation_id={})",
        id,
        req.correlation_id().unwrap_or_default()
    );

    let snapshot = roster.generate(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(snapshot)))
}

pub async fn download(
    roster: web::Data<RosterService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let bytes = roster.download(path.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
        ))
        .body(bytes))
}

pub async fn update_settings(
    roster: web::Data<RosterService>,
    path: web::Path<Uuid>,
    input: web::Json<HashMap<String, Value>>,
) -> Result<HttpResponse> {
    let snapshot = roster.update_settings(path.into_inner(), &input).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(snapshot)))
}

pub async fn select_calendar(
    roster: web::Data<RosterService>,
    path: web::Path<Uuid>,
    input: web::Json<CalendarSelection>,
) -> Result<HttpResponse> {
    let calendar = input.resolve()?;
    let snapshot = roster.select_calendar(path.into_inner(), calendar).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(snapshot)))
}

pub async fn apply_preset(
    roster: web::Data<RosterService>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse> {
    let (id, name) = path.into_inner();
    let snapshot = roster.apply_preset(id, &name).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(snapshot)))
}

pub async fn get_grid(
    roster: web::Data<RosterService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let rendered = roster.render(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(rendered)))
}
