use std::collections::HashMap;

use actix_web::{HttpResponse, Result, web};
use serde_json::Value;

use crate::database::PresetRepository;
use crate::error::AppError;
use crate::grid::PolicyConfig;
use crate::handlers::shared::ApiResponse;

pub async fn list_presets(repo: web::Data<PresetRepository>) -> Result<HttpResponse> {
    let presets = repo.list().await.map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(presets)))
}

pub async fn get_preset(
    repo: web::Data<PresetRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    let preset = repo
        .get(&name)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Preset not found: {}", name)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(preset)))
}

/// Thresholds are read as leniently as the session settings form.
pub async fn save_preset(
    repo: web::Data<PresetRepository>,
    path: web::Path<String>,
    input: web::Json<HashMap<String, Value>>,
) -> Result<HttpResponse> {
    let policy = PolicyConfig::from_raw(&input);
    let preset = repo
        .save(&path.into_inner(), policy)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(preset)))
}

pub async fn delete_preset(
    repo: web::Data<PresetRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let name = path.into_inner();
    if !repo.delete(&name).await.map_err(AppError::from)? {
        return Err(AppError::NotFound(format!("Preset not found: {}", name)).into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Preset deleted",
    )))
}
