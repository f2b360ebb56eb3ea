use std::collections::HashMap;

use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::grid::{GridInput, PolicyConfig, YearMonth, build_grid, classify_badge};
use crate::handlers::shared::ApiResponse;
use crate::models::day_labels;
use crate::services::RenderedRoster;

/// A roster rendered without a session, e.g. for previews.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub staff_ids: Vec<String>,
    #[serde(deserialize_with = "day_labels")]
    pub dates: Vec<String>,
    pub schedule: Vec<Vec<String>>,
    pub original: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub settings: HashMap<String, Value>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct BadgeQuery {
    pub kind: String,
    pub value: i64,
    pub target: i64,
}

pub async fn render_grid(input: web::Json<RenderRequest>) -> Result<HttpResponse> {
    let input = input.into_inner();
    let policy = PolicyConfig::from_raw(&input.settings);
    let calendar = input
        .year
        .zip(input.month)
        .map(|(year, month)| YearMonth::new(year, month));

    let grid = build_grid(GridInput {
        staff_ids: &input.staff_ids,
        dates: &input.dates,
        schedule: &input.schedule,
        original: input.original.as_deref(),
        policy: &policy,
        calendar,
    })
    .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(RenderedRoster {
        findings: grid.findings(),
        warnings: Vec::new(),
        grid,
    })))
}

pub async fn classify(query: web::Query<BadgeQuery>) -> Result<HttpResponse> {
    let badge =
        classify_badge(&query.kind, query.value, query.target).map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(badge)))
}
