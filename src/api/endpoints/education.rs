//! Education library endpoints.

use std::str::FromStr;

use axum::extract::{Path, Query};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::education::{self, Material, MaterialCategory, MaterialKey};

#[derive(Deserialize)]
pub struct RecommendQuery {
    pub post_op_day: Option<i64>,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub post_op_day: i64,
    pub materials: Vec<&'static Material>,
}

/// `GET /api/education`: every handout, grouped by category.
pub async fn list() -> Json<Vec<MaterialCategory>> {
    Json(education::materials_by_category())
}

/// `GET /api/education/recommended?post_op_day=N`
pub async fn recommended(Query(query): Query<RecommendQuery>) -> Json<RecommendResponse> {
    let post_op_day = query.post_op_day.unwrap_or(0);
    let materials = education::recommend_materials(post_op_day)
        .into_iter()
        .map(education::material)
        .collect();
    Json(RecommendResponse {
        post_op_day,
        materials,
    })
}

/// `GET /api/education/:key`: by key (`BREATHING_EXERCISE`) or id (`EDU002`).
pub async fn detail(Path(key): Path<String>) -> Result<Json<&'static Material>, ApiError> {
    let found = match MaterialKey::from_str(&key) {
        Ok(k) => Some(education::material(k)),
        Err(_) => education::materials().iter().find(|m| m.id == key),
    };
    found
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Material not found: {key}")))
}
