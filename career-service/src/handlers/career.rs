use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        career::{
            CoursesQuery, JobsQuery, RecommendationRequest, RecommendationResponse, StatsQuery,
            UpdateProfileRequest,
        },
        DataResponse, MessageResponse,
    },
    middleware::AuthUser,
    services::{catalog, NewProfile},
    utils::ValidatedJson,
    AppState,
};

/// Generate recommendations and store them as a new profile
pub async fn generate_recommendations(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<RecommendationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (recommendations, profile_id) = state
        .careers
        .generate(
            &user.0.user_id,
            NewProfile {
                education: req.education,
                interests: req.interests.into(),
                goals: req.goals,
                skills: req.skills,
            },
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(RecommendationResponse {
            success: true,
            data: recommendations,
            profile_id,
        }),
    ))
}

pub async fn list_profiles(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let profiles = state.careers.list(&user.0.user_id).await?;
    Ok(Json(DataResponse::new(profiles)))
}

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.careers.get(&user.0.user_id, &id).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// Patch recommendation items (e.g. mark them saved)
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state
        .careers
        .update(&user.0.user_id, &id, req.updates.recommendations)
        .await?;
    Ok(Json(DataResponse::new(profile)))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.careers.delete(&user.0.user_id, &id).await?;
    Ok(Json(MessageResponse::ok("Career profile deleted successfully")))
}

pub async fn catalog_courses(Query(query): Query<CoursesQuery>) -> impl IntoResponse {
    Json(DataResponse::new(catalog::courses_for_skills(&query.skill_list())))
}

pub async fn catalog_jobs(Query(query): Query<JobsQuery>) -> impl IntoResponse {
    Json(DataResponse::new(catalog::jobs_for_role(
        query.role.as_deref().unwrap_or_default(),
    )))
}

pub async fn catalog_stats(Query(query): Query<StatsQuery>) -> impl IntoResponse {
    Json(DataResponse::new(catalog::stats_for_career(
        query.career_path.as_deref().unwrap_or_default(),
    )))
}
