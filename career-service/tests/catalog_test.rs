mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, empty_request, TestApp};

#[tokio::test]
async fn test_courses_by_skills() {
    let app = TestApp::new();
    let session = app.register("Ann", "ann@x.com").await;

    let response = app
        .send(empty_request(
            Method::GET,
            "/api/career/catalog/courses?skills=python,aws",
            session.access.as_deref(),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .expect("courses")
        .iter()
        .filter_map(|c| c["title"].as_str())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Machine Learning Fundamentals",
            "Data Science with Python",
            "Cloud Computing Essentials"
        ]
    );
}

#[tokio::test]
async fn test_jobs_and_stats() {
    let app = TestApp::new();
    let session = app.register("Ann", "ann@x.com").await;
    let cookie = session.access.as_deref();

    let response = app
        .send(empty_request(
            Method::GET,
            "/api/career/catalog/jobs?role=designer",
            cookie,
        ))
        .await;
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["role"], "UX Designer");

    let response = app
        .send(empty_request(
            Method::GET,
            "/api/career/catalog/stats?career_path=devops",
            cookie,
        ))
        .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["growth"], "21%");

    let response = app
        .send(empty_request(
            Method::GET,
            "/api/career/catalog/stats?career_path=astronaut",
            cookie,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].is_null());
}

#[tokio::test]
async fn test_catalog_requires_authentication() {
    let app = TestApp::new();

    let response = app
        .send(empty_request(
            Method::GET,
            "/api/career/catalog/jobs?role=designer",
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
