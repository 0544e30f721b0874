use super::*;
use axum::{body, body::Body, http::Request};
use timetable::SourceKind;
use tower::ServiceExt;

fn test_app(kind: SourceKind) -> Router {
    let catalog = Catalog::builtin().expect("catalog");
    let source = build_source(kind, &catalog, Some(17));
    build_router(Arc::new(AppState::new(&catalog, source)))
}

async fn body_string(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app(SourceKind::Sample);
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn initial_page_has_dropdown_and_empty_section() {
    let app = test_app(SourceKind::Sample);
    let request = Request::get("/").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("<select id=\"batch\" name=\"batch_id\">"));
    assert!(html.contains("<optgroup label=\"Computer Science\">"));
    assert!(html.contains("<option value=\"1\">CSE-A</option>"));
    assert!(html.contains("<div id=\"timetable-section\"></div>"));
    assert!(!html.contains("role=\"alert\""));
}

#[tokio::test]
async fn viewing_without_batch_shows_alert_and_no_table() {
    let app = test_app(SourceKind::Sample);
    let request = Request::get("/?batch_id=&view=1")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert_eq!(html.matches("role=\"alert\"").count(), 1);
    assert!(html.contains("Please select a batch."));
    assert!(html.contains("<div id=\"timetable-section\"></div>"));
    assert!(!html.contains("<table>"));
}

#[tokio::test]
async fn viewing_a_batch_renders_table_into_section() {
    let app = test_app(SourceKind::Sample);
    let request = Request::get("/?batch_id=2&view=1")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    let html = body_string(response).await;

    assert!(html.contains("<div id=\"timetable-section\"><table>"));
    assert!(html.contains("<option value=\"2\" selected>CSE-B</option>"));
    assert_eq!(html.matches("<td>").count(), 25);
    assert!(!html.contains("role=\"alert\""));
}

#[tokio::test]
async fn fragment_is_identical_for_any_batch_with_sample_source() {
    let app = test_app(SourceKind::Sample);
    let first = app
        .clone()
        .oneshot(Request::get("/timetable?batch_id=1").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let second = app
        .oneshot(Request::get("/timetable?batch_id=xyz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let first = body_string(first).await;
    assert_eq!(first, body_string(second).await);
    assert_eq!(first.matches("<tr>").count(), 6);
    assert!(first.starts_with(
        "<table><tr><th>Day</th><th>Period 1</th><th>Period 2</th><th>Period 3</th><th>Period 4</th></tr>"
    ));
}

#[tokio::test]
async fn fragment_without_batch_is_validation_error() {
    let app = test_app(SourceKind::Sample);
    let response = app
        .oneshot(Request::get("/timetable").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_string(response).await;
    let error: ApiError = serde_json::from_str(&body).expect("json");
    assert_eq!(error.code, ErrorCode::Validation);
    assert_eq!(error.message, "Please select a batch.");
}

#[tokio::test]
async fn fragment_for_unknown_batch_with_generated_source_is_not_found() {
    let app = test_app(SourceKind::Generated);
    let response = app
        .oneshot(Request::get("/timetable?batch_id=404").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_timetable_returns_schedule_items() {
    let app = test_app(SourceKind::Generated);
    let request = Request::post("/get_timetable")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("batch_id=1"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    let items: Vec<ScheduleItem> = serde_json::from_str(&body).expect("json");
    assert!(!items.is_empty());
    assert!(items.iter().all(|item| item.period != 3));
    assert!(items.iter().all(|item| item.teacher_name.is_some()));
}

#[tokio::test]
async fn get_timetable_without_batch_is_rejected() {
    let app = test_app(SourceKind::Sample);
    let request = Request::post("/get_timetable")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("batch_id="))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batches_are_grouped_by_department() {
    let app = test_app(SourceKind::Sample);
    let response = app
        .oneshot(Request::get("/batches").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let body = body_string(response).await;
    let groups: Vec<DepartmentBatches> = serde_json::from_str(&body).expect("json");

    let departments: Vec<_> = groups.iter().map(|g| g.department.as_str()).collect();
    assert_eq!(departments, ["Computer Science", "Electronics"]);
    assert_eq!(groups[0].batches.len(), 2);
}

#[tokio::test]
async fn viewing_unknown_batch_with_generated_source_shows_alert_and_empty_section() {
    let app = test_app(SourceKind::Generated);
    let request = Request::get("/?batch_id=404&view=1")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert_eq!(html.matches("role=\"alert\"").count(), 1);
    assert!(html.contains("no timetable for batch &#39;404&#39;"));
    assert!(html.contains("<div id=\"timetable-section\"></div>"));
    assert!(!html.contains("<table>"));
}
