//! Router-level tests against an in-memory store and a temporary media root.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use blotter_media::MediaDir;
use blotter_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt as _;

use crate::{ApiState, api_router};

struct Harness {
  state: ApiState<SqliteStore>,
  _tmp:  TempDir,
}

async fn harness() -> Harness {
  let tmp = tempfile::tempdir().unwrap();
  let store = SqliteStore::open_in_memory().await.unwrap();
  let media = MediaDir::new(tmp.path().join("photos"));
  Harness {
    state: ApiState::new(Arc::new(store), Arc::new(media)),
    _tmp:  tmp,
  }
}

async fn send(h: &Harness, method: &str, uri: &str, body: Option<Value>) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  api_router(h.state.clone())
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap()
}

async fn body_bytes(resp: Response) -> Vec<u8> {
  axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap()
    .to_vec()
}

async fn body_json(resp: Response) -> Value {
  serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

async fn create_subject(h: &Harness, name: &str, gender: &str, dob: &str) -> i64 {
  let resp = send(
    h,
    "POST",
    "/subjects",
    Some(json!({ "name": name, "gender": gender, "date_of_birth": dob })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  body_json(resp).await["subject_id"].as_i64().unwrap()
}

async fn create_incident(h: &Harness, body: Value) -> i64 {
  let resp = send(h, "POST", "/incidents", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  body_json(resp).await["id"].as_i64().unwrap()
}

fn names(list: &Value) -> Vec<&str> {
  list
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["name"].as_str().unwrap())
    .collect()
}

// ── Subjects ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_subject() {
  let h = harness().await;
  let id = create_subject(&h, "Anna", "Female", "1991-04-12").await;

  let resp = send(&h, "GET", &format!("/subjects/{id}"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let subject = body_json(resp).await;
  assert_eq!(subject["name"], "Anna");
  assert_eq!(subject["date_of_birth"], "1991-04-12");
  assert_eq!(subject["photos"]["front"], Value::Null);
}

#[tokio::test]
async fn missing_subject_is_404() {
  let h = harness().await;
  let resp = send(&h, "GET", "/subjects/77", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_date_is_400_and_nothing_is_stored() {
  let h = harness().await;
  let resp = send(
    &h,
    "POST",
    "/subjects",
    Some(json!({ "name": "Anna", "date_of_birth": "12/04/1991" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let err = body_json(resp).await;
  assert!(err["error"].as_str().unwrap().contains("date_of_birth"));

  let list = body_json(send(&h, "GET", "/subjects", None).await).await;
  assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn blank_name_is_400() {
  let h = harness().await;
  let resp = send(&h, "POST", "/subjects", Some(json!({ "name": "  " }))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_by_name_gender_and_dob() {
  let h = harness().await;
  create_subject(&h, "Anna", "Female", "1991-04-12").await;
  create_subject(&h, "Dan", "Male", "1985-01-01").await;
  create_subject(&h, "Bob", "Male", "1970-07-07").await;

  let by_name = body_json(send(&h, "GET", "/subjects?name=AN", None).await).await;
  assert_eq!(names(&by_name), ["Dan", "Anna"]);

  let all_genders =
    body_json(send(&h, "GET", "/subjects?gender=All", None).await).await;
  assert_eq!(names(&all_genders), ["Bob", "Dan", "Anna"]);

  let men = body_json(send(&h, "GET", "/subjects?gender=Male", None).await).await;
  assert_eq!(names(&men), ["Bob", "Dan"]);

  let eighties = body_json(
    send(&h, "GET", "/subjects?dob_from=1985-01-01&dob_to=1991-04-12", None).await,
  )
  .await;
  assert_eq!(names(&eighties), ["Dan", "Anna"]);

  // One bound alone does not filter.
  let half = body_json(send(&h, "GET", "/subjects?dob_from=2000-01-01", None).await).await;
  assert_eq!(names(&half).len(), 3);
}

#[tokio::test]
async fn inverted_dob_range_is_400() {
  let h = harness().await;
  let resp = send(&h, "GET", "/subjects?dob_from=2000-01-01&dob_to=1990-01-01", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Photos ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn uploaded_photo_is_served_back() {
  let h = harness().await;
  let resp = send(
    &h,
    "POST",
    "/subjects",
    Some(json!({
      "name": "Anna",
      "photos": [{ "view": "left", "file_name": "side.png", "data": B64.encode(b"PNGDATA") }],
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let reg = body_json(resp).await;
  let id = reg["subject_id"].as_i64().unwrap();
  assert!(reg["photos"]["left"].as_str().unwrap().ends_with(&format!("{id}_left.png")));
  assert_eq!(reg["photos"]["front"], Value::Null);
  assert!(reg["failures"].as_array().unwrap().is_empty());

  let photo = send(&h, "GET", &format!("/subjects/{id}/photos/left"), None).await;
  assert_eq!(photo.status(), StatusCode::OK);
  assert_eq!(photo.headers()[header::CONTENT_TYPE], "image/png");
  assert_eq!(body_bytes(photo).await, b"PNGDATA");

  let front = send(&h, "GET", &format!("/subjects/{id}/photos/front"), None).await;
  assert_eq!(front.status(), StatusCode::NOT_FOUND);

  let bogus = send(&h, "GET", &format!("/subjects/{id}/photos/top"), None).await;
  assert_eq!(bogus.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_base64_is_400() {
  let h = harness().await;
  let resp = send(
    &h,
    "POST",
    "/subjects",
    Some(json!({
      "name": "Anna",
      "photos": [{ "view": "front", "data": "***not base64***" }],
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Incidents ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn incident_detail_tolerates_dangling_subject() {
  let h = harness().await;
  let id = create_incident(
    &h,
    json!({ "category": "Fraud", "occurred_on": "2024-01-10", "subject_id": 4242 }),
  )
  .await;

  let resp = send(&h, "GET", &format!("/incidents/{id}"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let detail = body_json(resp).await;
  assert_eq!(detail["category"], "Fraud");
  assert_eq!(detail["subject_id"], 4242);
  assert_eq!(detail["subject"], Value::Null);
}

#[tokio::test]
async fn incident_detail_resolves_linked_subject() {
  let h = harness().await;
  let subject_id = create_subject(&h, "Dan", "Male", "1985-01-01").await;
  let id = create_incident(
    &h,
    json!({ "category": "Theft", "subject_id": subject_id, "officer": "Insp. Mensah" }),
  )
  .await;

  let detail = body_json(send(&h, "GET", &format!("/incidents/{id}"), None).await).await;
  assert_eq!(detail["subject"]["name"], "Dan");
  assert_eq!(detail["officer"], "Insp. Mensah");
}

#[tokio::test]
async fn incident_requires_category() {
  let h = harness().await;
  let resp = send(&h, "POST", "/incidents", Some(json!({ "category": "" }))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn incidents_filter_by_keyword_and_range() {
  let h = harness().await;
  create_incident(
    &h,
    json!({ "category": "Theft", "description": "Bicycle taken", "occurred_on": "2024-03-01" }),
  )
  .await;
  create_incident(
    &h,
    json!({ "category": "Fraud", "title": "Fake invoices", "occurred_on": "2024-03-31" }),
  )
  .await;
  create_incident(&h, json!({ "category": "Theft", "occurred_on": "2024-04-01" })).await;

  let thefts = body_json(send(&h, "GET", "/incidents?q=theft", None).await).await;
  assert_eq!(thefts.as_array().unwrap().len(), 2);

  let march = body_json(
    send(&h, "GET", "/incidents?from=2024-03-01&to=2024-03-31", None).await,
  )
  .await;
  let categories: Vec<_> = march
    .as_array()
    .unwrap()
    .iter()
    .map(|i| i["category"].as_str().unwrap())
    .collect();
  assert_eq!(categories, ["Fraud", "Theft"]);
}

// ── Reports ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn summary_on_empty_store() {
  let h = harness().await;
  let summary = body_json(send(&h, "GET", "/reports/summary", None).await).await;
  assert_eq!(summary["total_subjects"], 0);
  assert_eq!(summary["total_incidents"], 0);
  assert_eq!(summary["incidents_by_category"], json!([]));
}

#[tokio::test]
async fn summary_counts_by_category() {
  let h = harness().await;
  create_subject(&h, "Anna", "Female", "1991-04-12").await;
  for category in ["Theft", "Theft", "Fraud", "Theft"] {
    create_incident(&h, json!({ "category": category })).await;
  }

  let summary = body_json(send(&h, "GET", "/reports/summary", None).await).await;
  assert_eq!(summary["total_subjects"], 1);
  assert_eq!(summary["total_incidents"], 4);
  assert_eq!(
    summary["incidents_by_category"],
    json!([
      { "category": "Theft", "count": 3 },
      { "category": "Fraud", "count": 1 },
    ])
  );

  let genders = body_json(send(&h, "GET", "/reports/counts/gender", None).await).await;
  assert_eq!(genders, json!([{ "category": "Female", "count": 1 }]));

  let unknown = send(&h, "GET", "/reports/counts/password", None).await;
  assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

// ── Export ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn subjects_export_is_csv_newest_first() {
  let h = harness().await;
  create_subject(&h, "Anna", "Female", "1991-04-12").await;
  create_subject(&h, "Dan, Jr.", "Male", "1985-01-01").await;

  let resp = send(&h, "GET", "/export/subjects.csv", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(
    resp.headers()[header::CONTENT_DISPOSITION]
      .to_str()
      .unwrap()
      .contains("subjects.csv")
  );
  let text = String::from_utf8(body_bytes(resp).await).unwrap();
  let lines: Vec<_> = text.lines().collect();
  assert_eq!(lines.len(), 3);
  assert!(lines[0].starts_with("id,name,dob,gender"));
  assert!(lines[1].starts_with("2,\"Dan, Jr.\",1985-01-01,Male"), "{}", lines[1]);
  assert!(lines[2].starts_with("1,Anna,1991-04-12,Female"), "{}", lines[2]);
}

#[tokio::test]
async fn incidents_export_on_empty_store_has_only_header() {
  let h = harness().await;
  let resp = send(&h, "GET", "/export/incidents.csv", None).await;
  let text = String::from_utf8(body_bytes(resp).await).unwrap();
  assert_eq!(
    text.trim_end(),
    "id,title,crime_type,description,occurred_on,location,subject_id,officer,created_at"
  );
}
