//! HTTP API integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use patient_records_core::store::RecordStore;
use patient_records_server::router;

const SEED: &str = r#"{
    "P001": {"name": "Ananya Verma", "city": "Guwahati", "age": 28, "gender": "female",
             "height": 1.65, "weight": 90.0, "bmi": 33.06, "verdict": "Obese"},
    "P002": {"name": "Ravi Mehta", "city": "Mumbai", "age": 35, "gender": "male",
             "height": 1.75, "weight": 85, "bmi": 27.76, "verdict": "Overweight"},
    "P003": {"name": "Sneha Kulkarni", "city": "Pune", "age": 22, "gender": "female",
             "height": 1.6, "weight": 45, "bmi": 17.58, "verdict": "Underweight"}
}"#;

fn app() -> Router {
    let store = RecordStore::open_in_memory().unwrap();
    store.import_json(SEED).unwrap();
    router(Arc::new(store))
}

fn sample_patient() -> Value {
    json!({
        "id": "P999",
        "name": "Test Patient",
        "city": "Test City",
        "age": 25,
        "gender": "male",
        "height": 1.75,
        "weight": 70
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_info_endpoints() {
    let app = app();

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient Management System API");

    let (status, body) = send(&app, "GET", "/about", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("patient records"));
}

#[tokio::test]
async fn test_view_patients() {
    let app = app();
    let (status, body) = send(&app, "GET", "/view", None).await;

    assert_eq!(status, StatusCode::OK);
    let map = body.as_object().unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(body["P002"]["verdict"], "Overweight");
    assert_eq!(body["P003"]["bmi"], 17.58);
}

#[tokio::test]
async fn test_view_empty_store() {
    let app = router(Arc::new(RecordStore::open_in_memory().unwrap()));
    let (status, body) = send(&app, "GET", "/view", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_get_patient_by_id() {
    let app = app();
    let (status, body) = send(&app, "GET", "/patient/P001", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "P001");
    assert_eq!(body["name"], "Ananya Verma");
    assert_eq!(body["verdict"], "Obese");
}

#[tokio::test]
async fn test_patient_not_found() {
    let app = app();
    let (status, body) = send(&app, "GET", "/patient/P999999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Patient not found");
}

#[tokio::test]
async fn test_create_patient_success() {
    let app = app();
    let (status, body) = send(&app, "POST", "/create", Some(sample_patient())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "P999");
    assert_eq!(body["bmi"], 22.86);
    assert_eq!(body["verdict"], "Normal");

    let (status, body) = send(&app, "GET", "/patient/P999", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Test Patient");
    assert_eq!(body["age"], 25);
    assert_eq!(body["gender"], "male");
    assert_eq!(body["height"], 1.75);
    assert_eq!(body["weight"], 70.0);
}

#[tokio::test]
async fn test_create_patient_duplicate() {
    let app = app();
    send(&app, "POST", "/create", Some(sample_patient())).await;
    let (status, body) = send(&app, "POST", "/create", Some(sample_patient())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Patient already exists");
}

#[tokio::test]
async fn test_create_ignores_client_derived_fields() {
    let app = app();
    let mut patient = sample_patient();
    patient["bmi"] = json!(99.0);
    patient["verdict"] = json!("Obese");

    let (status, body) = send(&app, "POST", "/create", Some(patient)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bmi"], 22.86);
    assert_eq!(body["verdict"], "Normal");
}

#[tokio::test]
async fn test_create_patient_invalid() {
    let app = app();

    let mut zero_age = sample_patient();
    zero_age["age"] = json!(0);
    let (status, body) = send(&app, "POST", "/create", Some(zero_age)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");

    let mut bad_gender = sample_patient();
    bad_gender["gender"] = json!("robot");
    let (status, _) = send(&app, "POST", "/create", Some(bad_gender)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut missing_height = sample_patient();
    missing_height.as_object_mut().unwrap().remove("height");
    let (status, _) = send(&app, "POST", "/create", Some(missing_height)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "GET", "/patient/P999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_rejects_unrepresentable_bmi() {
    let app = app();

    let mut tiny_height = sample_patient();
    tiny_height["height"] = json!(1e-200);
    let (status, body) = send(&app, "POST", "/create", Some(tiny_height)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");

    let mut huge_weight = sample_patient();
    huge_weight["height"] = json!(0.1);
    huge_weight["weight"] = json!(1e307);
    let (status, _) = send(&app, "POST", "/create", Some(huge_weight)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "GET", "/patient/P999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Same guard applies when an edit produces the extreme measurements
    let (status, _) = send(&app, "PUT", "/edit/P001", Some(json!({ "height": 1e-200 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (_, body) = send(&app, "GET", "/patient/P001", None).await;
    assert_eq!(body["height"], 1.65);
}

#[tokio::test]
async fn test_update_patient_success() {
    let app = app();
    send(&app, "POST", "/create", Some(sample_patient())).await;

    let updated_data = json!({
        "name": "Nahian",
        "city": "Dhaka",
        "height": 1.65,
        "weight": 67
    });
    let (status, body) = send(&app, "PUT", "/edit/P999", Some(updated_data)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Nahian");
    assert_eq!(body["city"], "Dhaka");
    assert_eq!(body["age"], 25);
    assert_eq!(body["gender"], "male");
    assert_eq!(body["bmi"], 24.61);
    assert_eq!(body["verdict"], "Normal");
}

#[tokio::test]
async fn test_update_patient_not_found() {
    let app = app();
    let updated_data = json!({
        "name": "Nahian",
        "city": "Dhaka",
        "height": 1.65,
        "weight": 67
    });
    let (status, _) = send(&app, "PUT", "/edit/P1000", Some(updated_data)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_patient_invalid() {
    let app = app();
    let (status, _) = send(&app, "PUT", "/edit/P001", Some(json!({ "weight": -5 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, "GET", "/patient/P001", None).await;
    assert_eq!(body["weight"], 90.0);
}

#[tokio::test]
async fn test_delete_patient() {
    let app = app();
    let (status, body) = send(&app, "DELETE", "/delete/P002", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "P002");

    let (status, _) = send(&app, "GET", "/patient/P002", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/delete/P002", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sort_patients() {
    let app = app();
    let (status, body) = send(&app, "GET", "/sort?sort_by=bmi&order=desc", None).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["P001", "P002", "P003"]);

    let (status, body) = send(&app, "GET", "/sort?sort_by=height", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "P003");
}

#[tokio::test]
async fn test_sort_invalid_params() {
    let app = app();

    let (status, _) = send(&app, "GET", "/sort?sort_by=age", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/sort?sort_by=bmi&order=sideways", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/sort", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_edit_delete_scenario() {
    let app = router(Arc::new(RecordStore::open_in_memory().unwrap()));

    let (status, body) = send(&app, "POST", "/create", Some(sample_patient())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bmi"], 22.86);
    assert_eq!(body["verdict"], "Normal");

    let (status, body) = send(
        &app,
        "PUT",
        "/edit/P999",
        Some(json!({ "height": 1.65, "weight": 67 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bmi"], 24.61);
    assert_eq!(body["verdict"], "Normal");

    let (status, _) = send(&app, "DELETE", "/delete/P999", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/patient/P999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
