//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/v1/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. Auth validator → 2. Audit logger

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints::{self, crud, prescriptions};
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::models::*;
use crate::service::{MedicalService, Protected};

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn api_router(service: Arc<MedicalService>) -> Router {
    let ctx = ApiContext::new(service);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .merge(crud_routes::<Physician>("/physician"))
        .merge(crud_routes::<Patient>("/patient"))
        .merge(crud_routes::<Medicine>("/medicine"))
        .merge(crud_routes::<MedicalSchool>("/medicalschool"))
        .merge(crud_routes::<MedicalTraining>("/medicaltraining"))
        .merge(crud_routes::<MedicalCertificate>("/medicalcertificate"))
        .route("/prescription", get(prescriptions::list))
        .route(
            "/prescription/:physician_id/:patient_id",
            get(prescriptions::read)
                .put(prescriptions::update)
                .delete(prescriptions::delete),
        )
        .route(
            "/prescription/:physician_id/:patient_id/:medicine_id",
            post(prescriptions::create),
        )
        .with_state(ctx.clone())
        // Middleware stack (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx));

    let unprotected = Router::new().route("/test/health", get(endpoints::health::check));

    Router::new()
        .nest("/api/v1", protected)
        .nest("/api/v1", unprotected)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

fn crud_routes<E>(base: &str) -> Router<ApiContext>
where
    E: Protected<Key = i64> + Serialize + Send + 'static,
    E::Draft: DeserializeOwned + Send + 'static,
{
    Router::new()
        .route(base, get(crud::list::<E>).post(crud::create::<E>))
        .route(
            &format!("{base}/:id"),
            get(crud::read::<E>)
                .put(crud::update::<E>)
                .delete(crud::delete::<E>),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use base64::Engine;
    use rusqlite::Connection;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::crypto;
    use crate::db;
    use crate::service::ServiceOptions;

    const ADMIN: (&str, &str) = ("admin", "admin");
    const USER: (&str, &str) = ("cst8288", "8288");

    fn add_user(conn: &Connection, (name, password): (&str, &str), roles: &[Role], physician: Option<i64>) {
        let hash = crypto::hash_password_with(password, &[9u8; crypto::SALT_LENGTH], 1_000);
        db::insert_security_user(conn, name, &hash, physician, roles).unwrap();
    }

    /// Router over a fresh database with an administrator and a user linked
    /// to physician "Jane Doe" (returned id).
    fn test_app() -> (Router, i64) {
        let conn = db::open_memory_database().unwrap();
        let physician = db::insert_physician(&conn, &PhysicianDraft::new("Jane", "Doe")).unwrap();
        add_user(&conn, ADMIN, &[Role::Admin, Role::User], None);
        add_user(&conn, USER, &[Role::User], Some(physician.id));
        let service = Arc::new(MedicalService::new(conn, ServiceOptions::default()));
        (api_router(service), physician.id)
    }

    fn request(
        method: &str,
        uri: &str,
        creds: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((user, pass)) = creds {
            let token = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"));
            builder = builder.header("Authorization", format!("Basic {token}"));
        }
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_auth() {
        let (app, _) = test_app();
        let response = app
            .oneshot(request("GET", "/api/v1/test/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "AcmeMedical");
    }

    #[tokio::test]
    async fn missing_credentials_are_401() {
        let (app, _) = test_app();
        let response = app
            .oneshot(request("GET", "/api/v1/patient", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let (app, _) = test_app();
        let response = app
            .oneshot(request("GET", "/api/v1/patient", Some(("admin", "nope")), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_creates_physician() {
        let (app, _) = test_app();
        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/physician",
                Some(ADMIN),
                Some(json!({"first_name": "Jane", "last_name": "Doe"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
        let json = json_body(response).await;
        assert!(json["id"].as_i64().unwrap() > 0);
        assert_eq!(json["first_name"], "Jane");
        assert_eq!(json["last_name"], "Doe");
    }

    #[tokio::test]
    async fn user_cannot_list_physicians() {
        let (app, _) = test_app();
        let response = app
            .oneshot(request("GET", "/api/v1/physician", Some(USER), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn user_reads_own_physician_record() {
        let (app, physician_id) = test_app();
        let response = app
            .oneshot(request(
                "GET",
                &format!("/api/v1/physician/{physician_id}"),
                Some(USER),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["id"], physician_id);
    }

    #[tokio::test]
    async fn unknown_physician_is_404() {
        let (app, _) = test_app();
        let response = app
            .oneshot(request("GET", "/api/v1/physician/99999", Some(USER), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn school_requires_type() {
        let (app, _) = test_app();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/medicalschool",
                Some(ADMIN),
                Some(json!({"name": "University Medical School"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/medicalschool",
                Some(ADMIN),
                Some(json!({"name": "University Medical School", "type": "PublicSchool"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["type"], "PublicSchool");
    }

    #[tokio::test]
    async fn duplicate_school_is_409() {
        let (app, _) = test_app();
        let school = json!({"name": "University Medical School", "type": "PrivateSchool"});
        let first = app
            .clone()
            .oneshot(request("POST", "/api/v1/medicalschool", Some(ADMIN), Some(school.clone())))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(request("POST", "/api/v1/medicalschool", Some(ADMIN), Some(school)))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (app, _) = test_app();
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/patient")
            .header(
                "Authorization",
                format!(
                    "Basic {}",
                    base64::engine::general_purpose::STANDARD.encode("admin:admin")
                ),
            )
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn non_numeric_id_is_400() {
        let (app, _) = test_app();
        let response = app
            .oneshot(request("GET", "/api/v1/patient/abc", Some(ADMIN), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn prescription_lifecycle() {
        let (app, physician_id) = test_app();

        let patient = json_body(
            app.clone()
                .oneshot(request(
                    "POST",
                    "/api/v1/patient",
                    Some(USER),
                    Some(json!({
                        "first_name": "Alice",
                        "last_name": "Johnson",
                        "year_of_birth": 1990,
                        "home_address": "123 Main St",
                        "height_cm": 170,
                        "weight_kg": 65,
                        "smoker": false
                    })),
                ))
                .await
                .unwrap(),
        )
        .await;
        let patient_id = patient["id"].as_i64().unwrap();

        let medicine = json_body(
            app.clone()
                .oneshot(request(
                    "POST",
                    "/api/v1/medicine",
                    Some(ADMIN),
                    Some(json!({
                        "drug_name": "Ibuprofen",
                        "manufacturer_name": "Acme",
                        "dosage_information": "200mg"
                    })),
                ))
                .await
                .unwrap(),
        )
        .await;
        let medicine_id = medicine["id"].as_i64().unwrap();

        let create_uri = format!("/api/v1/prescription/{physician_id}/{patient_id}/{medicine_id}");
        let created = app
            .clone()
            .oneshot(request(
                "POST",
                &create_uri,
                Some(ADMIN),
                Some(json!({"number_of_refills": 2})),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::OK);
        let json = json_body(created).await;
        assert_eq!(json["id"]["physician_id"], physician_id);
        assert_eq!(json["id"]["patient_id"], patient_id);

        let again = app
            .clone()
            .oneshot(request("POST", &create_uri, Some(ADMIN), Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::CONFLICT);

        let key_uri = format!("/api/v1/prescription/{physician_id}/{patient_id}");
        let user_read = app
            .clone()
            .oneshot(request("GET", &key_uri, Some(USER), None))
            .await
            .unwrap();
        assert_eq!(user_read.status(), StatusCode::FORBIDDEN);

        let deleted = app
            .clone()
            .oneshot(request("DELETE", &key_uri, Some(ADMIN), None))
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);

        let gone = app
            .oneshot(request("GET", &key_uri, Some(ADMIN), None))
            .await
            .unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn prescription_with_unknown_medicine_is_400() {
        let (app, physician_id) = test_app();
        let response = app
            .oneshot(request(
                "POST",
                &format!("/api/v1/prescription/{physician_id}/1/999"),
                Some(ADMIN),
                Some(json!({})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
