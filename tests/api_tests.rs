use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use automax_api::data::memory::InMemorySessionStore;
use automax_api::data::sqlite::SqliteStore;
use automax_api::presentation::auth::SESSION_COOKIE;
use automax_api::presentation::handlers::AppState;
use automax_api::presentation::middleware::RequestLogMiddleware;
use automax_api::presentation::routes::configure;
use serde_json::json;

macro_rules! setup_test {
    () => {{
        let store = SqliteStore::in_memory().await.unwrap();
        store.init_schema().await.unwrap();
        store.seed_catalog().await.unwrap();
        let state = web::Data::new(AppState::new(
            store.clone(),
            InMemorySessionStore::default(),
            false,
        ));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .wrap(RequestLogMiddleware)
                .configure(configure),
        )
        .await;
        (app, store)
    }};
}

/// Registers a user and returns their session cookie.
macro_rules! login_as {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/registro")
            .set_json(json!({
                "nombre": "Cliente",
                "email": $email,
                "password": "secreto",
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        resp.response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("session cookie set")
            .into_owned()
    }};
}

async fn count_rows(store: &SqliteStore, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(store.pool())
        .await
        .unwrap();
    count
}

#[actix_web::test]
async fn test_health_check() {
    let (app, _store) = setup_test!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert!(resp.headers().contains_key("x-response-time"));
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "OK");
}

#[actix_web::test]
async fn test_each_request_gets_its_own_request_id() {
    let (app, _store) = setup_test!();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/api/autos").to_request();
        let resp = test::call_service(&app, req).await;
        let id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok(), "{id}");
        ids.push(id.to_string());
    }
    assert_ne!(ids[0], ids[1]);
}

#[actix_web::test]
async fn test_list_vehicles_returns_catalog() {
    let (app, _store) = setup_test!();

    let req = test::TestRequest::get().uri("/api/autos").to_request();
    let vehicles: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(vehicles.len(), 8);
    assert_eq!(vehicles[0]["marca"], "Toyota");
    assert_eq!(vehicles[0]["modelo"], "Corolla");
    assert_eq!(vehicles[0]["año"], 2024);
    assert_eq!(vehicles[0]["precio"], 380_000.0);
    assert_eq!(vehicles[0]["transmision"], "Automática");
    assert!(vehicles.iter().all(|v| v["disponible"] == true));
}

#[actix_web::test]
async fn test_unavailable_vehicles_are_hidden() {
    let (app, store) = setup_test!();
    sqlx::query("UPDATE vehicles SET available = 0 WHERE id = 2")
        .execute(store.pool())
        .await
        .unwrap();

    let req = test::TestRequest::get().uri("/api/autos").to_request();
    let vehicles: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(vehicles.len(), 7);
    assert!(vehicles.iter().all(|v| v["id"] != 2));

    let req = test::TestRequest::get().uri("/api/auto/2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_get_vehicle_by_id() {
    let (app, _store) = setup_test!();

    let req = test::TestRequest::get().uri("/api/auto/3").to_request();
    let vehicle: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(vehicle["marca"], "Ford");
    assert_eq!(vehicle["modelo"], "F-150");
    assert_eq!(vehicle["tipo"], "Pickup");
}

#[actix_web::test]
async fn test_get_unknown_vehicle_is_not_found() {
    let (app, _store) = setup_test!();

    for uri in ["/api/auto/999", "/api/auto/abc"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Auto no encontrado");
    }
}

#[actix_web::test]
async fn test_unauthenticated_appointment_is_rejected_without_row() {
    let (app, store) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/citas")
        .set_json(json!({ "autoId": 1, "fecha": "2024-09-10", "hora": "10:00" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Debes iniciar sesión");

    assert_eq!(count_rows(&store, "appointments").await, 0);
}

#[actix_web::test]
async fn test_book_appointment_enriched_with_vehicle() {
    let (app, _store) = setup_test!();
    let cookie = login_as!(app, "cita@example.com");

    let req = test::TestRequest::post()
        .uri("/api/citas")
        .cookie(cookie)
        .set_json(json!({
            "autoId": 7,
            "fecha": "2024-09-10",
            "hora": "10:00",
            "mensaje": "Quisiera una prueba de manejo",
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    let cita = &body["cita"];
    assert_eq!(cita["auto_id"], 7);
    assert_eq!(cita["fecha"], "2024-09-10");
    assert_eq!(cita["hora"], "10:00");
    assert_eq!(cita["mensaje"], "Quisiera una prueba de manejo");
    assert_eq!(cita["estado"], "Pendiente");
    assert_eq!(cita["marca"], "Mazda");
    assert_eq!(cita["modelo"], "CX-5");
    assert_eq!(cita["precio"], 520_000.0);
    assert!(cita["fecha_creacion"].is_string());
}

#[actix_web::test]
async fn test_book_appointment_without_vehicle() {
    let (app, _store) = setup_test!();
    let cookie = login_as!(app, "general@example.com");

    let req = test::TestRequest::post()
        .uri("/api/citas")
        .cookie(cookie)
        .set_json(json!({ "fecha": "2024-09-11", "hora": "16:30" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let cita = &body["cita"];
    assert!(cita["auto_id"].is_null());
    assert!(cita["marca"].is_null());
    assert_eq!(cita["mensaje"], "");
}

#[actix_web::test]
async fn test_book_appointment_with_invalid_date() {
    let (app, store) = setup_test!();
    let cookie = login_as!(app, "fecha@example.com");

    let req = test::TestRequest::post()
        .uri("/api/citas")
        .cookie(cookie)
        .set_json(json!({ "autoId": 1, "fecha": "mañana", "hora": "10:00" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count_rows(&store, "appointments").await, 0);
}

#[actix_web::test]
async fn test_submit_financing_computes_terms() {
    let (app, _store) = setup_test!();
    let cookie = login_as!(app, "credito@example.com");

    let req = test::TestRequest::post()
        .uri("/api/financiamientos")
        .cookie(cookie)
        .set_json(json!({
            "autoId": 1,
            "enganche": 50000,
            "mensualidades": 48,
            "ocupacion": "Arquitecta",
            "ingresos": 60000,
            "antiguedad": "4 años",
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    let financing = &body["financiamiento"];
    assert_eq!(financing["monto_financiar"], 330_000.0);
    let payment = financing["pago_mensual"].as_f64().unwrap();
    assert!((payment - 8_056.26).abs() < 0.5, "{payment}");
    assert_eq!(financing["mensualidades"], 48);
    assert_eq!(financing["enganche"], 50_000.0);
    assert_eq!(financing["estado"], "Solicitud enviada");
    assert_eq!(financing["ocupacion"], "Arquitecta");
    assert_eq!(financing["marca"], "Toyota");
}

#[actix_web::test]
async fn test_submit_financing_rejects_invalid_terms() {
    let (app, store) = setup_test!();
    let cookie = login_as!(app, "invalido@example.com");

    let cases = [
        (json!({ "autoId": 1, "enganche": 50000, "mensualidades": 0 }), StatusCode::BAD_REQUEST),
        (json!({ "autoId": 1, "enganche": 500000, "mensualidades": 12 }), StatusCode::BAD_REQUEST),
        (json!({ "autoId": 1, "enganche": -1, "mensualidades": 12 }), StatusCode::BAD_REQUEST),
        (json!({ "autoId": 1, "enganche": 0, "mensualidades": -12 }), StatusCode::BAD_REQUEST),
        (json!({ "autoId": 404, "enganche": 0, "mensualidades": 12 }), StatusCode::NOT_FOUND),
    ];

    for (payload, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/api/financiamientos")
            .cookie(cookie.clone())
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected, "{payload}");
    }

    assert_eq!(count_rows(&store, "financing_requests").await, 0);
}

#[actix_web::test]
async fn test_unauthenticated_financing_is_rejected() {
    let (app, store) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/financiamientos")
        .set_json(json!({ "autoId": 1, "enganche": 50000, "mensualidades": 24 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(count_rows(&store, "financing_requests").await, 0);
}

#[actix_web::test]
async fn test_quote_is_public_and_not_persisted() {
    let (app, store) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/financiamientos/cotizacion")
        .set_json(json!({ "autoId": 1, "enganche": 50000, "mensualidades": 48 }))
        .to_request();
    let quote: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(quote["precio"], 380_000.0);
    assert_eq!(quote["tasa_anual"], 0.08);
    assert_eq!(quote["monto_financiar"], 330_000.0);
    let payment = quote["pago_mensual"].as_f64().unwrap();
    assert!((payment - 8_056.26).abs() < 0.5);

    assert_eq!(count_rows(&store, "financing_requests").await, 0);
}

#[actix_web::test]
async fn test_very_long_term_yields_finite_installment() {
    let (app, store) = setup_test!();
    let cookie = login_as!(app, "plazo@example.com");
    let payload = json!({ "autoId": 1, "enganche": 50000, "mensualidades": 200000 });
    let interest_only = 330_000.0 * 0.08 / 12.0;

    let req = test::TestRequest::post()
        .uri("/api/financiamientos/cotizacion")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let quote: serde_json::Value = test::read_body_json(resp).await;
    let payment = quote["pago_mensual"].as_f64().unwrap();
    assert!((payment - interest_only).abs() < 0.01, "{payment}");

    let req = test::TestRequest::post()
        .uri("/api/financiamientos")
        .cookie(cookie)
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let financing = &body["financiamiento"];
    assert_eq!(financing["mensualidades"], 200_000);
    let payment = financing["pago_mensual"].as_f64().unwrap();
    assert!((payment - interest_only).abs() < 0.01, "{payment}");

    assert_eq!(count_rows(&store, "financing_requests").await, 1);
}

#[actix_web::test]
async fn test_profile_requires_session() {
    let (app, _store) = setup_test!();

    let req = test::TestRequest::get().uri("/api/perfil").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_profile_lists_own_records_most_recent_first() {
    let (app, _store) = setup_test!();
    let ana = login_as!(app, "ana@example.com");
    let beto = login_as!(app, "beto@example.com");

    for (vehicle, date) in [(1, "2024-10-01"), (2, "2024-10-02")] {
        let req = test::TestRequest::post()
            .uri("/api/citas")
            .cookie(ana.clone())
            .set_json(json!({ "autoId": vehicle, "fecha": date, "hora": "12:00" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/api/citas")
        .cookie(beto.clone())
        .set_json(json!({ "autoId": 3, "fecha": "2024-10-03", "hora": "12:00" }))
        .to_request();
    test::call_service(&app, req).await;

    for (vehicle, months) in [(4, 24), (5, 36)] {
        let req = test::TestRequest::post()
            .uri("/api/financiamientos")
            .cookie(ana.clone())
            .set_json(json!({ "autoId": vehicle, "enganche": 100000, "mensualidades": months }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/perfil")
        .cookie(ana)
        .to_request();
    let profile: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(profile["usuario"]["email"], "ana@example.com");
    let citas = profile["citas"].as_array().unwrap();
    assert_eq!(citas.len(), 2);
    assert_eq!(citas[0]["auto_id"], 2);
    assert_eq!(citas[1]["auto_id"], 1);

    let financiamientos = profile["financiamientos"].as_array().unwrap();
    assert_eq!(financiamientos.len(), 2);
    assert_eq!(financiamientos[0]["auto_id"], 5);
    assert_eq!(financiamientos[1]["auto_id"], 4);

    let user_id = &profile["usuario"]["id"];
    assert!(citas.iter().all(|c| &c["usuario_id"] == user_id));
    assert!(financiamientos.iter().all(|f| &f["usuario_id"] == user_id));

    let req = test::TestRequest::get()
        .uri("/api/perfil")
        .cookie(beto)
        .to_request();
    let profile: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["citas"].as_array().unwrap().len(), 1);
    assert!(profile["financiamientos"].as_array().unwrap().is_empty());
}
