use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

use companies::{
    Company, CompanyId, CompanyService, CompanyStore, CreateCompanyResponse, InMemoryCompanyStore,
    create_company_router,
};

fn server_with(store: Arc<InMemoryCompanyStore>) -> TestServer {
    let service = Arc::new(CompanyService::new(store));
    let app = Router::new().nest("/api", create_company_router(service));
    TestServer::new(app).unwrap()
}

fn seeded() -> Arc<InMemoryCompanyStore> {
    Arc::new(InMemoryCompanyStore::seeded([
        Company {
            id: CompanyId::new(1),
            name: "Company A".to_string(),
            city: "Beograd".to_string(),
            street: "Address A".to_string(),
            pib: "123456789".to_string(),
            maticni_broj: "12345678".to_string(),
            is_active: true,
        },
        Company {
            id: CompanyId::new(2),
            name: "Company B".to_string(),
            street: "Address B".to_string(),
            ..Company::default()
        },
    ]))
}

#[tokio::test]
async fn create_then_get_returns_submitted_values() {
    let server = server_with(Arc::new(InMemoryCompanyStore::new()));

    let response = server
        .post("/api/company")
        .json(&json!({
            "Name": "New Company",
            "Street": "123 Test Street",
            "MaticniBroj": "12345678",
            "Pib": "123456789"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body["id"].is_number());
    let created: CreateCompanyResponse = response.json();

    let fetched = server.get(&format!("/api/company/{}", created.id)).await;
    fetched.assert_status_ok();
    let company: Company = fetched.json();
    assert_eq!(
        company,
        Company {
            id: created.id,
            name: "New Company".to_string(),
            street: "123 Test Street".to_string(),
            pib: "123456789".to_string(),
            maticni_broj: "12345678".to_string(),
            ..Company::default()
        }
    );
}

#[tokio::test]
async fn create_empty_object_reports_validation_problem() {
    let store = Arc::new(InMemoryCompanyStore::new());
    let server = server_with(store.clone());

    let response = server.post("/api/company").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let problem: Value = response.json();
    assert_eq!(problem["title"], "One or more validation errors occurred.");
    assert_eq!(problem["status"], 400);
    assert_eq!(problem["errors"]["Name"], json!(["Company name is required"]));
    assert!(
        problem["errors"]["Pib"]
            .as_array()
            .unwrap()
            .contains(&json!("'Pib' must not be empty."))
    );
    assert!(
        problem["errors"]["Pib"]
            .as_array()
            .unwrap()
            .contains(&json!("Pib must be 9 characters long."))
    );
    assert!(
        problem["errors"]["MaticniBroj"]
            .as_array()
            .unwrap()
            .contains(&json!("'Maticni Broj' must not be empty."))
    );
    assert!(
        problem["errors"]["MaticniBroj"]
            .as_array()
            .unwrap()
            .contains(&json!("Maticni broj must be 8 characters long."))
    );
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn create_without_body_is_rejected() {
    let server = server_with(Arc::new(InMemoryCompanyStore::new()));
    let response = server.post("/api/company").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Company data is required.");
}

#[tokio::test]
async fn create_accepts_yaml() {
    let server = server_with(Arc::new(InMemoryCompanyStore::new()));
    let response = server
        .post("/api/company")
        .content_type("application/yaml")
        .bytes("name: Company Y\npib: \"987654321\"\nmaticniBroj: \"87654321\"\nisActive: true\n".into())
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: CreateCompanyResponse = response.json();

    let company: Company = server
        .get(&format!("/api/company/{}", created.id))
        .await
        .json();
    assert_eq!(company.name, "Company Y");
    assert!(company.is_active);
}

#[tokio::test]
async fn list_empty_store_returns_no_content() {
    let server = server_with(Arc::new(InMemoryCompanyStore::new()));
    let response = server.get("/api/company").await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn list_returns_companies_in_insertion_order() {
    let server = server_with(seeded());
    let response = server.get("/api/company").await;
    response.assert_status_ok();
    let companies: Vec<Company> = response.json();
    let names: Vec<&str> = companies.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Company A", "Company B"]);
}

#[tokio::test]
async fn get_unknown_and_invalid_ids() {
    let server = server_with(seeded());

    let missing = server.get("/api/company/999").await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(missing.text(), "Company not found.");

    let invalid = server.get("/api/company/0").await;
    invalid.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(invalid.text(), "Invalid company ID.");
}

#[tokio::test]
async fn delete_existing_then_missing() {
    let store = seeded();
    let server = server_with(store.clone());

    server
        .delete("/api/company/1")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(store.get(CompanyId::new(1)).await.unwrap().is_none());

    let again = server.delete("/api/company/1").await;
    again.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(store.count().await.unwrap(), 1);

    let invalid = server.delete("/api/company/-4").await;
    invalid.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(invalid.text(), "Invalid company ID.");
}

#[tokio::test]
async fn patch_skips_blank_values_with_either_strategy() {
    for reflection in ["true", "false"] {
        let store = seeded();
        let server = server_with(store.clone());

        server
            .patch(&format!("/api/company/2?reflection={}", reflection))
            .json(&json!({"name": "  ", "street": null}))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let company = store.get(CompanyId::new(2)).await.unwrap().unwrap();
        assert_eq!(company.name, "Company B");
        assert_eq!(company.street, "Address B");
    }
}

#[tokio::test]
async fn patch_defaults_to_field_walk_and_applies_values() {
    let store = seeded();
    let server = server_with(store.clone());

    server
        .patch("/api/company/1")
        .json(&json!({"Name": "Updated Company A", "isActive": false}))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let company = store.get(CompanyId::new(1)).await.unwrap().unwrap();
    assert_eq!(company.name, "Updated Company A");
    assert!(!company.is_active);
    assert_eq!(company.street, "Address A");
}

#[tokio::test]
async fn patch_reflection_flag_ignores_case() {
    for reflection in ["False", "True", "TRUE", "false"] {
        let store = seeded();
        let server = server_with(store.clone());

        server
            .patch(&format!("/api/company/1?reflection={}", reflection))
            .json(&json!({"name": "B"}))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let company = store.get(CompanyId::new(1)).await.unwrap().unwrap();
        assert_eq!(company.name, "B", "reflection={}", reflection);
        assert_eq!(company.street, "Address A");
    }

    let server = server_with(seeded());
    server
        .patch("/api/company/1?reflection=maybe")
        .json(&json!({"name": "B"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_error_statuses() {
    let server = server_with(seeded());

    let missing = server
        .patch("/api/company/999")
        .json(&json!({"name": "Non Existent Company"}))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);

    let no_body = server.patch("/api/company/1").await;
    no_body.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(no_body.text(), "Invalid company data.");

    let bad_id = server
        .patch("/api/company/0")
        .json(&json!({"name": "X"}))
        .await;
    bad_id.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.text(), "Invalid company data.");
}

#[tokio::test]
async fn put_replaces_every_field_but_id() {
    let store = seeded();
    let server = server_with(store.clone());

    server
        .put("/api/company/1")
        .json(&json!({"id": 42, "name": "Company Z", "city": ""}))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let company = store.get(CompanyId::new(1)).await.unwrap().unwrap();
    assert_eq!(
        company,
        Company {
            id: CompanyId::new(1),
            name: "Company Z".to_string(),
            ..Company::default()
        }
    );
    assert!(store.get(CompanyId::new(42)).await.unwrap().is_none());
}

#[tokio::test]
async fn put_stores_whitespace_verbatim() {
    let store = seeded();
    let server = server_with(store.clone());

    server
        .put("/api/company/2")
        .json(&json!({"name": "   ", "street": "Address C"}))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let company = store.get(CompanyId::new(2)).await.unwrap().unwrap();
    assert_eq!(company.name, "   ");
    assert_eq!(company.street, "Address C");
    assert_eq!(company.city, "");
}

#[tokio::test]
async fn put_error_statuses() {
    let server = server_with(seeded());

    server
        .put("/api/company/999")
        .json(&json!({"name": "Company Z"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let no_body = server.put("/api/company/1").await;
    no_body.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(no_body.text(), "Invalid company data.");

    let malformed = server
        .put("/api/company/1")
        .json(&json!({"isActive": "yes"}))
        .await;
    malformed.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(malformed.text(), "Invalid company data.");
}
