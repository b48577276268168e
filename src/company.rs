use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::de::{self, DeserializeOwned, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    CompanyError, CompanyService, MappingMerger, MergeStrategy, Merger, ValidationProblem,
    validate_create,
};

///////////////////////////////////////////// CompanyId /////////////////////////////////////////////

/// Store-assigned identifier of a [`Company`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CompanyId(i32);

impl CompanyId {
    /// Wraps a raw identifier.
    pub fn new(id: i32) -> Self {
        CompanyId(id)
    }

    /// The raw identifier.
    pub fn as_i32(self) -> i32 {
        self.0
    }

    /// Accepts an identifier taken from a request path.
    ///
    /// Identifiers are positive and fit a 32-bit column.
    pub fn from_path(raw: i64) -> Result<Self, CompanyError> {
        match i32::try_from(raw) {
            Ok(id) if id > 0 => Ok(CompanyId(id)),
            _ => Err(CompanyError::InvalidId(raw)),
        }
    }
}

impl Display for CompanyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid [`CompanyId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyIdParseError {
    /// Not an integer.
    InvalidFormat,
    /// An integer that is not positive or does not fit 32 bits.
    OutOfRange,
}

impl Display for CompanyIdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CompanyIdParseError::InvalidFormat => write!(f, "Company ID must be an integer"),
            CompanyIdParseError::OutOfRange => {
                write!(f, "Company ID must be between 1 and {}", i32::MAX)
            }
        }
    }
}

impl std::error::Error for CompanyIdParseError {}

impl FromStr for CompanyId {
    type Err = CompanyIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| CompanyIdParseError::InvalidFormat)?;
        CompanyId::from_path(raw).map_err(|_| CompanyIdParseError::OutOfRange)
    }
}

////////////////////////////////////////////// Company //////////////////////////////////////////////

/// A persisted company record.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, companies_derive::FieldWalk,
)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    /// Assigned by the store on creation; never changed by an update.
    #[walk(skip)]
    #[serde(alias = "Id")]
    pub id: CompanyId,
    /// Display name.
    #[serde(alias = "Name")]
    pub name: String,
    /// City of the registered address.
    #[serde(alias = "City")]
    pub city: String,
    /// Street of the registered address.
    #[serde(alias = "Street")]
    pub street: String,
    /// Tax identifier, nine characters when valid.
    #[serde(alias = "Pib")]
    pub pib: String,
    /// Registration number, eight characters when valid.
    #[serde(alias = "MaticniBroj")]
    pub maticni_broj: String,
    /// Whether the company is active.
    #[serde(alias = "IsActive")]
    pub is_active: bool,
}

/// A sparse set of company fields used for creation and partial updates.
///
/// `None`, empty and whitespace-only text all mean "not provided".
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, companies_derive::FieldWalk,
)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    /// Display name.
    #[serde(alias = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// City of the registered address.
    #[serde(alias = "City", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Street of the registered address.
    #[serde(alias = "Street", default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// Tax identifier.
    #[serde(alias = "Pib", default, skip_serializing_if = "Option::is_none")]
    pub pib: Option<String>,
    /// Registration number.
    #[serde(alias = "MaticniBroj", default, skip_serializing_if = "Option::is_none")]
    pub maticni_broj: Option<String>,
    /// Active flag; any provided value is applied.
    #[serde(alias = "IsActive", default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<&CompanyPatch> for Company {
    /// Builds a new record from the meaningful fields of `patch`.
    fn from(patch: &CompanyPatch) -> Self {
        MappingMerger.merge(Company::default(), patch)
    }
}

/////////////////////////////////////////// CompanyBody /////////////////////////////////////////////

const COMPANY_DATA_REQUIRED: &str = "Company data is required.";
const INVALID_COMPANY_DATA: &str = "Invalid company data.";
const INVALID_COMPANY_ID: &str = "Invalid company ID.";
const COMPANY_NOT_FOUND: &str = "Company not found.";

/// Extracts a JSON or YAML request body.
///
/// An empty body, or one holding only `null`, extracts as `None` so each handler can
/// answer it the way its route requires.
pub struct CompanyBody<T>(pub Option<T>);

#[async_trait]
impl<S, T> FromRequest<S> for CompanyBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let content_type = parts
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, INVALID_COMPANY_DATA))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(CompanyBody(None));
        }

        let value = if content_type.contains("yaml") || content_type.contains("yml") {
            serde_yml::from_slice::<Option<T>>(&bytes)
                .map_err(|_| (StatusCode::BAD_REQUEST, INVALID_COMPANY_DATA))?
        } else {
            serde_json::from_slice::<Option<T>>(&bytes)
                .map_err(|_| (StatusCode::BAD_REQUEST, INVALID_COMPANY_DATA))?
        };

        Ok(CompanyBody(value))
    }
}

////////////////////////////////////////////// Errors ///////////////////////////////////////////////

impl IntoResponse for CompanyError {
    fn into_response(self) -> Response {
        match self {
            CompanyError::NotFound(_) => (StatusCode::NOT_FOUND, COMPANY_NOT_FOUND).into_response(),
            CompanyError::InvalidId(_) => {
                (StatusCode::BAD_REQUEST, INVALID_COMPANY_ID).into_response()
            }
            CompanyError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationProblem::from(errors)),
            )
                .into_response(),
            CompanyError::Storage(err) => {
                tracing::error!(error = %err, "company storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal server error: {}", err.message()),
                )
                    .into_response()
            }
        }
    }
}

fn bad_request(message: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

////////////////////////////////////////////// Routes ///////////////////////////////////////////////

/// Response body of a successful create.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCompanyResponse {
    /// Identifier assigned to the new company.
    pub id: CompanyId,
}

/// Query string of a partial update.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PatchParams {
    /// `true` (the default) walks fields by name; `false` uses the mapping table.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub reflection: Option<bool>,
}

/// Accepts `true`/`false` in any letter case, surrounded by optional whitespace.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let flag = raw.trim();
    if flag.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if flag.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(de::Error::invalid_value(
            Unexpected::Str(&raw),
            &"true or false",
        ))
    }
}

async fn list_companies(
    State(service): State<Arc<CompanyService>>,
) -> Result<Response, CompanyError> {
    match service.list_companies().await? {
        Some(companies) => Ok(Json(companies).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn get_company(
    State(service): State<Arc<CompanyService>>,
    Path(id): Path<i64>,
) -> Result<Json<Company>, CompanyError> {
    let id = CompanyId::from_path(id)?;
    Ok(Json(service.get_company(id).await?))
}

async fn create_company(
    State(service): State<Arc<CompanyService>>,
    CompanyBody(patch): CompanyBody<CompanyPatch>,
) -> Result<(StatusCode, Json<CreateCompanyResponse>), Response> {
    let Some(patch) = patch else {
        return Err(bad_request(COMPANY_DATA_REQUIRED));
    };
    if let Err(errors) = validate_create(&patch) {
        tracing::debug!(%errors, "rejected company");
        return Err(CompanyError::Validation(errors).into_response());
    }
    let id = service
        .create_company(&Company::from(&patch))
        .await
        .map_err(IntoResponse::into_response)?;
    Ok((StatusCode::CREATED, Json(CreateCompanyResponse { id })))
}

async fn delete_company(
    State(service): State<Arc<CompanyService>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, CompanyError> {
    let id = CompanyId::from_path(id)?;
    service.delete_company(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn patch_company(
    State(service): State<Arc<CompanyService>>,
    Path(id): Path<i64>,
    Query(params): Query<PatchParams>,
    CompanyBody(patch): CompanyBody<CompanyPatch>,
) -> Result<StatusCode, Response> {
    let (Ok(id), Some(patch)) = (CompanyId::from_path(id), patch) else {
        return Err(bad_request(INVALID_COMPANY_DATA));
    };
    let strategy = MergeStrategy::from_reflection(params.reflection.unwrap_or(true));
    service
        .update_company_by_merge(id, &patch, strategy)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn put_company(
    State(service): State<Arc<CompanyService>>,
    Path(id): Path<i64>,
    CompanyBody(company): CompanyBody<Company>,
) -> Result<StatusCode, Response> {
    let (Ok(id), Some(company)) = (CompanyId::from_path(id), company) else {
        return Err(bad_request(INVALID_COMPANY_DATA));
    };
    service
        .replace_company(id, &company)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(StatusCode::NO_CONTENT)
}

////////////////////////////////////////////// Router ///////////////////////////////////////////////

/// Routes for `/company` and `/company/:id`, to be nested under `/api`.
pub fn create_company_router(service: Arc<CompanyService>) -> Router {
    Router::new()
        .route("/company", get(list_companies).post(create_company))
        .route(
            "/company/:id",
            get(get_company)
                .delete(delete_company)
                .patch(patch_company)
                .put(put_company),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;
    use crate::{DataStoreError, InMemoryCompanyStore, ValidationErrors};

    fn service() -> Arc<CompanyService> {
        Arc::new(CompanyService::new(Arc::new(InMemoryCompanyStore::seeded([
            Company {
                id: CompanyId::new(1),
                name: "Test 1".to_string(),
                ..Company::default()
            },
        ]))))
    }

    fn request(content_type: &str, body: &'static str) -> Request {
        axum::http::Request::builder()
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn company_id_from_path() {
        assert_eq!(CompanyId::from_path(7).unwrap(), CompanyId::new(7));
        assert!(matches!(CompanyId::from_path(0), Err(CompanyError::InvalidId(0))));
        assert!(matches!(CompanyId::from_path(-3), Err(CompanyError::InvalidId(-3))));
        assert!(CompanyId::from_path(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn company_id_parse() {
        assert_eq!("42".parse(), Ok(CompanyId::new(42)));
        assert_eq!(
            "forty-two".parse::<CompanyId>(),
            Err(CompanyIdParseError::InvalidFormat)
        );
        assert_eq!("0".parse::<CompanyId>(), Err(CompanyIdParseError::OutOfRange));
        assert_eq!(CompanyId::new(42).to_string(), "42");
    }

    #[test]
    fn company_serializes_camel_case() {
        let company = Company {
            id: CompanyId::new(3),
            maticni_broj: "12345678".to_string(),
            is_active: true,
            ..Company::default()
        };
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["maticniBroj"], "12345678");
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn patch_accepts_pascal_case() {
        let patch: CompanyPatch = serde_json::from_str(
            r#"{"Name":"New Company","Street":"123 Test Street","MaticniBroj":"12345678","Pib":"123456789"}"#,
        )
        .unwrap();
        assert_eq!(patch.name.as_deref(), Some("New Company"));
        assert_eq!(patch.maticni_broj.as_deref(), Some("12345678"));
        assert_eq!(patch.city, None);
        assert_eq!(patch.is_active, None);
    }

    #[test]
    fn patch_omits_absent_fields() {
        let patch = CompanyPatch {
            city: Some("Beograd".to_string()),
            ..CompanyPatch::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"city":"Beograd"}"#
        );
    }

    #[test]
    fn company_from_patch_skips_blanks() {
        let patch = CompanyPatch {
            name: Some("New Company".to_string()),
            city: Some("  ".to_string()),
            ..CompanyPatch::default()
        };
        let company = Company::from(&patch);
        assert_eq!(company.name, "New Company");
        assert_eq!(company.city, "");
        assert_eq!(company.id, CompanyId::default());
    }

    #[tokio::test]
    async fn body_parses_json() {
        let CompanyBody(patch) = CompanyBody::<CompanyPatch>::from_request(
            request("application/json", r#"{"name":"A"}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(patch.unwrap().name.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn body_parses_yaml() {
        let CompanyBody(patch) = CompanyBody::<CompanyPatch>::from_request(
            request("application/yaml", "name: A\nmaticniBroj: \"12345678\"\n"),
            &(),
        )
        .await
        .unwrap();
        let patch = patch.unwrap();
        assert_eq!(patch.name.as_deref(), Some("A"));
        assert_eq!(patch.maticni_broj.as_deref(), Some("12345678"));
    }

    #[tokio::test]
    async fn empty_and_null_bodies_are_none() {
        for body in ["", "  \n", "null"] {
            let CompanyBody(patch) = CompanyBody::<CompanyPatch>::from_request(
                request("application/json", body),
                &(),
            )
            .await
            .unwrap();
            assert!(patch.is_none(), "{:?}", body);
        }
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let rejection = CompanyBody::<CompanyPatch>::from_request(
            request("application/json", "{not json"),
            &(),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(rejection, (StatusCode::BAD_REQUEST, INVALID_COMPANY_DATA));
    }

    #[tokio::test]
    async fn list_returns_ok_when_companies_exist() {
        let response = list_companies(State(service())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn list_returns_no_content_when_empty() {
        let empty = Arc::new(CompanyService::new(Arc::new(InMemoryCompanyStore::new())));
        let response = list_companies(State(empty)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_valid_id_returns_no_content() {
        let status = delete_company(State(service()), Path(1)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_invalid_id_is_rejected() {
        let err = delete_company(State(service()), Path(0)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_returns_created() {
        let patch = CompanyPatch {
            name: Some("Test Company".to_string()),
            pib: Some("123456789".to_string()),
            maticni_broj: Some("12345678".to_string()),
            ..CompanyPatch::default()
        };
        let (status, Json(created)) = create_company(State(service()), CompanyBody(Some(patch)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.id, CompanyId::new(2));
    }

    #[tokio::test]
    async fn create_without_body_is_bad_request() {
        let response = create_company(State(service()), CompanyBody(None))
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_uses_mapping_when_reflection_is_false() {
        let service = service();
        let patch = CompanyPatch {
            name: Some("Test Company".to_string()),
            ..CompanyPatch::default()
        };
        let status = patch_company(
            State(service.clone()),
            Path(1),
            Query(PatchParams {
                reflection: Some(false),
            }),
            CompanyBody(Some(patch)),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(
            service.get_company(CompanyId::new(1)).await.unwrap().name,
            "Test Company"
        );
    }

    #[tokio::test]
    async fn patch_invalid_input_is_bad_request() {
        let missing_body = patch_company(
            State(service()),
            Path(1),
            Query(PatchParams::default()),
            CompanyBody(None),
        )
        .await
        .unwrap_err();
        assert_eq!(missing_body.status(), StatusCode::BAD_REQUEST);

        let bad_id = patch_company(
            State(service()),
            Path(-1),
            Query(PatchParams::default()),
            CompanyBody(Some(CompanyPatch::default())),
        )
        .await
        .unwrap_err();
        assert_eq!(bad_id.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_missing_company_is_not_found() {
        let response = patch_company(
            State(service()),
            Path(999),
            Query(PatchParams::default()),
            CompanyBody(Some(CompanyPatch::default())),
        )
        .await
        .unwrap_err();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn put_missing_company_is_not_found() {
        let response = put_company(State(service()), Path(999), CompanyBody(Some(Company::default())))
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn reflection_flag_ignores_case() {
        let cases = [
            ("/company/1", None),
            ("/company/1?reflection=true", Some(true)),
            ("/company/1?reflection=False", Some(false)),
            ("/company/1?reflection=TRUE", Some(true)),
            ("/company/1?reflection=%20false%20", Some(false)),
        ];
        for (uri, expected) in cases {
            let uri: axum::http::Uri = uri.parse().unwrap();
            let Query(params) = Query::<PatchParams>::try_from_uri(&uri).unwrap();
            assert_eq!(params.reflection, expected, "{}", uri);
        }

        let uri: axum::http::Uri = "/company/1?reflection=yes".parse().unwrap();
        assert!(Query::<PatchParams>::try_from_uri(&uri).is_err());
    }

    #[tokio::test]
    async fn storage_failure_reports_inner_message() {
        let response =
            CompanyError::Storage(DataStoreError::Internal("connection refused".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Internal server error: connection refused");
    }

    #[test]
    fn error_status_codes() {
        let cases = [
            (CompanyError::NotFound(CompanyId::new(1)), StatusCode::NOT_FOUND),
            (CompanyError::InvalidId(0), StatusCode::BAD_REQUEST),
            (
                CompanyError::Validation(ValidationErrors::new()),
                StatusCode::BAD_REQUEST,
            ),
            (
                CompanyError::Storage(DataStoreError::Internal("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
