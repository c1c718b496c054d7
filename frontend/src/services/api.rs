use gloo::net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    Asset, Loan, LoanDraft, Location, LoginRequest, LoginResponse, Teacher,
    UpdateLoanStatusRequest,
};
use thiserror::Error;

use crate::services::logging::Logger;
use crate::services::session::SessionStore;

const COMPONENT: &str = "api";

/// Errors raised at the HTTP boundary. A non-2xx response is kept apart from
/// a transport failure so callers can show the server's own message when one
/// exists.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (server down, CORS, offline).
    #[error("No se pudo conectar con el servidor: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("Error del servidor ({status}): {message}")]
    Server { status: u16, message: String },
    /// The server answered 2xx but the body did not match the expected shape.
    #[error("Respuesta del servidor no válida: {0}")]
    Decode(String),
}

/// API client for communicating with the loan service.
///
/// The session store is injected at construction; the bearer header is
/// resolved per request, so a token stored after the client was built is
/// still picked up.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a new API client with the default base URL and the
    /// browser-backed session store.
    pub fn new() -> Self {
        Self::with_session(SessionStore::new())
    }

    /// Create a new API client around an explicit session store.
    pub fn with_session(session: SessionStore) -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            session,
        }
    }

    /// Create a new API client with a custom base URL.
    pub fn with_base_url(base_url: String, session: SessionStore) -> Self {
        Self { base_url, session }
    }

    /// Authenticate against the server. No bearer header; this is the call
    /// that obtains the token in the first place.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/auth/login", self.base_url);

        match Request::post(&url)
            .json(&request)
            .map_err(|e| ApiError::Decode(e.to_string()))?
            .send()
            .await
        {
            Ok(response) => Self::parse(response, "iniciar sesión").await,
            Err(e) => Err(Self::network("iniciar sesión", e)),
        }
    }

    /// Get the entire accessible loan collection.
    pub async fn list_loans(&self) -> Result<Vec<Loan>, ApiError> {
        let url = format!("{}/prestamos", self.base_url);

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => Self::parse(response, "listar préstamos").await,
            Err(e) => Err(Self::network("listar préstamos", e)),
        }
    }

    /// Get the loans where the given user appears as lender or borrower.
    pub async fn list_loans_by_user(&self, user_id: i64) -> Result<Vec<Loan>, ApiError> {
        let url = format!("{}/prestamos/usuario/{}", self.base_url, user_id);

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => Self::parse(response, "listar préstamos por usuario").await,
            Err(e) => Err(Self::network("listar préstamos por usuario", e)),
        }
    }

    /// Get the loans whose asset currently sits at the given location.
    pub async fn list_loans_by_location(&self, location_id: i64) -> Result<Vec<Loan>, ApiError> {
        let url = format!("{}/prestamos/ubicacion/{}", self.base_url, location_id);

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => Self::parse(response, "listar préstamos por ubicación").await,
            Err(e) => Err(Self::network("listar préstamos por ubicación", e)),
        }
    }

    /// Get the loan history of a single asset.
    pub async fn list_loans_by_asset(&self, asset_id: i64) -> Result<Vec<Loan>, ApiError> {
        let url = format!("{}/prestamos/activo/{}", self.base_url, asset_id);

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => Self::parse(response, "listar préstamos por activo").await,
            Err(e) => Err(Self::network("listar préstamos por activo", e)),
        }
    }

    /// Get the loans in a given status. This endpoint is public on the
    /// server, so no bearer header is attached.
    pub async fn list_loans_by_status(&self, status: &str) -> Result<Vec<Loan>, ApiError> {
        let url = format!("{}/prestamos", self.base_url);

        match Request::get(&url).query([("estado", status)]).send().await {
            Ok(response) => Self::parse(response, "listar préstamos por estado").await,
            Err(e) => Err(Self::network("listar préstamos por estado", e)),
        }
    }

    /// Register a new loan. The server assigns the id and returns the full
    /// record, expanded relations included.
    pub async fn create_loan(&self, draft: &LoanDraft) -> Result<Loan, ApiError> {
        let url = format!("{}/prestamos", self.base_url);

        match self
            .authorized(Request::post(&url))
            .json(draft)
            .map_err(|e| ApiError::Decode(e.to_string()))?
            .send()
            .await
        {
            Ok(response) => Self::parse(response, "registrar préstamo").await,
            Err(e) => Err(Self::network("registrar préstamo", e)),
        }
    }

    /// Change the status of an existing loan; returns the updated record.
    pub async fn update_loan_status(&self, id: i64, status: &str) -> Result<Loan, ApiError> {
        let url = format!("{}/prestamos/{}/estado", self.base_url, id);
        let request = UpdateLoanStatusRequest {
            status: status.to_string(),
        };

        match self
            .authorized(Request::patch(&url))
            .json(&request)
            .map_err(|e| ApiError::Decode(e.to_string()))?
            .send()
            .await
        {
            Ok(response) => Self::parse(response, "actualizar estado").await,
            Err(e) => Err(Self::network("actualizar estado", e)),
        }
    }

    /// Delete a loan record. The response body is discarded.
    pub async fn delete_loan(&self, id: i64) -> Result<(), ApiError> {
        let url = format!("{}/prestamos/{}", self.base_url, id);

        match self.authorized(Request::delete(&url)).send().await {
            Ok(response) => {
                if response.ok() {
                    Ok(())
                } else {
                    Err(Self::server_error(response, "eliminar préstamo").await)
                }
            }
            Err(e) => Err(Self::network("eliminar préstamo", e)),
        }
    }

    /// Get the teacher catalog for the borrower picker.
    pub async fn list_teachers(&self) -> Result<Vec<Teacher>, ApiError> {
        let url = format!("{}/docentes", self.base_url);

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => Self::parse(response, "listar docentes").await,
            Err(e) => Err(Self::network("listar docentes", e)),
        }
    }

    /// Get the location catalog for the destination picker.
    pub async fn list_locations(&self) -> Result<Vec<Location>, ApiError> {
        let url = format!("{}/ubicaciones", self.base_url);

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => Self::parse(response, "listar ubicaciones").await,
            Err(e) => Err(Self::network("listar ubicaciones", e)),
        }
    }

    /// Get the asset catalog for the loan form.
    pub async fn list_assets(&self) -> Result<Vec<Asset>, ApiError> {
        let url = format!("{}/activos", self.base_url);

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => Self::parse(response, "listar activos").await,
            Err(e) => Err(Self::network("listar activos", e)),
        }
    }

    /// Attach the bearer header when a session token exists. Requests going
    /// out without a token are left untouched so the server can answer 401.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, ApiError> {
        if !response.ok() {
            return Err(Self::server_error(response, context).await);
        }
        match response.json::<T>().await {
            Ok(data) => Ok(data),
            Err(e) => {
                Logger::error_with_component(
                    COMPONENT,
                    &format!("{}: respuesta ilegible: {}", context, e),
                );
                Err(ApiError::Decode(e.to_string()))
            }
        }
    }

    async fn server_error(response: Response, context: &str) -> ApiError {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Error desconocido".to_string());
        Logger::error_with_component(
            COMPONENT,
            &format!("{} falló con estado {}: {}", context, status, message),
        );
        ApiError::Server { status, message }
    }

    fn network(context: &str, error: gloo::net::Error) -> ApiError {
        Logger::error_with_component(COMPONENT, &format!("{}: sin respuesta: {}", context, error));
        ApiError::Network(error.to_string())
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
