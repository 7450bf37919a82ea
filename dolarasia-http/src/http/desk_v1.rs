use std::future::Future;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use dolarasia::desk::{
    ConversionPreview, CreateTransactionRequest, DatabaseDump, Desk, DeskError,
};
use dolarasia::identity::{RegisterRequest, SessionUser};
use dolarasia::ledger::{LedgerStats, Transaction};
use dolarasia::rates::ExchangeRate;
use dolarasia::store::{DirStorage, MemoryStorage, StorageBackend};

pub type DeskBackend = Box<dyn StorageBackend + Send>;

pub struct AppState {
    pub desk: Desk<DeskBackend>,
}

impl AppState {
    /// In-memory state, gone when the process exits.
    pub fn single() -> Self {
        let backend: DeskBackend = Box::new(MemoryStorage::new());
        Self {
            desk: Desk::new(backend),
        }
    }

    /// File-backed state so sessions and records survive a restart.
    pub fn with_dir(root: impl Into<PathBuf>) -> Self {
        let backend: DeskBackend = Box::new(DirStorage::new(root));
        Self {
            desk: Desk::new(backend),
        }
    }
}

type DeskState = Mutex<AppState>;

#[derive(Debug, Display, Error)]
#[display("{_0}")]
pub struct ApiError(DeskError);

impl From<DeskError> for ApiError {
    fn from(value: DeskError) -> Self {
        ApiError(value)
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self.0 {
            DeskError::DuplicateEmail
            | DeskError::Validation(_)
            | DeskError::RateUnavailable => actix_web::http::StatusCode::BAD_REQUEST,
            DeskError::InvalidCredentials | DeskError::NotAuthenticated => {
                actix_web::http::StatusCode::UNAUTHORIZED
            }
            DeskError::NotAuthorized => actix_web::http::StatusCode::FORBIDDEN,
            DeskError::StorageCorrupt(_) | DeskError::Storage(_) => {
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub credential: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AuthResponse {
    pub user: SessionUser,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SessionResponse {
    pub user: Option<SessionUser>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RatesResponse {
    pub rates: Vec<ExchangeRate>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PreviewResponse {
    pub preview: ConversionPreview,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StatsResponse {
    pub stats: LedgerStats,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DatabaseResponse {
    pub database: DatabaseDump,
}

/// The desk API as clients see it. Implementations live outside this crate,
/// the reference one in dolarasia-client.
pub trait Client {
    fn info(&mut self) -> impl Future<Output = Result<InfoResponse>>;
    fn register(&mut self, request: RegisterRequest) -> impl Future<Output = Result<AuthResponse>>;
    fn login(
        &mut self,
        email: String,
        credential: String,
    ) -> impl Future<Output = Result<AuthResponse>>;
    fn logout(&mut self) -> impl Future<Output = Result<()>>;
    fn session(&mut self) -> impl Future<Output = Result<SessionResponse>>;
    fn rates(&mut self) -> impl Future<Output = Result<RatesResponse>>;
    fn preview(
        &mut self,
        request: CreateTransactionRequest,
    ) -> impl Future<Output = Result<PreviewResponse>>;
    fn create_transaction(
        &mut self,
        request: CreateTransactionRequest,
    ) -> impl Future<Output = Result<TransactionResponse>>;
    fn history(&mut self) -> impl Future<Output = Result<TransactionsResponse>>;
    fn admin_transactions(&mut self) -> impl Future<Output = Result<TransactionsResponse>>;
    fn admin_stats(&mut self) -> impl Future<Output = Result<StatsResponse>>;
    fn admin_database(&mut self) -> impl Future<Output = Result<DatabaseResponse>>;
}

pub mod server {
    use actix_web::{get, post, web};

    use dolarasia::desk::CreateTransactionRequest;
    use dolarasia::identity::RegisterRequest;

    use super::{
        ApiError, AuthResponse, DatabaseResponse, DeskState, InfoResponse, LoginRequest,
        PreviewResponse, RatesResponse, SessionResponse, StatsResponse, TransactionResponse,
        TransactionsResponse,
    };

    #[get("/")]
    pub async fn info() -> web::Json<InfoResponse> {
        web::Json(InfoResponse {
            version: "v1".to_string(),
            name: "dolarasia".to_string(),
        })
    }

    #[post("/register")]
    pub async fn register(
        app: web::Data<DeskState>,
        request: web::Json<RegisterRequest>,
    ) -> Result<web::Json<AuthResponse>, ApiError> {
        let mut state = app.lock().unwrap();
        let user = state.desk.register(&request)?;
        Ok(web::Json(AuthResponse { user }))
    }

    #[post("/login")]
    pub async fn login(
        app: web::Data<DeskState>,
        request: web::Json<LoginRequest>,
    ) -> Result<web::Json<AuthResponse>, ApiError> {
        let mut state = app.lock().unwrap();
        let user = state.desk.login(&request.email, &request.credential)?;
        Ok(web::Json(AuthResponse { user }))
    }

    #[post("/logout")]
    pub async fn logout(app: web::Data<DeskState>) -> web::Json<()> {
        let mut state = app.lock().unwrap();
        state.desk.logout();
        web::Json(())
    }

    #[get("/session")]
    pub async fn session(app: web::Data<DeskState>) -> web::Json<SessionResponse> {
        let state = app.lock().unwrap();
        web::Json(SessionResponse {
            user: state.desk.session().current().cloned(),
        })
    }

    #[get("/rates")]
    pub async fn rates(app: web::Data<DeskState>) -> web::Json<RatesResponse> {
        let mut state = app.lock().unwrap();
        web::Json(RatesResponse {
            rates: state.desk.fetch_rates(),
        })
    }

    #[post("/preview")]
    pub async fn preview(
        app: web::Data<DeskState>,
        request: web::Json<CreateTransactionRequest>,
    ) -> Result<web::Json<PreviewResponse>, ApiError> {
        let state = app.lock().unwrap();
        let preview = state.desk.preview(&request)?;
        Ok(web::Json(PreviewResponse { preview }))
    }

    #[post("/transaction")]
    pub async fn create_transaction(
        app: web::Data<DeskState>,
        request: web::Json<CreateTransactionRequest>,
    ) -> Result<web::Json<TransactionResponse>, ApiError> {
        let mut state = app.lock().unwrap();
        let transaction = state.desk.create_transaction(&request)?;
        Ok(web::Json(TransactionResponse { transaction }))
    }

    #[get("/history")]
    pub async fn history(
        app: web::Data<DeskState>,
    ) -> Result<web::Json<TransactionsResponse>, ApiError> {
        let state = app.lock().unwrap();
        let transactions = state.desk.history()?;
        Ok(web::Json(TransactionsResponse { transactions }))
    }

    #[get("/admin/transactions")]
    pub async fn admin_transactions(
        app: web::Data<DeskState>,
    ) -> Result<web::Json<TransactionsResponse>, ApiError> {
        let state = app.lock().unwrap();
        let transactions = state.desk.admin_transactions()?;
        Ok(web::Json(TransactionsResponse { transactions }))
    }

    #[get("/admin/stats")]
    pub async fn admin_stats(
        app: web::Data<DeskState>,
    ) -> Result<web::Json<StatsResponse>, ApiError> {
        let state = app.lock().unwrap();
        let stats = state.desk.admin_stats()?;
        Ok(web::Json(StatsResponse { stats }))
    }

    #[get("/admin/database")]
    pub async fn admin_database(
        app: web::Data<DeskState>,
    ) -> Result<web::Json<DatabaseResponse>, ApiError> {
        let state = app.lock().unwrap();
        let database = state.desk.admin_database()?;
        Ok(web::Json(DatabaseResponse { database }))
    }
}
