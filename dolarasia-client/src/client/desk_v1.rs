use anyhow::Result;
use reqwest;

use dolarasia::desk::CreateTransactionRequest;
use dolarasia::identity::RegisterRequest;
use dolarasia_http::http::desk_v1::{
    AuthResponse, Client, DatabaseResponse, InfoResponse, LoginRequest, PreviewResponse,
    RatesResponse, SessionResponse, StatsResponse, TransactionResponse, TransactionsResponse,
};

#[derive(Debug)]
pub struct HttpClient {
    pub path: String,
    pub client: reqwest::Client,
}

impl Client for HttpClient {
    async fn info(&mut self) -> Result<InfoResponse> {
        Ok(self
            .client
            .get(self.path.clone() + "/")
            .send()
            .await?
            .json::<InfoResponse>()
            .await?)
    }

    async fn register(&mut self, request: RegisterRequest) -> Result<AuthResponse> {
        Ok(self
            .client
            .post(self.path.clone() + "/register")
            .json(&request)
            .send()
            .await?
            .json::<AuthResponse>()
            .await?)
    }

    async fn login(&mut self, email: String, credential: String) -> Result<AuthResponse> {
        let req = LoginRequest { email, credential };
        Ok(self
            .client
            .post(self.path.clone() + "/login")
            .json(&req)
            .send()
            .await?
            .json::<AuthResponse>()
            .await?)
    }

    async fn logout(&mut self) -> Result<()> {
        Ok(self
            .client
            .post(self.path.clone() + "/logout")
            .send()
            .await?
            .json::<()>()
            .await?)
    }

    async fn session(&mut self) -> Result<SessionResponse> {
        Ok(self
            .client
            .get(self.path.clone() + "/session")
            .send()
            .await?
            .json::<SessionResponse>()
            .await?)
    }

    async fn rates(&mut self) -> Result<RatesResponse> {
        Ok(self
            .client
            .get(self.path.clone() + "/rates")
            .send()
            .await?
            .json::<RatesResponse>()
            .await?)
    }

    async fn preview(&mut self, request: CreateTransactionRequest) -> Result<PreviewResponse> {
        Ok(self
            .client
            .post(self.path.clone() + "/preview")
            .json(&request)
            .send()
            .await?
            .json::<PreviewResponse>()
            .await?)
    }

    async fn create_transaction(
        &mut self,
        request: CreateTransactionRequest,
    ) -> Result<TransactionResponse> {
        Ok(self
            .client
            .post(self.path.clone() + "/transaction")
            .json(&request)
            .send()
            .await?
            .json::<TransactionResponse>()
            .await?)
    }

    async fn history(&mut self) -> Result<TransactionsResponse> {
        Ok(self
            .client
            .get(self.path.clone() + "/history")
            .send()
            .await?
            .json::<TransactionsResponse>()
            .await?)
    }

    async fn admin_transactions(&mut self) -> Result<TransactionsResponse> {
        Ok(self
            .client
            .get(self.path.clone() + "/admin/transactions")
            .send()
            .await?
            .json::<TransactionsResponse>()
            .await?)
    }

    async fn admin_stats(&mut self) -> Result<StatsResponse> {
        Ok(self
            .client
            .get(self.path.clone() + "/admin/stats")
            .send()
            .await?
            .json::<StatsResponse>()
            .await?)
    }

    async fn admin_database(&mut self) -> Result<DatabaseResponse> {
        Ok(self
            .client
            .get(self.path.clone() + "/admin/database")
            .send()
            .await?
            .json::<DatabaseResponse>()
            .await?)
    }
}

impl HttpClient {
    pub fn new(path: String) -> Self {
        Self {
            path,
            client: reqwest::Client::new(),
        }
    }
}
