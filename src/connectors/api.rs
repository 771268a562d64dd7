// src/connectors/api.rs
use crate::connectors::messages::{EvaluationQuery, LimitQuery, LoginRequest, LoginResponse};
use crate::connectors::traits::DataSource;
use crate::error::{DashError, DashResult};
use crate::types::{EvaluationResult, Session, SignalEvaluation, Trade};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for the trading backend. Every call fetches fresh data; no
/// caching and no retries happen here.
pub struct ApiClient {
    http_client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> DashResult<Self> {
        // Joining relative paths keeps the base path only with a trailing slash.
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            http_client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: Url::parse(&base)?,
            token,
        })
    }

    pub async fn login(&mut self, email: &str, password: &str) -> DashResult<()> {
        let url = self.endpoint("auth/login", None)?;
        let response = self
            .http_client
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            error!("Login rejected for {} ({})", email, response.status());
            return Err(DashError::Unauthorized);
        }

        let login: LoginResponse = response.json().await?;
        self.token = Some(login.token);
        info!("Authenticated as {}", email);
        Ok(())
    }

    fn endpoint(&self, path: &str, query: Option<String>) -> DashResult<Url> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        if let Some(q) = query {
            url.set_query(Some(&q));
        }
        Ok(url)
    }

    fn encode<Q: Serialize>(query: &Q) -> DashResult<Option<String>> {
        Ok(Some(serde_urlencoded::to_string(query)?))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> DashResult<T> {
        debug!("GET {}", url);
        let mut request = self
            .http_client
            .get(url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> DashResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl DataSource for ApiClient {
    async fn sessions(&self) -> DashResult<Vec<Session>> {
        self.get(self.endpoint("sessions", None)?).await
    }

    async fn session(&self, id: &str) -> DashResult<Session> {
        self.get(self.endpoint(&format!("sessions/{}", id), None)?)
            .await
    }

    async fn trades(&self, session_id: &str, limit: usize) -> DashResult<Vec<Trade>> {
        let url = self.endpoint(
            &format!("trades/session/{}", session_id),
            Self::encode(&LimitQuery { limit })?,
        )?;
        self.get(url).await
    }

    async fn evaluations(
        &self,
        session_id: &str,
        limit: usize,
        result: Option<EvaluationResult>,
    ) -> DashResult<Vec<SignalEvaluation>> {
        let url = self.endpoint(
            &format!("signal-evaluations/session/{}", session_id),
            Self::encode(&EvaluationQuery { limit, result })?,
        )?;
        self.get(url).await
    }
}
