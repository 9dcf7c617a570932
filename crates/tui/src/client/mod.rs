use api_types::{
    auth::{
        AuthResponse, LoginRequest, Profile, RegisterRequest, ResetPasswordRequest,
        VerifyOtpRequest,
    },
    shipment::{PageQuery, PageResult, Shipment, ShipmentFilter, ShipmentRequest},
};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::{AppError, Result};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("session expired, please log in again")]
    Unauthorized,
    #[error("access denied")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("server unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Text for a toast: the server's own message when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Conflict(message) | Self::Validation(message) | Self::Server(message)
                if message != UNKNOWN_ERROR =>
            {
                message.clone()
            }
            Self::Unauthorized => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

const UNKNOWN_ERROR: &str = "unknown error";

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Thin client over the shipment backend.
///
/// Cookies set by `/login` are kept in the client's jar and replayed on
/// every following request, so clones share the same session.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        // Without the trailing slash `Url::join` would drop the last path
        // segment (e.g. `/api`).
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)
            .map_err(|err| AppError::InvalidConfig(format!("invalid base_url: {err}")))?;
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::InvalidUrl(err.to_string()))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> std::result::Result<T, ClientError> {
        let res = req.send().await?;
        if res.status().is_success() {
            return Ok(res.json::<T>().await?);
        }
        Err(error_from_response(res).await)
    }

    async fn send_unit(&self, req: RequestBuilder) -> std::result::Result<(), ClientError> {
        let res = req.send().await?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(error_from_response(res).await)
    }

    pub async fn list_shipments(
        &self,
        query: &PageQuery,
    ) -> std::result::Result<PageResult<Shipment>, ClientError> {
        let endpoint = self.endpoint("shipments")?;
        tracing::debug!(page = query.page, size = query.size, "listing shipments");
        self.send_json(self.http.get(endpoint).query(query)).await
    }

    pub async fn filter_shipments(
        &self,
        query: &PageQuery,
        filter: &ShipmentFilter,
    ) -> std::result::Result<PageResult<Shipment>, ClientError> {
        let endpoint = self.endpoint("shipments/filter")?;
        tracing::debug!(page = query.page, size = query.size, ?filter, "filtering shipments");
        self.send_json(self.http.post(endpoint).query(query).json(filter))
            .await
    }

    pub async fn get_shipment(&self, id: i64) -> std::result::Result<Shipment, ClientError> {
        let endpoint = self.endpoint(&format!("shipments/{id}"))?;
        self.send_json(self.http.get(endpoint)).await
    }

    pub async fn create_shipment(
        &self,
        payload: &ShipmentRequest,
    ) -> std::result::Result<Shipment, ClientError> {
        let endpoint = self.endpoint("shipments")?;
        self.send_json(self.http.post(endpoint).json(payload)).await
    }

    pub async fn update_shipment(
        &self,
        id: i64,
        payload: &ShipmentRequest,
    ) -> std::result::Result<Shipment, ClientError> {
        let endpoint = self.endpoint(&format!("shipments/{id}"))?;
        self.send_json(self.http.put(endpoint).json(payload)).await
    }

    pub async fn delete_shipment(&self, id: i64) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint(&format!("shipments/{id}"))?;
        self.send_unit(self.http.delete(endpoint)).await
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<AuthResponse, ClientError> {
        let endpoint = self.endpoint("login")?;
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.http.post(endpoint).json(&payload)).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> std::result::Result<Profile, ClientError> {
        let endpoint = self.endpoint("register")?;
        let payload = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.http.post(endpoint).json(&payload)).await
    }

    pub async fn logout(&self) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint("logout")?;
        self.send_unit(self.http.post(endpoint)).await
    }

    /// An anonymous caller may get 401/403 instead of `false`, both mean
    /// "no session".
    pub async fn is_authenticated(&self) -> std::result::Result<bool, ClientError> {
        let endpoint = self.endpoint("is-authenticated")?;
        match self.send_json::<bool>(self.http.get(endpoint)).await {
            Ok(flag) => Ok(flag),
            Err(ClientError::Unauthorized | ClientError::Forbidden) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn profile(&self) -> std::result::Result<Profile, ClientError> {
        let endpoint = self.endpoint("profile")?;
        self.send_json(self.http.get(endpoint)).await
    }

    pub async fn send_verify_otp(&self) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint("send-otp")?;
        self.send_unit(self.http.post(endpoint)).await
    }

    pub async fn verify_otp(&self, otp: &str) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint("verify-otp")?;
        let payload = VerifyOtpRequest {
            otp: otp.to_string(),
        };
        self.send_unit(self.http.post(endpoint).json(&payload)).await
    }

    pub async fn send_reset_otp(&self, email: &str) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint("send-reset-otp")?;
        self.send_unit(self.http.post(endpoint).query(&[("email", email)]))
            .await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint("reset-password")?;
        let payload = ResetPasswordRequest {
            email: email.to_string(),
            otp: otp.to_string(),
            new_password: new_password.to_string(),
        };
        self.send_unit(self.http.post(endpoint).json(&payload)).await
    }
}

async fn error_from_response(res: reqwest::Response) -> ClientError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|err| err.message)
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

    tracing::warn!(%status, message = %body, "request failed");

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::CONFLICT => ClientError::Conflict(body),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(body)
        }
        _ => ClientError::Server(body),
    }
}
