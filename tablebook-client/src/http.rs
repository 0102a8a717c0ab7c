// tablebook-client/src/http.rs
// HTTP 客户端 - 预订服务 REST API

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{
    AuthResponse, CreateReservationRequest, ErrorBody, ForgotPasswordRequest, LoginRequest,
    MessageResponse, RegisterRequest, Reservation, ResetPasswordRequest, Restaurant, UserInfo,
};

use crate::error::{ClientError, ClientResult};

/// Remote reservation service.
///
/// Every method maps to exactly one REST call. Non-2xx answers become
/// [`ClientError::Api`] carrying the body's `error` text when there is one.
#[async_trait]
pub trait ReservationApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse>;
    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse>;
    async fn forgot_password(&self, request: &ForgotPasswordRequest)
    -> ClientResult<MessageResponse>;
    async fn reset_password(&self, request: &ResetPasswordRequest) -> ClientResult<MessageResponse>;
    async fn list_restaurants(&self) -> ClientResult<Vec<Restaurant>>;
    async fn get_restaurant(&self, id: &str) -> ClientResult<Restaurant>;
    async fn create_reservation(
        &self,
        token: &str,
        request: &CreateReservationRequest,
    ) -> ClientResult<Reservation>;
    async fn get_user(&self, token: &str, id: &str) -> ClientResult<UserInfo>;
}

/// 网络 HTTP 客户端
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ClientResult<T> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<T> {
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // 非 2xx 一律视为失败，body 形状不可信
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body.error,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Decodes a restaurant listing entry by entry, dropping entries that do
/// not match the model instead of failing the whole listing.
pub fn decode_listing(entries: Vec<serde_json::Value>) -> Vec<Restaurant> {
    let total = entries.len();
    let restaurants: Vec<Restaurant> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Restaurant>(entry) {
            Ok(restaurant) => Some(restaurant),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed restaurant entry");
                None
            }
        })
        .collect();

    if restaurants.len() < total {
        tracing::warn!(
            kept = restaurants.len(),
            skipped = total - restaurants.len(),
            "Restaurant listing contained malformed entries"
        );
    }
    restaurants
}

#[async_trait]
impl ReservationApi for NetworkHttpClient {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.post("/auth/login", request, None).await
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.post("/auth/register", request, None).await
    }

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> ClientResult<MessageResponse> {
        self.post("/auth/forgot-password", request, None).await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ClientResult<MessageResponse> {
        self.post("/auth/reset-password", request, None).await
    }

    async fn list_restaurants(&self) -> ClientResult<Vec<Restaurant>> {
        let entries: Vec<serde_json::Value> = self.get("/api/get-restaurants", None).await?;
        Ok(decode_listing(entries))
    }

    async fn get_restaurant(&self, id: &str) -> ClientResult<Restaurant> {
        self.get(&format!("/api/get-restaurants/{id}"), None).await
    }

    async fn create_reservation(
        &self,
        token: &str,
        request: &CreateReservationRequest,
    ) -> ClientResult<Reservation> {
        self.post("/api/add-reservation", request, Some(token)).await
    }

    async fn get_user(&self, token: &str, id: &str) -> ClientResult<UserInfo> {
        self.get(&format!("/api/users/{id}"), Some(token)).await
    }
}
