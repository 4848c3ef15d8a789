//! Minimal REST client helpers for consumers (frontends, tests).

use super::endpoints as ep;
use super::*;
use once_cell::sync::Lazy;
use std::time::Duration;

pub use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("http: {0}")]
    Http(String),
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("serde: {0}")]
    Serde(String),
}

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .tcp_keepalive(Some(Duration::from_secs(180)))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(180))
        .timeout(Duration::from_secs(180))
        .build()
        .expect("failed to build HTTP client")
});

async fn handle_json<T: for<'de> serde::Deserialize<'de>>(
    res: reqwest::Response,
) -> Result<T, RestError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(RestError::Status {
            status: status.as_u16(),
            body,
        });
    }
    res.json::<T>()
        .await
        .map_err(|e| RestError::Serde(e.to_string()))
}

pub async fn signup(base: &str, req: &SignupReq) -> Result<MessageResp, RestError> {
    let res = HTTP_CLIENT
        .post(ep::signup(base))
        .json(req)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn login(base: &str, req: &LoginReq) -> Result<MessageResp, RestError> {
    let res = HTTP_CLIENT
        .post(ep::login(base))
        .json(req)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn add_child(base: &str, req: &AddChildReq) -> Result<MessageResp, RestError> {
    let res = HTTP_CLIENT
        .post(ep::add_child(base))
        .json(req)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn save_activity(base: &str, req: &SaveActivityReq) -> Result<MessageResp, RestError> {
    let res = HTTP_CLIENT
        .post(ep::save_activity(base))
        .json(req)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn view_report(base: &str, child_name: &str) -> Result<ReportResp, RestError> {
    let res = HTTP_CLIENT
        .get(ep::view_report(base, child_name))
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn list_children(base: &str, parent_email: &str) -> Result<Vec<String>, RestError> {
    let res = HTTP_CLIENT
        .get(ep::children(base, parent_email))
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}
