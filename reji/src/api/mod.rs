use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use protocol::{Contestant, OptionState, RawQuestion, SpinResult};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("api unreachable: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected api reply: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Schema(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The game api the console drives: contestant store, wheel, question bank
/// and the persisted stage-2 statement states.
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn list_contestants(&self) -> ApiResult<Vec<Contestant>>;
    async fn create_contestant(&self, name: &str, photo: Option<&str>) -> ApiResult<u32>;
    /// Returns the new score.
    async fn adjust_score(&self, id: u32, delta: i32) -> ApiResult<i32>;
    async fn eliminate(&self, id: u32) -> ApiResult<()>;
    async fn delete_contestant(&self, id: u32) -> ApiResult<()>;
    async fn spin_wheel(&self, stage: u8) -> ApiResult<SpinResult>;
    async fn fetch_question(&self, stage: u8, token: &str) -> ApiResult<RawQuestion>;
    async fn set_stage2_option_state(&self, index: usize, state: OptionState) -> ApiResult<()>;
    async fn reset_stage2_options(&self) -> ApiResult<()>;
    async fn reset_game(&self) -> ApiResult<()>;
}

pub struct HttpApi {
    base: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct Created {
    id: u32,
}

#[derive(Deserialize)]
struct Scored {
    new_score: i32,
}

#[derive(Deserialize)]
struct Fetched {
    question: RawQuestion,
}

impl HttpApi {
    pub fn new(base: impl ToString) -> Self {
        Self {
            base: base.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        let resp = self.client.get(self.url(path)).send().await?;
        unwrap_reply(resp.json().await?)
    }

    async fn post<R: DeserializeOwned>(&self, path: &str, body: Value) -> ApiResult<R> {
        let resp = self.client.post(self.url(path)).json(&body).send().await?;
        unwrap_reply(resp.json().await?)
    }

    async fn delete<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        let resp = self.client.delete(self.url(path)).send().await?;
        unwrap_reply(resp.json().await?)
    }
}

/// Every api reply is either a bare payload or an object carrying
/// `success`, `error` and, for a broken database, `schema_error`.
fn unwrap_reply<R: DeserializeOwned>(body: Value) -> ApiResult<R> {
    if let Some(obj) = body.as_object() {
        let error = obj.get("error").and_then(Value::as_str).unwrap_or("unknown api error").to_string();
        if obj.get("schema_error").and_then(Value::as_bool).unwrap_or(false) {
            return Err(ApiError::Schema(error));
        }
        match obj.get("success").and_then(Value::as_bool) {
            Some(false) => return Err(ApiError::Rejected(error)),
            None if obj.contains_key("error") => return Err(ApiError::Rejected(error)),
            _ => {}
        }
    }
    Ok(serde_json::from_value(body)?)
}

#[async_trait]
impl GameApi for HttpApi {
    async fn list_contestants(&self) -> ApiResult<Vec<Contestant>> {
        self.get("/api/contestants").await
    }

    async fn create_contestant(&self, name: &str, photo: Option<&str>) -> ApiResult<u32> {
        let created: Created = self.post("/api/contestants", json!({ "name": name, "photo": photo })).await?;
        Ok(created.id)
    }

    async fn adjust_score(&self, id: u32, delta: i32) -> ApiResult<i32> {
        let scored: Scored = self.post(&format!("/api/contestants/{}/score", id), json!({ "points": delta })).await?;
        Ok(scored.new_score)
    }

    async fn eliminate(&self, id: u32) -> ApiResult<()> {
        let _: Value = self.post(&format!("/api/contestants/{}/eliminate", id), json!({})).await?;
        Ok(())
    }

    async fn delete_contestant(&self, id: u32) -> ApiResult<()> {
        let _: Value = self.delete(&format!("/api/contestants/{}", id)).await?;
        Ok(())
    }

    async fn spin_wheel(&self, stage: u8) -> ApiResult<SpinResult> {
        self.post("/api/wheel-spin", json!({ "stage": stage, "user_id": "reji" })).await
    }

    async fn fetch_question(&self, stage: u8, token: &str) -> ApiResult<RawQuestion> {
        let fetched: Fetched = self.get(&format!("/api/questions/{}/{}", stage, token)).await?;
        Ok(fetched.question)
    }

    async fn set_stage2_option_state(&self, index: usize, state: OptionState) -> ApiResult<()> {
        let _: Value = self.post("/api/stage2/option-state", json!({ "optionIndex": index, "state": state })).await?;
        Ok(())
    }

    async fn reset_stage2_options(&self) -> ApiResult<()> {
        let _: Value = self.post("/api/stage2/reset-options", json!({})).await?;
        Ok(())
    }

    async fn reset_game(&self) -> ApiResult<()> {
        let _: Value = self.post("/api/reset-game", json!({})).await?;
        Ok(())
    }
}
