use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const DEFAULT_SEARCH_COUNT: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub username: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub author: Author,
    pub reply_count: u64,
    pub retweet_count: u64,
    pub like_count: u64,
    pub conversation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_status_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTweet {
    pub text: String,
    pub reply_to_tweet_id: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub count: Option<usize>,
}

/// Tweets in insertion order.
pub type Db = Arc<RwLock<Vec<Tweet>>>;

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    db: Db,
}

/// Error envelope returned by every route: `{success:false, error, ...}`.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    BadRequest { message: String, hint: Option<String> },
    NotFound(String),
    /// Body did not decode; answered with axum's own plain-text rejection.
    Rejected(JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, hint) = match self {
            ApiError::Rejected(rejection) => return rejection.into_response(),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "invalid API key".to_string(), None),
            ApiError::BadRequest { message, hint } => (StatusCode::BAD_REQUEST, message, hint),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
        };
        let mut body = json!({"success": false, "error": message});
        if let Some(hint) = hint {
            body["hint"] = Value::String(hint);
        }
        (status, Json(body)).into_response()
    }
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        db: Arc::new(RwLock::new(Vec::new())),
    };
    Router::new()
        .route("/api/actions/tweet", post(post_tweet))
        .route("/api/twitter/tweet/{id}", get(get_tweet))
        .route("/api/twitter/tweet/{id}/replies", get(get_replies))
        .route("/api/twitter/tweet/{id}/thread", get(get_thread))
        .route("/api/twitter/search", get(search))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = format!("Bearer {}", state.api_key);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("tweet not found".to_string())
}

async fn post_tweet(
    State(state): State<AppState>,
    headers: HeaderMap,
    input: Result<Json<PostTweet>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let Json(input) = input.map_err(ApiError::Rejected)?;
    if input.text.trim().is_empty() {
        return Err(ApiError::BadRequest {
            message: "text is required".to_string(),
            hint: None,
        });
    }

    let mut tweets = state.db.write().await;
    let id = Uuid::new_v4().simple().to_string();
    let conversation_id = match &input.reply_to_tweet_id {
        Some(parent_id) => {
            let parent = tweets
                .iter_mut()
                .find(|t| &t.id == parent_id)
                .ok_or_else(|| ApiError::NotFound("reply target not found".to_string()))?;
            parent.reply_count += 1;
            parent.conversation_id.clone()
        }
        None => id.clone(),
    };

    tweets.push(Tweet {
        id: id.clone(),
        text: input.text,
        author: Author {
            username: "mock".to_string(),
            name: "Mock User".to_string(),
        },
        reply_count: 0,
        retweet_count: 0,
        like_count: 0,
        conversation_id,
        in_reply_to_status_id: input.reply_to_tweet_id,
    });
    tracing::info!("stored tweet {id}");

    Ok(Json(json!({"success": true, "tweetId": id})))
}

async fn get_tweet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let tweets = state.db.read().await;
    let tweet = tweets.iter().find(|t| t.id == id).ok_or_else(not_found)?;
    Ok(Json(json!({"success": true, "tweet": tweet})))
}

async fn get_replies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let tweets = state.db.read().await;
    if !tweets.iter().any(|t| t.id == id) {
        return Err(not_found());
    }
    let replies: Vec<&Tweet> = tweets
        .iter()
        .filter(|t| t.in_reply_to_status_id.as_deref() == Some(id.as_str()))
        .collect();
    Ok(Json(json!({"success": true, "tweets": replies})))
}

async fn get_thread(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let tweets = state.db.read().await;
    let root = tweets.iter().find(|t| t.id == id).ok_or_else(not_found)?;
    let thread: Vec<&Tweet> = tweets
        .iter()
        .filter(|t| t.conversation_id == root.conversation_id)
        .collect();
    Ok(Json(json!({"success": true, "tweets": thread})))
}

async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ApiError::BadRequest {
            message: "query is required".to_string(),
            hint: Some("pass ?q=<terms>".to_string()),
        });
    }

    let needle = query.to_lowercase();
    let tweets = state.db.read().await;
    let hits: Vec<&Tweet> = tweets
        .iter()
        .filter(|t| t.text.to_lowercase().contains(&needle))
        .take(params.count.unwrap_or(DEFAULT_SEARCH_COUNT))
        .collect();
    Ok(Json(json!({"success": true, "tweets": hits, "query": query})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweet_serializes_camel_case() {
        let tweet = Tweet {
            id: "1".to_string(),
            text: "Test".to_string(),
            author: Author {
                username: "mock".to_string(),
                name: "Mock User".to_string(),
            },
            reply_count: 2,
            retweet_count: 0,
            like_count: 0,
            conversation_id: "1".to_string(),
            in_reply_to_status_id: None,
        };
        let json = serde_json::to_value(&tweet).unwrap();
        assert_eq!(json["replyCount"], 2);
        assert_eq!(json["conversationId"], "1");
        assert!(json.get("inReplyToStatusId").is_none());
    }

    #[test]
    fn post_tweet_reply_target_is_optional() {
        let input: PostTweet = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert!(input.reply_to_tweet_id.is_none());
        let input: PostTweet =
            serde_json::from_str(r#"{"text":"hi","replyToTweetId":"42"}"#).unwrap();
        assert_eq!(input.reply_to_tweet_id.as_deref(), Some("42"));
    }

    #[test]
    fn post_tweet_rejects_missing_text() {
        let result: Result<PostTweet, _> = serde_json::from_str(r#"{"replyToTweetId":"1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn search_params_are_optional() {
        let params: SearchParams = serde_json::from_str("{}").unwrap();
        assert!(params.q.is_none());
        assert!(params.count.is_none());
    }
}
