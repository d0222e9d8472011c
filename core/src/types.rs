//! Wire DTOs and outcome types for the Sweetistics API.
//!
//! # Design
//! `Message` is a projection of remote state and only ever deserialized. The
//! outcome types carry a success flag with mutually exclusive payload and
//! reason fields; anything else the service put in the body lands in `extra`
//! so callers keep whatever diagnostics the service sent. Outcomes serialize
//! back to the service's envelope shape (`success`, payload, `error`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::normalize::Envelope;

/// Author of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
}

/// A posted item as returned by the service.
///
/// Only `id`, `text` and `author.username` are required. The remaining fields
/// are read leniently: a value of the wrong shape becomes `None` instead of
/// failing the whole message (and with it the whole timeline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub author: Author,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub retweet_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub in_reply_to_status_id: Option<String>,
}

/// Strings pass through, numbers keep their decimal form, anything else is `None`.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Non-negative integers, truncated floats and numeric strings; otherwise `None`.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Request body for `POST /api/actions/tweet`. The reply target is omitted
/// from the JSON entirely when absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTweet<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_tweet_id: Option<&'a str>,
}

/// Result of a post attempt.
///
/// On success `tweet_id` holds the new identifier when the service sent one;
/// on failure `reason` is always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostOutcome {
    pub success: bool,
    #[serde(rename = "tweetId", skip_serializing_if = "Option::is_none")]
    pub tweet_id: Option<String>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PostOutcome {
    pub fn succeeded(tweet_id: Option<String>) -> Self {
        Self {
            success: true,
            tweet_id,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            tweet_id: None,
            reason: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// `Ok(tweet_id)` on success, `Err(reason)` otherwise.
    pub fn into_result(self) -> Result<Option<String>, String> {
        if self.success {
            Ok(self.tweet_id)
        } else {
            Err(self.reason.unwrap_or_default())
        }
    }
}

/// Result of fetching one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet: Option<Message>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SingleOutcome {
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn into_result(self) -> Result<Message, String> {
        match self.tweet {
            Some(tweet) if self.success => Ok(tweet),
            _ => Err(self.reason.unwrap_or_default()),
        }
    }
}

impl Envelope for SingleOutcome {
    const PAYLOAD_KEY: &'static str = "tweet";
    type Payload = Message;

    fn succeeded(tweet: Message, extra: Map<String, Value>) -> Self {
        Self {
            success: true,
            tweet: Some(tweet),
            reason: None,
            extra,
        }
    }

    fn failed(reason: String, extra: Map<String, Value>) -> Self {
        Self {
            success: false,
            tweet: None,
            reason: Some(reason),
            extra,
        }
    }
}

/// Result of a multi-message fetch (replies, thread, search).
///
/// `tweets` keeps the order the service returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweets: Option<Vec<Message>>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TimelineOutcome {
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn into_result(self) -> Result<Vec<Message>, String> {
        match self.tweets {
            Some(tweets) if self.success => Ok(tweets),
            _ => Err(self.reason.unwrap_or_default()),
        }
    }
}

impl Envelope for TimelineOutcome {
    const PAYLOAD_KEY: &'static str = "tweets";
    type Payload = Vec<Message>;

    fn succeeded(tweets: Vec<Message>, extra: Map<String, Value>) -> Self {
        Self {
            success: true,
            tweets: Some(tweets),
            reason: None,
            extra,
        }
    }

    fn failed(reason: String, extra: Map<String, Value>) -> Self {
        Self {
            success: false,
            tweets: None,
            reason: Some(reason),
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_reads_camel_case_fields() {
        let message: Message = serde_json::from_value(json!({
            "id": "1",
            "text": "hello",
            "author": {"username": "steipete", "name": "Peter"},
            "createdAt": "2025-11-01T10:00:00Z",
            "replyCount": 2,
            "retweetCount": 0,
            "likeCount": 7,
            "conversationId": "1",
            "inReplyToStatusId": "0",
            "unknownField": true
        }))
        .unwrap();
        assert_eq!(message.author.username, "steipete");
        assert_eq!(message.like_count, Some(7));
        assert_eq!(message.in_reply_to_status_id.as_deref(), Some("0"));
    }

    #[test]
    fn message_optional_fields_default_to_none() {
        let message: Message = serde_json::from_value(json!({
            "id": "1",
            "text": "bare",
            "author": {"username": "a", "name": "A"}
        }))
        .unwrap();
        assert!(message.created_at.is_none());
        assert!(message.reply_count.is_none());
        assert!(message.conversation_id.is_none());
    }

    #[test]
    fn odd_optional_fields_become_none() {
        let message: Message = serde_json::from_value(json!({
            "id": "1",
            "text": "odd",
            "author": {"username": "a", "name": null},
            "createdAt": 1730455200,
            "replyCount": -3,
            "retweetCount": "4",
            "likeCount": 1.5,
            "conversationId": 1,
            "inReplyToStatusId": {"id": "0"}
        }))
        .unwrap();
        assert_eq!(message.author.name, None);
        assert_eq!(message.created_at.as_deref(), Some("1730455200"));
        assert_eq!(message.reply_count, None);
        assert_eq!(message.retweet_count, Some(4));
        assert_eq!(message.like_count, Some(1));
        assert_eq!(message.conversation_id.as_deref(), Some("1"));
        assert_eq!(message.in_reply_to_status_id, None);
    }

    #[test]
    fn author_name_may_be_absent() {
        let message: Message = serde_json::from_value(json!({
            "id": "1",
            "text": "t",
            "author": {"username": "a"}
        }))
        .unwrap();
        assert_eq!(message.author.name, None);
        assert_eq!(
            serde_json::to_value(&message.author).unwrap(),
            json!({"username": "a"})
        );
    }

    #[test]
    fn post_body_omits_missing_reply_target() {
        let body = serde_json::to_value(PostTweet {
            text: "hi",
            reply_to_tweet_id: None,
        })
        .unwrap();
        assert_eq!(body, json!({"text": "hi"}));

        let body = serde_json::to_value(PostTweet {
            text: "hi",
            reply_to_tweet_id: Some("42"),
        })
        .unwrap();
        assert_eq!(body, json!({"text": "hi", "replyToTweetId": "42"}));
    }

    #[test]
    fn failed_outcome_serializes_as_envelope() {
        let mut extra = Map::new();
        extra.insert("retryAfter".to_string(), json!(30));
        let outcome = TimelineOutcome::failed("rate limited".to_string(), extra);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": false, "error": "rate limited", "retryAfter": 30})
        );
    }

    #[test]
    fn post_outcome_into_result() {
        assert_eq!(
            PostOutcome::succeeded(Some("9".into())).into_result(),
            Ok(Some("9".to_string()))
        );
        assert_eq!(
            PostOutcome::failed("HTTP 500").into_result(),
            Err("HTTP 500".to_string())
        );
    }
}
