use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// 用户相关类型
/// A user record as returned by the helpdesk directory.
///
/// Only `id` and `name` are interpreted by the relay. Every other attribute is
/// kept in `extra` and written back unchanged when the record is returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: impl Into<Value>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            extra: Map::new(),
        }
    }

    /// Placeholder for a directory entry that does not decode as a user.
    /// It has no name, so lookups pass over it.
    pub fn unreadable(entry: &Value) -> Self {
        Self {
            id: entry.get("id").cloned(),
            name: None,
            extra: Map::new(),
        }
    }

    /// The record id, `null` when the directory omitted it.
    pub fn id_value(&self) -> &Value {
        static NULL: Value = Value::Null;
        self.id.as_ref().unwrap_or(&NULL)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// One page of the paginated user listing, `{ "users": [...] }` on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub users: Vec<User>,
}

impl UserPage {
    /// Decode a listing body. A missing `users` key is an empty page.
    ///
    /// Entries that are not user objects stay on the page as nameless
    /// placeholders, so the page length matches what the directory sent.
    pub fn from_value(body: &Value) -> Self {
        let users = body
            .get("users")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| {
                        serde_json::from_value(entry.clone()).unwrap_or_else(|_| User::unreadable(entry))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { users }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

// 工单相关类型
/// Fields a client may change on a ticket. `message` becomes an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TicketUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.state.is_none()
            && self.priority.is_none()
            && self.group.is_none()
            && self.message.is_none()
    }
}

/// Article attached to an upstream ticket update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticlePayload {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub internal: bool,
    pub content_type: String,
}

/// Body sent upstream by `PUT /tickets/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketUpdatePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<ArticlePayload>,
}

impl TicketUpdatePayload {
    /// Build the upstream update from a client request. The message is
    /// addressed `author -> recipient` when both are known.
    pub fn from_request(
        request: TicketUpdateRequest,
        author: Option<&str>,
        recipient: Option<&str>,
    ) -> Self {
        let article = request.message.map(|body| ArticlePayload {
            body,
            from: author.map(str::to_string),
            to: recipient.map(str::to_string),
            kind: "note".to_string(),
            internal: false,
            content_type: "text/plain".to_string(),
        });

        Self {
            title: request.title,
            state: request.state,
            priority: request.priority,
            group: request.group,
            article,
        }
    }

    pub fn close(author: &str) -> Self {
        Self {
            state: Some("closed".to_string()),
            article: Some(ArticlePayload {
                body: format!("Ticket closed by {}.", author),
                from: Some(author.to_string()),
                to: None,
                kind: "note".to_string(),
                internal: true,
                content_type: "text/plain".to_string(),
            }),
            ..Default::default()
        }
    }
}

/// Upstream ticket article, as listed by `/ticket_articles/by_ticket/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketArticle {
    pub id: Option<Value>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub attachments: Vec<ArticleAttachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleAttachment {
    pub id: Value,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size: Option<Value>,
}

/// A ticket article reshaped for chat and web clients.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TicketMessage {
    pub id: Value,
    pub from: Option<String>,
    pub to: Option<String>,
    pub subject: Option<String>,
    pub body: String,
    pub created_at: Option<String>,
    pub attachments: Vec<ArticleAttachment>,
}

impl TicketArticle {
    /// Whether the article is visible to `recipient`.
    pub fn concerns(&self, recipient: &str) -> bool {
        if self.internal {
            return false;
        }
        let mentions = |field: &Option<String>| {
            field
                .as_deref()
                .map(|value| value.contains(recipient))
                .unwrap_or(false)
        };
        mentions(&self.to) || mentions(&self.from)
    }

    pub fn into_message(self) -> Option<TicketMessage> {
        let id = self.id?;
        Some(TicketMessage {
            id,
            from: self.from,
            to: self.to,
            subject: self.subject,
            body: self.body.unwrap_or_default(),
            created_at: self.created_at,
            attachments: self.attachments,
        })
    }
}

/// Select the articles a recipient may see and reshape them.
pub fn messages_for_recipient(articles: Vec<TicketArticle>, recipient: &str) -> Vec<TicketMessage> {
    articles
        .into_iter()
        .filter(|article| article.concerns(recipient))
        .filter_map(TicketArticle::into_message)
        .collect()
}

/// Attachment content relayed as base64 text.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AttachmentContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub content_type: String,
    pub size: usize,
    pub data: String,
}

// 旧版课程/评论类型
#[derive(Debug, Deserialize)]
pub struct CourseUpdateRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub accepted: Option<Value>,
    #[serde(default)]
    pub editing: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCommentRequest {
    #[serde(default, rename = "courseID")]
    pub course_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "commentID")]
    pub comment_id: Option<Value>,
}

// API 响应类型
/// `{ "error": ... }` body used by every failing route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: Value,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Value::String(message.into()),
        }
    }
}

/// `{ "id": ... }` body returned by write routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdBody {
    pub id: Value,
}

// 错误类型
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UpstreamFetch(String),

    #[error("Upstream responded with status {status}")]
    Upstream { status: u16, error: Value },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure reported by a directory port. The locator treats it as terminal.
#[derive(Debug, thiserror::Error)]
#[error("directory fetch failed: {0}")]
pub struct DirectoryError(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_keeps_unknown_fields() {
        let raw = json!({
            "id": 7,
            "name": "Alice",
            "email": "alice@example.com",
            "preferences": { "locale": "nb-NO" }
        });

        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.display_name(), Some("Alice"));
        assert_eq!(user.extra["email"], "alice@example.com");
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn test_user_without_name_parses() {
        let user: User = serde_json::from_value(json!({ "id": 3 })).unwrap();
        assert_eq!(user.display_name(), None);
    }

    #[test]
    fn test_user_without_id_round_trips_without_id() {
        let raw = json!({ "name": "Alice", "email": "alice@example.com" });
        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.id, None);
        assert_eq!(user.id_value(), &Value::Null);
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn test_user_page_missing_users_is_empty() {
        assert!(UserPage::from_value(&json!({})).is_empty());
        assert!(UserPage::from_value(&json!({ "users": [] })).is_empty());
    }

    #[test]
    fn test_user_page_keeps_unreadable_entries_nameless() {
        let page = UserPage::from_value(&json!({
            "users": [ { "id": 1, "name": "Alice" }, "garbage", { "id": 2, "name": 42 } ]
        }));
        assert_eq!(page.users.len(), 3);
        assert_eq!(page.users[0].display_name(), Some("Alice"));
        assert_eq!(page.users[1].display_name(), None);
        assert_eq!(page.users[1].id, None);
        assert_eq!(page.users[2].display_name(), None);
        assert_eq!(page.users[2].id, Some(json!(2)));
    }

    #[test]
    fn test_page_of_unreadable_entries_is_not_empty() {
        let users: Vec<Value> = (1..=20).map(|i| json!({ "id": i, "name": i })).collect();
        let page = UserPage::from_value(&json!({ "users": users }));
        assert!(!page.is_empty());
        assert_eq!(page.users.len(), 20);
    }

    #[test]
    fn test_ticket_update_addresses_article() {
        let request = TicketUpdateRequest {
            state: Some("open".to_string()),
            message: Some("Any news?".to_string()),
            ..Default::default()
        };

        let payload = TicketUpdatePayload::from_request(request, Some("bot"), Some("alice"));
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["state"], "open");
        assert_eq!(value["article"]["from"], "bot");
        assert_eq!(value["article"]["to"], "alice");
        assert_eq!(value["article"]["type"], "note");
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_ticket_update_without_addresses() {
        let request = TicketUpdateRequest {
            message: Some("hello".to_string()),
            ..Default::default()
        };

        let payload = TicketUpdatePayload::from_request(request, None, None);
        let value = serde_json::to_value(&payload).unwrap();

        assert!(value["article"].get("from").is_none());
        assert!(value["article"].get("to").is_none());
    }

    #[test]
    fn test_close_payload() {
        let value = serde_json::to_value(TicketUpdatePayload::close("kari")).unwrap();
        assert_eq!(value["state"], "closed");
        assert_eq!(value["article"]["body"], "Ticket closed by kari.");
        assert_eq!(value["article"]["internal"], true);
    }

    #[test]
    fn test_messages_for_recipient_filters_and_reshapes() {
        let articles: Vec<TicketArticle> = serde_json::from_value(json!([
            { "id": 1, "from": "support", "to": "alice@example.com", "body": "Hi", "internal": false,
              "attachments": [{ "id": 9, "filename": "log.txt", "size": "120", "preferences": {} }] },
            { "id": 2, "from": "support", "to": "alice@example.com", "body": "secret", "internal": true },
            { "id": 3, "from": "support", "to": "bob@example.com", "body": "Hey" },
            { "from": "alice@example.com", "to": "support", "body": "no id" }
        ]))
        .unwrap();

        let messages = messages_for_recipient(articles, "alice@example.com");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, json!(1));
        assert_eq!(messages[0].body, "Hi");
        assert_eq!(messages[0].attachments[0].filename.as_deref(), Some("log.txt"));
    }
}
