use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited_at: Option<NaiveDateTime>,
    pub content: String,
    pub author: UserSummary,
    pub likes: u64,
    pub comments: u64,
}
