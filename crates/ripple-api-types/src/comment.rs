use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub created_at: NaiveDateTime,
    pub content: String,
    pub author: UserSummary,
}
