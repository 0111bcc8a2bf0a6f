use serde::{Deserialize, Serialize};

use crate::Sensitive;

/// Leave a comment under a post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "server", derive(bon::Builder))]
#[cfg_attr(feature = "server", builder(on(Sensitive<String>, into)))]
pub struct CreateComment {
    pub post_id: i64,
    pub content: Sensitive<String>,
}
