use serde::{Deserialize, Serialize};

use crate::Sensitive;

/// Publish a new post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "server", derive(bon::Builder))]
#[cfg_attr(feature = "server", builder(on(Sensitive<String>, into)))]
pub struct PublishPost {
    pub content: Sensitive<String>,
}

/// Replace the content of an existing post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "server", derive(bon::Builder))]
#[cfg_attr(feature = "server", builder(on(Sensitive<String>, into)))]
pub struct EditPost {
    pub content: Sensitive<String>,
}

/// A response after a like request. `created` is false when the user
/// had already liked the post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LikePostResponse {
    pub liked: bool,
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UnlikePostResponse {
    pub liked: bool,
    pub removed: bool,
}
