use ripple_api_types::comment::CommentView as ApiCommentView;
use ripple_api_types::post::PostView as ApiPostView;
use ripple_api_types::user::{UserSummary, UserView as ApiUserView};
use ripple_model::comment::CommentView;
use ripple_model::post::PostView;
use ripple_model::user::UserView;
use ripple_model::User;

pub trait IntoApiUserView {
    /// The public rendition, with the account's email withheld.
    #[must_use]
    fn into_api_user_view(self) -> ApiUserView;

    /// The rendition served to the account owner themselves, which
    /// additionally carries their email address.
    #[must_use]
    fn into_api_local_user_view(self) -> ApiUserView;
}

pub trait IntoApiUserSummary {
    #[must_use]
    fn into_api_user_summary(self) -> UserSummary;
}

pub trait IntoApiPostView {
    #[must_use]
    fn into_api_post_view(self) -> ApiPostView;
}

pub trait IntoApiCommentView {
    #[must_use]
    fn into_api_comment_view(self) -> ApiCommentView;
}

impl IntoApiUserView for UserView {
    fn into_api_user_view(self) -> ApiUserView {
        ApiUserView {
            id: self.user.id.0,
            name: self.user.name,
            joined_at: self.user.created,
            email: None,
            display_name: self.user.display_name,
            bio: (!self.profile.bio.is_empty()).then_some(self.profile.bio),
            avatar_url: self.profile.avatar_url,
            followers: self.followers as u64,
            following: self.following as u64,
            posts: self.posts as u64,
        }
    }

    fn into_api_local_user_view(mut self) -> ApiUserView {
        let email = self.user.email.take();
        let mut view = self.into_api_user_view();
        view.email = email;
        view
    }
}

impl IntoApiUserSummary for User {
    fn into_api_user_summary(self) -> UserSummary {
        UserSummary {
            id: self.id.0,
            name: self.name,
            display_name: self.display_name,
        }
    }
}

impl IntoApiPostView for PostView {
    fn into_api_post_view(self) -> ApiPostView {
        ApiPostView {
            id: self.post.id.0,
            created_at: self.post.created,
            last_edited_at: self.post.updated,
            content: self.post.content,
            author: self.author.into_api_user_summary(),
            likes: self.likes as u64,
            comments: self.comments as u64,
        }
    }
}

impl IntoApiCommentView for CommentView {
    fn into_api_comment_view(self) -> ApiCommentView {
        ApiCommentView {
            id: self.comment.id.0,
            post_id: self.comment.post_id.0,
            created_at: self.comment.created,
            content: self.comment.content,
            author: self.author.into_api_user_summary(),
        }
    }
}
