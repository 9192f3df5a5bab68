use serde::{Deserialize, Serialize};

/// Shown for users who never uploaded a profile picture.
pub const DEFAULT_AVATAR: &str = "/static/default_pfp.png";

// ── Auth ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: String,
}

impl User {
    /// Username, or `User <id>` for accounts registered without one.
    pub fn display_name(&self) -> String {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("User {}", self.id),
        }
    }

    pub fn avatar_src(&self) -> String {
        match self.profile_picture_url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => DEFAULT_AVATAR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

// ── Posts ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub user_id: i64,
    pub created_at: String,
    pub user: User,
}

// ── Comments ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    pub text: String,
}

// ── Likes ──

/// Response to a like toggle: the viewer's like flag and the post total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCount {
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_JSON: &str = r#"{
        "title": "Sunset",
        "id": 7,
        "image_url": "/uploads/3f2a.jpg",
        "user_id": 2,
        "created_at": "2024-05-01T18:22:04.123456",
        "user": {
            "email": "ana@example.com",
            "id": 2,
            "username": null,
            "profile_picture_url": null,
            "created_at": "2024-04-30T09:00:00"
        }
    }"#;

    #[test]
    fn post_from_api_json() {
        let post: Post = serde_json::from_str(POST_JSON).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.user.id, 2);
        assert!(post.user.username.is_none());
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let mut post: Post = serde_json::from_str(POST_JSON).unwrap();
        assert_eq!(post.user.display_name(), "User 2");

        post.user.username = Some(String::new());
        assert_eq!(post.user.display_name(), "User 2");

        post.user.username = Some("ana".into());
        assert_eq!(post.user.display_name(), "ana");
    }

    #[test]
    fn avatar_falls_back_to_default() {
        let mut post: Post = serde_json::from_str(POST_JSON).unwrap();
        assert_eq!(post.user.avatar_src(), DEFAULT_AVATAR);

        post.user.profile_picture_url = Some("/uploads/pfp_1.png".into());
        assert_eq!(post.user.avatar_src(), "/uploads/pfp_1.png");
    }

    #[test]
    fn register_omits_missing_username() {
        let req = RegisterRequest {
            email: "a@b.c".into(),
            password: "pw".into(),
            username: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("username").is_none());
    }

    #[test]
    fn token_type_is_optional() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.token_type, "");
    }

    #[test]
    fn like_status_from_api_json() {
        let status: LikeStatus = serde_json::from_str(r#"{"liked":true,"count":4}"#).unwrap();
        assert_eq!(status, LikeStatus { liked: true, count: 4 });
    }
}
