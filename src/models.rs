use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row, as stored. Never serialized whole; login flattens the
/// relevant fields into [`LoginResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub name: String,
    pub lib_name: String,
    pub theme: String,
}

/// A library entry. Column names double as the wire field names.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Book {
    pub id: u64,
    pub user_id: u64,
    pub category: String,
    pub title: String,
    pub rating: i32,
    pub review: String,
    pub spine_width: f64,
    pub spine_color: String,
    pub cover_image: Option<String>,
    pub likes: u32,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

/// A feed row: a book joined with its owner's display fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FeedEntry {
    pub id: u64,
    pub user_id: u64,
    pub category: String,
    pub title: String,
    pub rating: i32,
    pub review: String,
    pub spine_width: f64,
    pub spine_color: String,
    pub cover_image: Option<String>,
    pub likes: u32,
    pub date: String,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub library_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    pub name: String,
    pub lib_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: u64,
    pub name: String,
    pub lib_name: String,
    pub email: String,
    pub theme: String,
    pub following: Vec<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooksQuery {
    pub user_id: u64,
}

/// The non-file fields of the book submission form.
#[derive(Debug, Default)]
pub struct BookSubmission {
    pub user_id: u64,
    pub category: String,
    pub title: String,
    pub rating: i32,
    pub review: String,
    pub spine_color: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowPayload {
    pub follower_id: u64,
    pub following_id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub lib_name: String,
    pub theme: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_payload_wire_names() {
        let payload: RegisterPayload = serde_json::from_str(
            r#"{"email":"a@b.c","password":"pw","name":"Ada","libName":"Ada's Shelf"}"#,
        )
        .unwrap();

        assert_eq!(payload.email, "a@b.c");
        assert_eq!(payload.lib_name, "Ada's Shelf");
    }

    #[test]
    fn test_follow_payload_wire_names() {
        let payload: FollowPayload =
            serde_json::from_str(r#"{"followerId":1,"followingId":2}"#).unwrap();

        assert_eq!(payload.follower_id, 1);
        assert_eq!(payload.following_id, 2);
    }

    #[test]
    fn test_login_response_flattened_shape() {
        let response = LoginResponse {
            id: 7,
            name: "Ada".into(),
            lib_name: "Ada's Shelf".into(),
            email: "a@b.c".into(),
            theme: "dark".into(),
            following: vec![2, 5],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["libName"], "Ada's Shelf");
        assert_eq!(json["following"], serde_json::json!([2, 5]));
    }

    #[test]
    fn test_books_query_user_id() {
        let query: BooksQuery = serde_json::from_str(r#"{"userId":42}"#).unwrap();
        assert_eq!(query.user_id, 42);
    }
}
