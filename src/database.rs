//! MySQL access. One function per statement the handlers run; the pool is
//! the only shared resource, capped at ten connections with waiters queued
//! by the driver.

use sqlx::{
    MySqlPool,
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
};
use tracing::info;

use crate::{
    config::Config,
    models::{Book, BookSubmission, FeedEntry, RegisterPayload, UpdateUserPayload, User},
};

const FEED_LIMIT: u32 = 50;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    password VARCHAR(255) NOT NULL,
    name VARCHAR(100) NOT NULL,
    lib_name VARCHAR(100) NOT NULL,
    theme VARCHAR(32) NOT NULL DEFAULT 'light'
);

CREATE TABLE IF NOT EXISTS books (
    id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
    user_id BIGINT UNSIGNED NOT NULL,
    category VARCHAR(64) NOT NULL DEFAULT '',
    title VARCHAR(255) NOT NULL,
    rating INT NOT NULL DEFAULT 0,
    review TEXT NOT NULL,
    spine_width DOUBLE NOT NULL,
    spine_color VARCHAR(32) NOT NULL DEFAULT '',
    cover_image VARCHAR(255),
    likes INT UNSIGNED NOT NULL DEFAULT 0,
    date VARCHAR(32) NOT NULL DEFAULT '',
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS follows (
    follower_id BIGINT UNSIGNED NOT NULL,
    following_id BIGINT UNSIGNED NOT NULL,
    PRIMARY KEY (follower_id, following_id),
    FOREIGN KEY (follower_id) REFERENCES users(id),
    FOREIGN KEY (following_id) REFERENCES users(id)
);
";

pub async fn init_mysql(config: &Config) -> MySqlPool {
    let options = MySqlConnectOptions::new()
        .host(&config.db_host)
        .username(&config.db_user)
        .password(&config.db_password)
        .database(&config.db_name)
        .port(config.db_port);

    let pool = MySqlPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .expect("Failed to connect to MySQL");

    info!("Connected to MySQL at {}:{}", config.db_host, config.db_port);

    ensure_schema(&pool)
        .await
        .expect("Failed to initialize schema");

    pool
}

pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;

    Ok(())
}

pub async fn insert_user(
    pool: &MySqlPool,
    payload: &RegisterPayload,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (email, password, name, lib_name) VALUES (?, ?, ?, ?)",
    )
    .bind(&payload.email)
    .bind(&payload.password)
    .bind(&payload.name)
    .bind(&payload.lib_name)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

/// Exact-equality credential lookup. Passwords are stored and compared in
/// plaintext.
pub async fn find_user(
    pool: &MySqlPool,
    email: &str,
    password: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, password, name, lib_name, theme
         FROM users WHERE email = ? AND password = ?",
    )
    .bind(email)
    .bind(password)
    .fetch_optional(pool)
    .await
}

pub async fn following_ids(pool: &MySqlPool, user_id: u64) -> Result<Vec<u64>, sqlx::Error> {
    sqlx::query_scalar("SELECT following_id FROM follows WHERE follower_id = ?")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn books_for_user(pool: &MySqlPool, user_id: u64) -> Result<Vec<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_book(
    pool: &MySqlPool,
    submission: &BookSubmission,
    spine_width: f64,
    cover_image: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO books
         (user_id, category, title, rating, review, spine_width, spine_color, cover_image, date)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(submission.user_id)
    .bind(&submission.category)
    .bind(&submission.title)
    .bind(submission.rating)
    .bind(&submission.review)
    .bind(spine_width)
    .bind(&submission.spine_color)
    .bind(cover_image)
    .bind(&submission.date)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

/// Global feed: every user's entries joined with the owner's display
/// fields, newest first, hard-capped. No visibility filtering.
pub async fn feed(pool: &MySqlPool) -> Result<Vec<FeedEntry>, sqlx::Error> {
    sqlx::query_as::<_, FeedEntry>(
        "SELECT b.*, u.name AS user_name, u.lib_name AS library_name
         FROM books b
         JOIN users u ON b.user_id = u.id
         ORDER BY b.created_at DESC
         LIMIT ?",
    )
    .bind(FEED_LIMIT)
    .fetch_all(pool)
    .await
}

/// Unconditional increment; nothing ties a like to a caller.
pub async fn like_book(pool: &MySqlPool, book_id: u64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE books SET likes = likes + 1 WHERE id = ?")
        .bind(book_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// INSERT IGNORE keeps the edge set deduplicated without surfacing the
/// duplicate-key error on repeat follows.
pub async fn insert_follow(
    pool: &MySqlPool,
    follower_id: u64,
    following_id: u64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT IGNORE INTO follows (follower_id, following_id) VALUES (?, ?)")
        .bind(follower_id)
        .bind(following_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn update_user(
    pool: &MySqlPool,
    user_id: u64,
    payload: &UpdateUserPayload,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET lib_name = ?, theme = ? WHERE id = ?")
        .bind(&payload.lib_name)
        .bind(&payload.theme)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(email: &str) -> RegisterPayload {
        RegisterPayload {
            email: email.to_string(),
            password: "pw".to_string(),
            name: "Ada".to_string(),
            lib_name: "Ada's Shelf".to_string(),
        }
    }

    fn entry(user_id: u64, title: &str) -> BookSubmission {
        BookSubmission {
            user_id,
            category: "fiction".to_string(),
            title: title.to_string(),
            rating: 4,
            review: "fine".to_string(),
            spine_color: "#aabbcc".to_string(),
            date: "2026-08-24".to_string(),
        }
    }

    #[sqlx::test]
    async fn test_duplicate_email_rejected(pool: MySqlPool) {
        ensure_schema(&pool).await.unwrap();

        let id = insert_user(&pool, &payload("ada@example.com")).await.unwrap();
        assert!(id > 0);

        assert!(insert_user(&pool, &payload("ada@example.com")).await.is_err());
        assert!(insert_user(&pool, &payload("bab@example.com")).await.is_ok());
    }

    #[sqlx::test]
    async fn test_duplicate_follow_leaves_one_edge(pool: MySqlPool) {
        ensure_schema(&pool).await.unwrap();

        let follower = insert_user(&pool, &payload("a@example.com")).await.unwrap();
        let followee = insert_user(&pool, &payload("b@example.com")).await.unwrap();

        insert_follow(&pool, follower, followee).await.unwrap();
        insert_follow(&pool, follower, followee).await.unwrap();

        assert_eq!(following_ids(&pool, follower).await.unwrap(), vec![followee]);
        assert_eq!(following_ids(&pool, followee).await.unwrap(), Vec::<u64>::new());
    }

    #[sqlx::test]
    async fn test_likes_increment_by_exactly_n(pool: MySqlPool) {
        ensure_schema(&pool).await.unwrap();

        let user_id = insert_user(&pool, &payload("a@example.com")).await.unwrap();
        let book_id = insert_book(&pool, &entry(user_id, "Dune"), 24.0, None)
            .await
            .unwrap();

        for _ in 0..3 {
            like_book(&pool, book_id).await.unwrap();
        }

        let books = books_for_user(&pool, user_id).await.unwrap();
        assert_eq!(books[0].likes, 3);
    }

    #[sqlx::test]
    async fn test_feed_capped_and_newest_first(pool: MySqlPool) {
        ensure_schema(&pool).await.unwrap();

        let user_id = insert_user(&pool, &payload("a@example.com")).await.unwrap();

        for i in 0..55 {
            insert_book(&pool, &entry(user_id, &format!("Book {i}")), 24.0, None)
                .await
                .unwrap();
        }

        let entries = feed(&pool).await.unwrap();
        assert_eq!(entries.len(), 50);

        for pair in entries.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }

        assert_eq!(entries[0].user_name, "Ada");
        assert_eq!(entries[0].library_name, "Ada's Shelf");
    }
}
