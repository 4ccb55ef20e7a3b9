use std::path::Path;

use axum::extract::Multipart;
use chrono::Utc;
use rand::Rng;
use tokio::fs;
use tracing::info;

use crate::{error::AppError, models::BookSubmission};

/// Disk name for an uploaded file: epoch millis plus a random suffix, so
/// concurrent uploads never collide, keeping the original extension.
pub fn unique_name(original: &str) -> String {
    let ext = Path::new(original)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);

    format!("{}-{suffix}{ext}", Utc::now().timestamp_millis())
}

/// Drains a book submission form, writing the cover image (if any) under
/// `upload_dir`. Returns the text fields and the stored `/uploads/...` path.
pub async fn parse_book_form(
    mut multipart: Multipart,
    upload_dir: &str,
) -> Result<(BookSubmission, Option<String>), AppError> {
    let mut submission = BookSubmission::default();
    let mut cover_image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::MalformedPayload)?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "coverImage" {
            let original = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|_| AppError::MalformedPayload)?;

            if bytes.is_empty() {
                continue;
            }

            let stored = unique_name(&original);
            fs::write(Path::new(upload_dir).join(&stored), &bytes).await?;

            info!("Stored cover image {stored} ({} bytes)", bytes.len());
            cover_image = Some(format!("/uploads/{stored}"));
            continue;
        }

        let value = field.text().await.map_err(|_| AppError::MalformedPayload)?;

        match name.as_str() {
            "userId" => {
                submission.user_id = value.parse().map_err(|_| AppError::MalformedPayload)?;
            }
            "rating" => {
                submission.rating = value.parse().map_err(|_| AppError::MalformedPayload)?;
            }
            "category" => submission.category = value,
            "title" => submission.title = value,
            "review" => submission.review = value,
            "spineColor" => submission.spine_color = value,
            "date" => submission.date = value,
            _ => {}
        }
    }

    Ok((submission, cover_image))
}
