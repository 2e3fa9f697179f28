use axum::extract::{multipart::Field, Multipart};

use crate::{errors::AppError, media::Upload};

fn bad_form(e: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("malformed multipart body: {e}"))
}

/// An empty file part counts as no file.
async fn read_upload(field: Field<'_>) -> Result<Option<Upload>, AppError> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(bad_form)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(Upload {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

/// Reads every part. Parts named in `file_fields` come back as uploads; the rest go to `on_text`.
pub async fn collect<F>(
    mut multipart: Multipart,
    file_fields: &[&str],
    mut on_text: F,
) -> Result<Vec<(String, Upload)>, AppError>
where
    F: FnMut(&str, String),
{
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if file_fields.contains(&name.as_str()) {
            if let Some(upload) = read_upload(field).await? {
                files.push((name, upload));
            }
        } else {
            let value = field.text().await.map_err(bad_form)?;
            on_text(&name, value);
        }
    }
    Ok(files)
}

pub async fn single_file(multipart: Multipart, file_field: &str) -> Result<Option<Upload>, AppError> {
    let files = collect(multipart, &[file_field], |_, _| {}).await?;
    Ok(files.into_iter().next().map(|(_, upload)| upload))
}
