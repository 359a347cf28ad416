pub mod comments;
pub mod health;
pub mod subscriptions;
pub mod users;
pub mod videos;

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::TryStreamExt;

use crate::error::{AppError, Result};

/// Upper bound on a single multipart upload.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A fully-buffered multipart form: text fields and file parts by name.
#[derive(Debug, Default)]
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub fn text(&self, name: &str) -> Result<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Validation(format!("{name} is required")))
    }

    pub fn optional_text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn file(&self, name: &str) -> Result<&UploadedFile> {
        self.files
            .get(name)
            .ok_or_else(|| AppError::Validation(format!("{name} file is required")))
    }

    pub fn optional_file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }
}

/// Drain a multipart request into memory, splitting parts into text fields
/// and files on the presence of a filename.
pub async fn collect_form(mut payload: Multipart) -> Result<FormData> {
    let mut form = FormData::default();
    let mut total: usize = 0;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart payload: {e}")))?
    {
        let (name, filename) = {
            let disposition = field.content_disposition();
            let name = match disposition.get_name() {
                Some(name) => name.to_string(),
                None => continue,
            };
            (name, disposition.get_filename().map(str::to_string))
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read multipart part: {e}")))?
        {
            total += chunk.len();
            if total > MAX_UPLOAD_BYTES {
                return Err(AppError::Validation("upload too large".to_string()));
            }
            bytes.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) => {
                form.files.insert(name, UploadedFile { filename, bytes });
            }
            None => {
                let value = String::from_utf8(bytes).map_err(|_| {
                    AppError::Validation(format!("field {name} is not valid UTF-8"))
                })?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}
