//! Multipart upload handling: pick out the `file` part and validate it as a PDF.
//!
//! Bytes stay in memory and are dropped once the pipeline has read them.

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

const FILE_FIELD: &str = "file";

#[derive(Debug)]
pub struct UploadedPdf {
    pub filename: String,
    pub bytes: Bytes,
}

/// Reads the `file` part of the form. Other parts are ignored.
pub async fn read_pdf_upload(multipart: &mut Multipart) -> Result<UploadedPdf, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = sanitize_filename(field.file_name().unwrap_or_default());
        if filename.is_empty() {
            return Err(AppError::Validation("No selected file".to_string()));
        }
        if !filename.to_ascii_lowercase().ends_with(".pdf") {
            return Err(AppError::Validation(
                "Invalid file type. Please upload a PDF file.".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;

        return Ok(UploadedPdf { filename, bytes });
    }

    Err(AppError::Validation("No file part".to_string()))
}

/// Keeps only the final path component, replaces anything outside
/// `[A-Za-z0-9._-]` with `_`, and strips leading dots.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_drops_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_filename(r"C:\Users\jane\cv.pdf"), "cv.pdf");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("Jane Doe résumé.PDF"), "Jane_Doe_r_sum_.PDF");
    }

    #[test]
    fn test_sanitize_strips_leading_dots() {
        assert_eq!(sanitize_filename(".hidden.pdf"), "hidden.pdf");
        assert_eq!(sanitize_filename(""), "");
    }
}
