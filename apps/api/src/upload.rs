//! Multipart form parsing shared by every upload endpoint.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// A file part of a multipart form, kept in memory for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Text fields and files of one multipart request, in submission order.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl UploadForm {
    /// Any part carrying a file name is treated as a file, everything else as text.
    /// Named files are kept even when empty so the caller can report them.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                // A file input left blank is sent with an empty file name.
                Some(file_name) if file_name.trim().is_empty() => continue,
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("Could not read upload '{file_name}': {e}"))
                    })?;
                    form.files.push(UploadedFile { file_name, bytes });
                }
                None => {
                    let value = field.text().await.map_err(|e| {
                        AppError::Validation(format!("Could not read field '{name}': {e}"))
                    })?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed value of a text field; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require_text(&self, name: &str) -> Result<&str, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::Validation(format!("'{name}' is required")))
    }

    pub fn require_files(&self) -> Result<&[UploadedFile], AppError> {
        if self.files.is_empty() {
            return Err(AppError::Validation(
                "Please upload at least one resume (PDF)".to_string(),
            ));
        }
        Ok(&self.files)
    }

    #[cfg(test)]
    pub fn with_fields(fields: &[(&str, &str)], files: Vec<UploadedFile>) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files,
        }
    }
}
