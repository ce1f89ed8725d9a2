use std::collections::HashMap;

use axum::extract::Multipart;

use crate::errors::AppError;
use crate::upload::FileUpload;

/// A multipart form read fully into memory: text fields plus at most one file.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<FileUpload>,
}

impl UploadForm {
    /// Reads every part. Only the first part named `file_field` is kept as
    /// the file; a file part with no name and no bytes counts as absent.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == file_field {
                let file_name = field
                    .file_name()
                    .map(String::from)
                    .filter(|n| !n.is_empty());
                let content_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Read error: {e}")))?;

                if form.file.is_none() && !(file_name.is_none() && data.is_empty()) {
                    form.file = Some(FileUpload {
                        file_name,
                        content_type,
                        data,
                    });
                }
            } else if !name.is_empty() {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Read error: {e}")))?;
                form.fields.entry(name).or_insert(text);
            }
        }

        Ok(form)
    }

    /// Trimmed text value, `None` when missing or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(String::from)
    }

    pub fn take_file(&mut self) -> Option<FileUpload> {
        self.file.take()
    }
}

#[cfg(test)]
impl UploadForm {
    pub fn with_fields(pairs: &[(&str, &str)], file: Option<FileUpload>) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file,
        }
    }
}
