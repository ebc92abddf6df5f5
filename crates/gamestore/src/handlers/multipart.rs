//! Multipart form reading for the endpoints that accept pictures.

use std::collections::HashMap;

use axum::extract::{multipart::MultipartError, Multipart};

use gamestore_core::store::ValidationError;

use crate::services::PictureUpload;

/// A fully read multipart form: text fields and uploaded files by field name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, PictureUpload>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    form.files
                        .insert(name, PictureUpload::new(file_name, bytes.to_vec()));
                }
                None => {
                    form.fields.insert(name, field.text().await?);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A text field that must be present.
    pub fn require(&self, name: &'static str) -> Result<String, ValidationError> {
        self.text(name)
            .map(str::to_string)
            .ok_or(ValidationError::MissingField(name))
    }

    /// Removes an uploaded file. Empty uploads count as absent.
    pub fn take_file(&mut self, name: &str) -> Option<PictureUpload> {
        self.files.remove(name).filter(|f| !f.bytes.is_empty())
    }
}
