//! Multipart form reading for product and store uploads.
//!
//! The browser posts `multipart/form-data`; the text fields are collected by
//! name and at most one file is kept so the handler can forward both to the
//! backend.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::api::types::FileUpload;
use crate::routes::non_empty;

/// Text fields plus the optional file of a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub file: Option<FileUpload>,
}

impl UploadForm {
    /// Read every field of `multipart`. A file input left empty is ignored.
    ///
    /// # Errors
    ///
    /// Returns a message when the body is not valid multipart.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, String> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| format!("Failed to read form: {e}"))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == file_field {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file: {e}"))?;
                if let Some(file_name) = file_name.filter(|n| !n.is_empty())
                    && !bytes.is_empty()
                {
                    form.file = Some(FileUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read {name}: {e}"))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Build a form from already-decoded fields.
    #[cfg(test)]
    pub fn from_fields(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            file: None,
        }
    }

    /// Trimmed value of a field, `None` when missing or blank.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str).and_then(non_empty)
    }

    /// A field that must be present.
    ///
    /// # Errors
    ///
    /// Returns "`label` is required." when the field is blank.
    pub fn required(&self, name: &str, label: &str) -> Result<&str, String> {
        self.text(name).ok_or_else(|| format!("{label} is required."))
    }

    /// A field that must parse as `T`.
    ///
    /// # Errors
    ///
    /// Returns a message naming `label` when the field is blank or invalid.
    pub fn parsed<T: std::str::FromStr>(&self, name: &str, label: &str) -> Result<T, String> {
        self.required(name, label)?
            .parse()
            .map_err(|_| format!("{label} is not valid."))
    }

    /// An optional field that, when present, must parse as `T`.
    ///
    /// # Errors
    ///
    /// Returns a message naming `label` when the field is present but invalid.
    pub fn parsed_opt<T: std::str::FromStr>(
        &self,
        name: &str,
        label: &str,
    ) -> Result<Option<T>, String> {
        self.text(name)
            .map(|v| v.parse().map_err(|_| format!("{label} is not valid.")))
            .transpose()
    }
}
