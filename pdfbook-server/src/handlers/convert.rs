//! PDF conversion handler

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use pdfbook_core::{ConversionRequest, ConversionResult};

/// Fields collected from the multipart form
#[derive(Debug, Default)]
struct ConvertForm {
    file: Option<Vec<u8>>,
    target_format: Option<String>,
    title: Option<String>,
    author: Option<String>,
}

impl ConvertForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                    form.file = Some(data.to_vec());
                }
                "target_format" | "title" | "author" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                    match name.as_str() {
                        "target_format" => form.target_format = Some(value),
                        "title" => form.title = Some(value),
                        _ => form.author = Some(value),
                    }
                }
                other => tracing::debug!(field = %other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    fn into_request(self) -> Result<ConversionRequest, ApiError> {
        let pdf = self
            .file
            .filter(|data| !data.is_empty())
            .ok_or_else(|| ApiError::BadRequest("file is required".to_string()))?;
        let target_format = self
            .target_format
            .ok_or_else(|| ApiError::BadRequest("target_format is required".to_string()))?;

        Ok(ConversionRequest {
            pdf,
            target_format,
            title: self.title,
            author: self.author,
        })
    }
}

/// Convert an uploaded PDF
pub async fn convert_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ConversionResult>, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = ConvertForm::read(multipart).await?.into_request()?;

    tracing::info!(
        bytes = request.pdf.len(),
        target_format = %request.target_format,
        "Conversion requested"
    );

    let result = state.service.convert(request).await?;
    if let Some(note) = &result.note {
        tracing::info!(filename = %result.filename, %note, "Conversion finished with note");
    }

    Ok(Json(result))
}
