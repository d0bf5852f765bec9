//! Upload and download handlers.

use axum::{
    body::Bytes,
    extract::{Multipart, Query},
    http::header,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;

use super::pages;
use crate::dataset::NoiseDataset;
use crate::error::{AppError, ProcessingError};
use crate::pipeline::{self, ClusterParams};
use crate::plot::PlotOptions;

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"noise_clusters.csv\"";

/// GET / - upload form
pub async fn upload_form() -> Html<String> {
    Html(pages::upload_form())
}

/// Fields collected from the multipart upload.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(String, Bytes)>,
    eps: Option<String>,
    min_samples: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ProcessingError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProcessingError::Upload(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        let filename = field.file_name().map(str::to_string);

        match (name.as_str(), filename) {
            // A "file" part without a filename is a plain form value, not an upload.
            ("file", Some(filename)) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ProcessingError::Upload(e.to_string()))?;
                form.file = Some((filename, data));
            }
            ("eps", _) => {
                form.eps = Some(field.text().await.map_err(|e| ProcessingError::Upload(e.to_string()))?);
            }
            ("min_samples", _) => {
                form.min_samples =
                    Some(field.text().await.map_err(|e| ProcessingError::Upload(e.to_string()))?);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Runs the full pipeline on an uploaded CSV and renders the results page.
pub fn process_upload(
    csv: &[u8],
    eps: Option<&str>,
    min_samples: Option<&str>,
) -> Result<String, ProcessingError> {
    let dataset = NoiseDataset::from_csv(csv)?;
    let params = ClusterParams::from_form(eps, min_samples)?;
    let outcome = pipeline::run(dataset, &params)?;

    let png = outcome.render_png(&PlotOptions::for_parameters(params.eps, params.min_samples))?;
    let csv = outcome.csv()?;

    Ok(pages::results_page(&outcome.summary, &params, &png, &csv))
}

/// POST / - cluster an uploaded CSV
pub async fn upload(multipart: Multipart) -> Result<Html<String>, AppError> {
    let UploadForm { file, eps, min_samples } = read_form(multipart).await?;

    let (filename, data) = file.ok_or(AppError::MissingUpload)?;
    if filename.is_empty() {
        return Err(AppError::EmptyFilename);
    }

    info!("Processing upload '{}' ({} bytes)", filename, data.len());

    let page = tokio::task::spawn_blocking(move || {
        process_upload(&data, eps.as_deref(), min_samples.as_deref())
    })
    .await
    .map_err(|e| ProcessingError::Clustering(format!("worker task failed: {}", e)))??;

    Ok(Html(page))
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    data: Option<String>,
}

/// GET /download?data=... - return previously computed CSV as an attachment
pub async fn download(Query(query): Query<DownloadQuery>) -> Result<Response, AppError> {
    let data = query
        .data
        .filter(|d| !d.is_empty())
        .ok_or(AppError::MissingDownloadData)?;

    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, DOWNLOAD_DISPOSITION),
        ],
        data,
    )
        .into_response())
}
