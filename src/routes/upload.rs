use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::constants::ERR_NO_FILE;
use crate::error::{AppError, Result};
use crate::ingest::read_csv_file;
use crate::models::{FileKind, UploadedFile};
use crate::sql::{default_table_name, generate_script, infer_columns};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub default_table_name: String,
    pub sql: String,
}

/// Accept one file and turn it into a SQL script
///
/// `.csv` goes through schema inference and generation, images go through the
/// OCR collaborator, anything else is rejected before it touches disk. The
/// script is also written to `<uploads>/<defaultTableName>.sql`.
///
/// POST /api/upload (multipart, field `file`)
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let (original_name, bytes) = receive_single_file(&mut multipart).await?;

    let uploads_dir = &state.config.uploads_dir;
    let file = UploadedFile::new(uploads_dir, &original_name, Utc::now().timestamp_millis());

    let kind = file.kind();
    if kind == FileKind::Unsupported {
        tracing::warn!("Rejected upload with unsupported type: {}", file.original_name);
        return Err(AppError::unsupported_file_type());
    }

    tokio::fs::write(&file.path, &bytes).await?;
    tracing::info!("Uploaded file stored at {:?} ({} bytes)", file.path, bytes.len());

    let table_name = default_table_name(file.stem());

    let (sql, message) = match kind {
        FileKind::Csv => (
            csv_to_sql(&file, &table_name).await?,
            "File uploaded and SQL generated. Provide a table name to execute the query.",
        ),
        FileKind::Image => (
            image_to_sql(&state, &file, &table_name).await?,
            "Image uploaded and SQL generated. Provide a table name to execute the query.",
        ),
        FileKind::Unsupported => return Err(AppError::unsupported_file_type()),
    };

    let script_path = uploads_dir.join(format!("{}.sql", table_name));
    tokio::fs::write(&script_path, &sql).await?;

    tracing::info!("Generated SQL for table {} saved to {:?}", table_name, script_path);

    Ok(Json(UploadResponse {
        success: true,
        message: message.to_string(),
        filename: file.stored_name,
        default_table_name: table_name,
        sql,
    }))
}

/// Read the multipart body, requiring exactly one `file` field
async fn receive_single_file(multipart: &mut Multipart) -> Result<(String, Vec<u8>)> {
    let mut received: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        if received.is_some() {
            return Err(AppError::InvalidInput(
                "Exactly one file must be uploaded".to_string(),
            ));
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::InvalidInput(ERR_NO_FILE.to_string()))?;
        let bytes = field.bytes().await?;

        received = Some((file_name, bytes.to_vec()));
    }

    received.ok_or_else(|| AppError::InvalidInput(ERR_NO_FILE.to_string()))
}

async fn csv_to_sql(file: &UploadedFile, table_name: &str) -> Result<String> {
    let rows = read_csv_file(file.path.clone()).await?;
    let columns = infer_columns(&rows)?;

    tracing::debug!(
        "Inferred {} columns for {}: {:?}",
        columns.len(),
        table_name,
        columns
    );

    Ok(generate_script(table_name, &columns, &rows))
}

async fn image_to_sql(state: &AppState, file: &UploadedFile, table_name: &str) -> Result<String> {
    if !tokio::fs::try_exists(&file.path).await? {
        tracing::error!("Image file not found: {:?}", file.path);
        return Err(AppError::Upstream("Image file not found for OCR".to_string()));
    }

    Ok(state
        .ocr
        .extract_table_from_image(&file.path, table_name)
        .await?)
}
