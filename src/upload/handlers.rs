use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::storage::LocalStore;

use super::services::{make_filename, sniff_image, MAX_UPLOAD_BYTES};

#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub filename: String,
    pub path: String,
    pub url: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub mime: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUploadRequest {
    pub filename: String,
}

/// Pull the `image` field out of the multipart body. A broken or truncated
/// stream is an upload error, distinct from a well-formed body that simply
/// lacks the field.
async fn read_image_field(multipart: &mut Multipart) -> Result<bytes::Bytes, ApiError> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("image") => {
                return field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::Validation("Upload error".into()));
            }
            Ok(Some(_)) => continue,
            Ok(None) => {
                return Err(ApiError::Validation("Tidak ada file yang diupload".into()));
            }
            Err(_) => return Err(ApiError::Validation("Upload error".into())),
        }
    }
}

#[instrument(skip(state, _user, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let data = read_image_field(&mut multipart).await?;

    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::Validation("Ukuran file maksimal 5MB".into()));
    }
    let (mime, ext) = sniff_image(&data).ok_or_else(|| {
        ApiError::Validation("Tipe file tidak didukung. Gunakan JPG, PNG, GIF, atau WebP".into())
    })?;

    let filename = make_filename(ext);
    let size = data.len();
    state.store.save(&filename, data).await?;

    let path = state.store.relative_path(&filename);
    let url = state.store.public_url(&path);
    info!(%filename, size, mime, "image uploaded");

    Ok(ApiResponse::with_message(
        UploadedFile {
            filename,
            path,
            url,
            size,
            mime: mime.to_string(),
        },
        "File berhasil diupload",
    )
    .into_response())
}

#[instrument(skip(state, _user, body))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let req: DeleteUploadRequest = serde_json::from_value(body)
        .map_err(|_| ApiError::Validation("Missing filename".into()))?;

    if LocalStore::sanitize(&req.filename).is_none() {
        return Err(ApiError::Validation("Missing filename".into()));
    }
    if !state.store.delete(&req.filename).await? {
        return Err(ApiError::NotFound("File tidak ditemukan".into()));
    }
    Ok(ApiResponse::<()>::message("File berhasil dihapus").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    const CT: &str = "multipart/form-data; boundary=XBOUND";

    async fn multipart_of(body: &'static str) -> Multipart {
        let req = Request::builder()
            .header("content-type", CT)
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(req, &()).await.unwrap()
    }

    #[tokio::test]
    async fn image_field_is_read() {
        let mut mp = multipart_of(
            "--XBOUND\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --XBOUND--\r\n",
        )
        .await;
        let data = read_image_field(&mut mp).await.unwrap();
        assert_eq!(&data[..], b"PNGDATA");
    }

    #[tokio::test]
    async fn missing_image_field_is_reported_as_no_file() {
        let mut mp = multipart_of(
            "--XBOUND\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             x\r\n\
             --XBOUND--\r\n",
        )
        .await;
        let err = read_image_field(&mut mp).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(m) if m == "Tidak ada file yang diupload"));
    }

    #[tokio::test]
    async fn truncated_stream_is_an_upload_error() {
        // the body ends mid-part, no closing boundary
        let mut mp = multipart_of(
            "--XBOUND\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\n\r\n\
             partial",
        )
        .await;
        let err = read_image_field(&mut mp).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(m) if m == "Upload error"));
    }
}
