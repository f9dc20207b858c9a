use std::sync::Arc;

use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use actix_web::{
    delete, get,
    http::header::{
        Charset, ContentDisposition, ContentType, DispositionParam, DispositionType, ExtendedValue,
    },
    post, web, HttpResponse,
};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::{AuthenticatedUser, RequireRoles},
    errors::AppError,
    models::dto::response::AttachmentDto,
};

#[derive(MultipartForm)]
pub struct UploadForm {
    pub lesson_id: Text<Uuid>,
    pub file: Bytes,
}

#[post("/attachments/upload", wrap = "RequireRoles::staff()")]
pub async fn upload_attachment(
    state: web::Data<Arc<AppState>>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> Result<HttpResponse, AppError> {
    let lesson_id = form.lesson_id.into_inner().to_string();
    let file_name = form.file.file_name.unwrap_or_default();

    let attachment = state
        .attachment_service
        .upload_file(&lesson_id, &file_name, form.file.data.to_vec())
        .await?;
    Ok(HttpResponse::Created().json(AttachmentDto::from(attachment)))
}

#[get("/attachments/download/{id}")]
pub async fn download_attachment(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let file = state
        .attachment_service
        .download_file(&user.0.subject, &id.to_string())
        .await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::octet_stream())
        .insert_header(attachment_disposition(&file.name))
        .body(file.bytes))
}

#[delete("/attachments/{id}", wrap = "RequireRoles::admin()")]
pub async fn delete_attachment(
    state: web::Data<Arc<AppState>>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state
        .attachment_service
        .delete_attachment(&id.to_string())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// `attachment; filename="..."`, plus an RFC 5987 `filename*` for names
/// outside ASCII.
fn attachment_disposition(name: &str) -> ContentDisposition {
    let mut parameters = vec![DispositionParam::Filename(name.to_string())];
    if !name.is_ascii() {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: name.as_bytes().to_vec(),
        }));
    }

    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_disposition() {
        let header = attachment_disposition("slides.pdf");

        assert!(header.is_attachment());
        assert_eq!(header.get_filename(), Some("slides.pdf"));
        assert!(header.get_filename_ext().is_none());
    }

    #[test]
    fn test_non_ascii_disposition_has_extended_name() {
        let header = attachment_disposition("лекция.pdf");

        assert!(header.get_filename_ext().is_some());
    }
}
