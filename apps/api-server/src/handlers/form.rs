//! Request bodies. Post and profile endpoints accept JSON, url-encoded or
//! `multipart/form-data` with an optional `file` part; the auth and comment
//! endpoints take JSON or url-encoded only.

use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{Either, HttpMessage, HttpRequest, web};
use futures::StreamExt;
use serde_json::Value;

use inkwell_core::ports::Upload;

use crate::middleware::error::{AppError, AppResult};

/// Multipart part carrying the image.
pub const FILE_FIELD: &str = "file";

const MULTIPART_FORM_DATA: &str = "multipart/form-data";
const URLENCODED: &str = "application/x-www-form-urlencoded";

/// A typed body sent either as JSON or as an HTML form.
pub type JsonOrForm<T> = Either<web::Json<T>, web::Form<T>>;

pub fn into_body<T>(body: JsonOrForm<T>) -> T {
    match body {
        Either::Left(web::Json(inner)) => inner,
        Either::Right(web::Form(inner)) => inner,
    }
}

/// Text fields and at most one file from a request body.
#[derive(Debug, Default)]
pub struct FormInput {
    fields: HashMap<String, String>,
    file: Option<Upload>,
}

impl FormInput {
    /// Read the body, rejecting anything larger than `limit` bytes.
    pub async fn read(req: &HttpRequest, payload: web::Payload, limit: usize) -> AppResult<Self> {
        match req.content_type() {
            MULTIPART_FORM_DATA => Self::from_multipart(req, payload, limit).await,
            URLENCODED => Self::from_urlencoded(&read_body(payload, limit).await?),
            _ => Self::from_json(&read_body(payload, limit).await?),
        }
    }

    async fn from_multipart(
        req: &HttpRequest,
        payload: web::Payload,
        limit: usize,
    ) -> AppResult<Self> {
        let mut multipart = Multipart::new(req.headers(), payload);
        let mut input = Self::default();
        let mut received = 0usize;

        while let Some(field) = multipart.next().await {
            let mut field = field.map_err(|e| AppError::BadRequest(e.to_string()))?;
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_owned);

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
                received += chunk.len();
                if received > limit {
                    return Err(AppError::BadRequest(format!(
                        "Upload exceeds the {limit} byte limit"
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            if name == FILE_FIELD && file_name.is_some() {
                if !bytes.is_empty() {
                    input.file = Some(Upload { file_name, bytes });
                }
            } else {
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::BadRequest(format!("Field {name} is not valid text")))?;
                input.fields.insert(name, value);
            }
        }

        Ok(input)
    }

    fn from_urlencoded(body: &[u8]) -> AppResult<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid form body: {e}")))?;

        Ok(Self {
            fields: pairs.into_iter().collect(),
            file: None,
        })
    }

    fn from_json(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let object: serde_json::Map<String, Value> = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

        let fields = object
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                Value::Number(n) => Some((key, n.to_string())),
                Value::Bool(b) => Some((key, b.to_string())),
                _ => None,
            })
            .collect();

        Ok(Self { fields, file: None })
    }

    /// A text field, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    pub fn take_file(&mut self) -> Option<Upload> {
        self.file.take()
    }
}

async fn read_body(mut payload: web::Payload, limit: usize) -> AppResult<Vec<u8>> {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(format!(
                "Body exceeds the {limit} byte limit"
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencoded_fields_are_decoded() {
        let input = FormInput::from_urlencoded(b"title=Caf%C3%A9+notes&content=a%26b&empty=").unwrap();

        assert_eq!(input.text("title").as_deref(), Some("Café notes"));
        assert_eq!(input.text("content").as_deref(), Some("a&b"));
        assert_eq!(input.text("empty"), None);
    }

    #[test]
    fn test_json_keeps_scalars_and_drops_nested_values() {
        let input =
            FormInput::from_json(br#"{"title":"T","is_published":true,"tags":["a"]}"#).unwrap();

        assert_eq!(input.text("title").as_deref(), Some("T"));
        assert_eq!(input.text("is_published").as_deref(), Some("true"));
        assert_eq!(input.text("tags"), None);
    }

    #[test]
    fn test_blank_json_body_is_empty_input() {
        assert!(FormInput::from_json(b"  ").unwrap().fields.is_empty());
        assert!(FormInput::from_json(b"{").is_err());
    }
}
