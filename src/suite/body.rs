use std::path::PathBuf;

use reqwest::multipart::Form;

use crate::error::CaseError;

use super::types::Request;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Body of an outgoing request, ready to attach to a request builder.
#[derive(Debug)]
pub enum RequestBody {
    Empty,
    Text(String),
    Bytes(Vec<u8>),
    Multipart(Form),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormEncoding {
    Multipart,
    UrlEncoded,
}

impl Request {
    /// Builds the request body.
    ///
    /// The first match wins: a form posted as multipart, a url-encoded form
    /// (fields sorted by key), the literal body, the raw content of
    /// `bodyFromFile`, and finally an empty body. A multipart form rewrites
    /// the `Content-Type` header to carry the generated boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if `bodyFromFile` is needed but cannot be read.
    pub fn body(&mut self) -> Result<RequestBody, CaseError> {
        if !self.form.is_empty() {
            match self.form_encoding() {
                Some(FormEncoding::Multipart) => {
                    let mut form = Form::new();
                    for (key, value) in &self.form {
                        form = form.text(key.clone(), value.clone());
                    }
                    let content_type =
                        format!("{}; boundary={}", MULTIPART_FORM_DATA, form.boundary());
                    self.set_header(CONTENT_TYPE, content_type);
                    return Ok(RequestBody::Multipart(form));
                }
                Some(FormEncoding::UrlEncoded) => {
                    let encoded = url::form_urlencoded::Serializer::new(String::new())
                        .extend_pairs(self.form.iter())
                        .finish();
                    return Ok(RequestBody::Text(encoded));
                }
                None => {}
            }
        }

        if !self.body.is_empty() {
            return Ok(RequestBody::Text(self.body.clone()));
        }

        if !self.body_from_file.is_empty() {
            let data = std::fs::read(&self.body_from_file).map_err(|err| {
                CaseError::ReadBodyFile {
                    path: PathBuf::from(&self.body_from_file),
                    source: err,
                }
            })?;
            return Ok(RequestBody::Bytes(data));
        }

        Ok(RequestBody::Empty)
    }

    fn form_encoding(&self) -> Option<FormEncoding> {
        let content_type = self.header_value(CONTENT_TYPE)?;
        let media_type = content_type
            .split(';')
            .next()
            .map_or(content_type, str::trim);
        if media_type.eq_ignore_ascii_case(MULTIPART_FORM_DATA) {
            Some(FormEncoding::Multipart)
        } else if media_type.eq_ignore_ascii_case(FORM_URLENCODED) {
            Some(FormEncoding::UrlEncoded)
        } else {
            None
        }
    }
}
