//! Request description for DevFolio API calls.
//!
//! An [`ApiRequest`] owns everything needed to send the call again, which the
//! refresh-and-retry path relies on.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;

/// A file attached to a multipart request
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(file_name: &str, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime(mut self, mime: &str) -> Self {
        self.mime = Some(mime.to_string());
        self
    }
}

/// One multipart field
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(Upload),
}

#[derive(Debug, Clone)]
enum Body {
    Empty,
    Json(Vec<u8>),
    Multipart(Vec<(String, FormValue)>),
}

/// Helper for describing a request relative to the API base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Body,
    attach_token: bool,
    refresh_on_unauthorized: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: Body::Empty,
            attach_token: true,
            refresh_on_unauthorized: true,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: &str) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter when a value is present
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Add a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Body::Json(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Add a multipart body
    pub fn multipart(mut self, fields: Vec<(String, FormValue)>) -> Self {
        self.body = Body::Multipart(fields);
        self
    }

    /// Send without credentials and never refresh on 401.
    ///
    /// Used for the login, registration and token endpoints.
    pub fn anonymous(mut self) -> Self {
        self.attach_token = false;
        self.refresh_on_unauthorized = false;
        self
    }

    /// Keep the bearer token but surface a 401 as-is.
    pub fn no_refresh(mut self) -> Self {
        self.refresh_on_unauthorized = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn attaches_token(&self) -> bool {
        self.attach_token
    }

    pub fn refreshes_on_unauthorized(&self) -> bool {
        self.refresh_on_unauthorized
    }

    /// Absolute URL for this request under `base_url`.
    pub fn url(&self, base_url: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        ))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    pub(crate) fn build(
        &self,
        client: &Client,
        base_url: &str,
        token: Option<&str>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.url(base_url)?;
        let mut req = client.request(self.method.clone(), url);

        if let Some(token) = token {
            req = req.bearer_auth(token);
        }

        req = match &self.body {
            Body::Empty => req,
            Body::Json(bytes) => req
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes.clone()),
            Body::Multipart(fields) => req.multipart(build_form(fields)?),
        };

        Ok(req)
    }
}

fn build_form(fields: &[(String, FormValue)]) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = match value {
            FormValue::Text(text) => form.text(name.clone(), text.clone()),
            FormValue::File(upload) => {
                let mut part = Part::bytes(upload.bytes.to_vec()).file_name(upload.file_name.clone());
                if let Some(mime) = &upload.mime {
                    part = part.mime_str(mime)?;
                }
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

/// A page of results as the paginated endpoints return them
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

/// List payload in either shape the server uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Paged(Page<T>),
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) => items,
            Listing::Paged(page) => page.results,
        }
    }
}

/// `{"message": ...}` acknowledgement bodies
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
