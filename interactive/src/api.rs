use std::fmt;
use std::future::Future;

use gloo_net::http::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsValue;
use web_sys::{window, Blob, BlobPropertyBag, FormData};

use crate::config::{ClientConfig, LOGIN_PATH};
use crate::error::{parse_detail, ApiError};
use crate::session::{LocalStorageSession, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    fn as_gloo(self) -> gloo_net::http::Method {
        match self {
            Method::Get => gloo_net::http::Method::GET,
            Method::Post => gloo_net::http::Method::POST,
            Method::Put => gloo_net::http::Method::PUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text(String),
    File(FilePart),
}

/// A `multipart/form-data` body. The boundary is chosen by the browser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    fields: Vec<(String, FormField)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields
            .push((name.to_string(), FormField::Text(value.into())));
        self
    }

    pub fn file(mut self, name: &str, file: FilePart) -> Self {
        self.fields.push((name.to_string(), FormField::File(file)));
        self
    }

    #[cfg(test)]
    pub fn fields(&self) -> &[(String, FormField)] {
        &self.fields
    }

    fn to_form_data(&self) -> Result<FormData, JsValue> {
        let form = FormData::new()?;
        for (name, field) in &self.fields {
            match field {
                FormField::Text(value) => form.append_with_str(name, value)?,
                FormField::File(file) => {
                    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
                    let opts = BlobPropertyBag::new();
                    opts.set_type(&file.content_type);
                    let blob = Blob::new_with_u8_array_sequence_and_options(
                        &js_sys::Array::of1(&bytes),
                        &opts,
                    )?;
                    form.append_with_blob_and_filename(name, &blob, &file.filename)?;
                }
            }
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(String),
    Multipart(MultipartForm),
}

/// Per-call options handed to [`Gateway::send`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl ApiRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    pub fn json<B: Serialize>(method: Method, body: &B) -> Result<Self, ApiError> {
        let json = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(Self {
            body: Body::Json(json),
            ..Self::new(method)
        })
    }

    pub fn multipart(method: Method, form: MultipartForm) -> Self {
        Self {
            body: Body::Multipart(form),
            ..Self::new(method)
        }
    }
}

/// A fully resolved request, as handed to the [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl OutgoingRequest {
    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Turn a non-2xx response into [`ApiError::Rejected`].
    pub fn into_ok(self) -> Result<Self, ApiError> {
        if self.ok() {
            Ok(self)
        } else {
            Err(ApiError::Rejected {
                status: self.status,
                detail: parse_detail(&self.body),
            })
        }
    }
}

/// Moves a request over the wire.
pub trait Transport {
    fn execute(
        &self,
        request: OutgoingRequest,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>>;
}

/// Leaves the current view.
pub trait Navigator {
    fn redirect(&self, path: &str);
}

/// `fetch` through gloo-net.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn execute(&self, request: OutgoingRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = RequestBuilder::new(&request.url).method(request.method.as_gloo());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let req = match request.body {
            Body::Empty => builder.build(),
            Body::Json(json) => builder.body(json),
            Body::Multipart(form) => {
                let data = form
                    .to_form_data()
                    .map_err(|e| ApiError::Browser(format!("{:?}", e)))?;
                builder.body(data)
            }
        }
        .map_err(|e| ApiError::Browser(e.to_string()))?;

        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        Ok(response_from(status, resp.text().await))
    }
}

/// Once the status is known it is kept, even if the body can't be read.
fn response_from<E: fmt::Display>(status: u16, body: Result<String, E>) -> ApiResponse {
    let body = body.unwrap_or_else(|err| {
        tracing::warn!(status, error = %err, "could not read response body");
        String::new()
    });
    ApiResponse { status, body }
}

/// Full page navigation via `window.location`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn redirect(&self, path: &str) {
        let navigated = window()
            .map(|w| w.location().set_href(path).is_ok())
            .unwrap_or(false);
        if !navigated {
            tracing::error!(path, "navigation failed");
        }
    }
}

/// Single choke point for every API call.
///
/// Adds the bearer token from the session, negotiates content type, and
/// handles 401 uniformly: the session is cleared and the user is sent to the
/// login page.
pub struct Gateway<T, S, N> {
    config: ClientConfig,
    transport: T,
    session: S,
    navigator: N,
}

pub type BrowserGateway = Gateway<FetchTransport, LocalStorageSession, LocationNavigator>;

/// Gateway wired to the browser.
pub fn gateway() -> BrowserGateway {
    Gateway::new(
        ClientConfig::current(),
        FetchTransport,
        LocalStorageSession,
        LocationNavigator,
    )
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value));
}

impl<T: Transport, S: SessionStore, N: Navigator> Gateway<T, S, N> {
    pub fn new(config: ClientConfig, transport: T, session: S, navigator: N) -> Self {
        Self {
            config,
            transport,
            session,
            navigator,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub async fn send(&self, endpoint: &str, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let ApiRequest {
            method,
            mut headers,
            body,
        } = request;

        if let Some(token) = self.session.token() {
            set_header(&mut headers, "Authorization", format!("Bearer {}", token));
        }
        if !matches!(body, Body::Multipart(_)) {
            set_header(&mut headers, "Content-Type", "application/json".to_string());
        }

        let outgoing = OutgoingRequest {
            method,
            url: self.config.url(endpoint),
            headers,
            body,
        };

        let resp = match self.transport.execute(outgoing).await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::error!(endpoint, error = %err, "API request failed");
                return Err(err);
            }
        };

        if resp.status == 401 {
            tracing::warn!(endpoint, "unauthorized, clearing session");
            self.session.clear();
            self.navigator.redirect(LOGIN_PATH);
            return Err(ApiError::Unauthorized);
        }

        Ok(resp)
    }

    /// Like [`Gateway::send`], but a non-2xx status is an error. The body is
    /// left undecoded.
    pub async fn send_ok(&self, endpoint: &str, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let resp = self.send(endpoint, request).await?;
        resp.into_ok().inspect_err(|err| {
            tracing::debug!(endpoint, error = %err, "request rejected");
        })
    }

    pub async fn get_json<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.send_ok(endpoint, ApiRequest::get()).await?.json()
    }

    pub async fn post_json<R: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let request = ApiRequest::json(Method::Post, body)?;
        self.send_ok(endpoint, request).await?.json()
    }

    /// POST without a body.
    pub async fn post_empty<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.send_ok(endpoint, ApiRequest::post()).await?.json()
    }

    pub async fn send_multipart<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        form: MultipartForm,
    ) -> Result<R, ApiError> {
        self.send_ok(endpoint, ApiRequest::multipart(method, form))
            .await?
            .json()
    }
}
