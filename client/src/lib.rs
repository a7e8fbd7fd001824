#![allow(clippy::result_large_err)]

pub mod api;

#[cfg(feature = "async")]
pub mod r#async;

pub use api::*;
#[cfg(feature = "async")]
pub use r#async::AsyncClient;
use std::fmt;

/// Header carrying the shared secret on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub base_url: String,
    /// Value sent in the `x-api-key` header
    pub api_key: String,
    /// Optional URL of the proxy to use to make requests to the bill service
    ///
    /// The string should be formatted as: `<protocol>://<user>:<password>@host:<port>`.
    ///
    /// The proxy is ignored when targeting `wasm32`.
    pub proxy: Option<String>,
    /// Socket timeout. Unset means requests wait as long as the service does.
    pub timeout: Option<u64>,
}

impl Builder {
    /// Instantiate a new builder
    pub fn new(base_url: &str) -> Self {
        Builder {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: String::new(),
            proxy: None,
            timeout: None,
        }
    }

    /// Set the api key of the builder
    pub fn api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }

    /// Set the proxy of the builder
    pub fn proxy(mut self, proxy: &str) -> Self {
        self.proxy = Some(proxy.to_string());
        self
    }

    /// Set the timeout of the builder
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// build an asynchronous client from builder
    #[cfg(feature = "async")]
    pub fn build_async(self) -> Result<AsyncClient, Error> {
        AsyncClient::from_builder(self)
    }
}

/// Errors that can happen when making a request
///
/// A response with a non-success status is not an error: it comes back as an
/// [`ApiResult`] with `ok` unset so the caller can show the body.
#[derive(Debug)]
pub enum Error {
    /// Error during reqwest HTTP request
    #[cfg(feature = "async")]
    Reqwest(reqwest::Error),
    /// Error encoding a JSON request body
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "async")]
            Error::Reqwest(e) => write!(f, "request failed: {e}"),
            Error::Json(e) => write!(f, "invalid json: {e}"),
        }
    }
}

macro_rules! impl_error {
    ( $from:ty, $to:ident ) => {
        impl_error!($from, $to, Error);
    };
    ( $from:ty, $to:ident, $impl_for:ty ) => {
        impl std::convert::From<$from> for $impl_for {
            fn from(err: $from) -> Self {
                <$impl_for>::$to(err)
            }
        }
    };
}

impl std::error::Error for Error {}
#[cfg(feature = "async")]
impl_error!(::reqwest::Error, Reqwest, Error);
impl_error!(serde_json::Error, Json, Error);
