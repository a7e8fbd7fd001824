//! Bill service by way of `reqwest` HTTP client.
#![allow(clippy::result_large_err)]

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

use crate::api::*;
use crate::{Builder, Error, API_KEY_HEADER};

#[derive(Debug, Clone)]
pub struct AsyncClient {
    url: String,
    api_key: String,
    client: Client,
}

impl AsyncClient {
    /// build an async client from a builder
    pub fn from_builder(builder: Builder) -> Result<Self, Error> {
        let mut client_builder = Client::builder();

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(proxy) = &builder.proxy {
            client_builder = client_builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = builder.timeout {
            client_builder = client_builder.timeout(core::time::Duration::from_secs(timeout));
        }

        Ok(Self::from_client(
            builder.base_url,
            builder.api_key,
            client_builder.build()?,
        ))
    }

    /// build an async client from the base url, api key and [`Client`]
    pub fn from_client(url: String, api_key: String, client: Client) -> Self {
        AsyncClient {
            url,
            api_key,
            client,
        }
    }

    /// Same connection pool, different endpoint and key.
    pub fn with_connection(&self, url: &str, api_key: &str) -> Self {
        Self::from_client(
            url.trim_end_matches('/').to_string(),
            api_key.to_string(),
            self.client.clone(),
        )
    }

    pub async fn get(&self, path: &str) -> Result<ApiResult, Error> {
        let req = self.client.get(format!("{}{path}", self.url));
        self.send(req).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResult, Error> {
        let req = self
            .client
            .post(format!("{}{path}", self.url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?);
        self.send(req).await
    }

    pub async fn post_form(&self, path: &str, body: FormBody) -> Result<ApiResult, Error> {
        let mut form = Form::new();
        for (name, value) in body.into_fields() {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File { file_name, bytes } => {
                    form.part(name, Part::bytes(bytes).file_name(file_name))
                }
            };
        }

        let req = self
            .client
            .post(format!("{}{path}", self.url))
            .multipart(form);
        self.send(req).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<ApiResult, Error> {
        let resp = req.header(API_KEY_HEADER, &self.api_key).send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;

        Ok(ApiResult::new(status, text))
    }
}
