use async_trait::async_trait;
use bill_console_client::{ApiResult, AsyncClient, Builder, Error, FormBody};
use serde_json::Value;

use crate::settings::ConnectionSettings;

/// Request helper the controller goes through. Every call takes the
/// connection as it currently reads in the form.
#[async_trait]
pub trait Api: Send + Sync {
    async fn get(&self, connection: &ConnectionSettings, path: &str) -> Result<ApiResult, Error>;

    async fn post_json(
        &self,
        connection: &ConnectionSettings,
        path: &str,
        body: &Value,
    ) -> Result<ApiResult, Error>;

    async fn post_form(
        &self,
        connection: &ConnectionSettings,
        path: &str,
        body: FormBody,
    ) -> Result<ApiResult, Error>;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: AsyncClient,
}

impl HttpApi {
    pub fn from_builder(builder: Builder) -> Result<Self, Error> {
        Ok(HttpApi {
            client: builder.build_async()?,
        })
    }

    fn client_for(&self, connection: &ConnectionSettings) -> AsyncClient {
        self.client
            .with_connection(&connection.base_url, &connection.api_key)
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn get(&self, connection: &ConnectionSettings, path: &str) -> Result<ApiResult, Error> {
        self.client_for(connection).get(path).await
    }

    async fn post_json(
        &self,
        connection: &ConnectionSettings,
        path: &str,
        body: &Value,
    ) -> Result<ApiResult, Error> {
        self.client_for(connection).post_json(path, body).await
    }

    async fn post_form(
        &self,
        connection: &ConnectionSettings,
        path: &str,
        body: FormBody,
    ) -> Result<ApiResult, Error> {
        self.client_for(connection).post_form(path, body).await
    }
}
