use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bill_console_client::{ApiResult, Builder, Error, FormBody};
use serde_json::Value;

use crate::error::ConsoleError;
use crate::settings::{ConnectionSettings, SettingsStore};
use crate::transport::Api;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConsoleError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConsoleError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub connection: ConnectionSettings,
    pub json: Option<Value>,
    pub form: Option<FormBody>,
}

/// Records every request and answers from canned responses keyed by path.
/// Unknown paths get `200 {}`. An unreachable fake sends each request to a
/// closed local port instead.
#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    calls: Arc<Mutex<Vec<Call>>>,
    responses: Arc<HashMap<String, (u16, String)>>,
    unreachable: bool,
}

impl FakeApi {
    pub fn unreachable() -> Self {
        FakeApi {
            unreachable: true,
            ..Default::default()
        }
    }

    pub fn respond(mut self, path: &str, status: u16, body: &str) -> Self {
        Arc::make_mut(&mut self.responses).insert(path.to_string(), (status, body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| format!("{} {}", call.method, call.path))
            .collect()
    }

    async fn answer(&self, call: Call) -> Result<ApiResult, Error> {
        let response = self.responses.get(&call.path).cloned();
        let path = call.path.clone();
        self.calls.lock().unwrap().push(call);

        if self.unreachable {
            return refused(&path).await;
        }

        let (status, body) = response.unwrap_or((200, String::from("{}")));
        Ok(ApiResult::new(status, body))
    }
}

async fn refused(path: &str) -> Result<ApiResult, Error> {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    Builder::new(&format!("http://{addr}"))
        .build_async()?
        .get(path)
        .await
}

#[async_trait]
impl Api for FakeApi {
    async fn get(&self, connection: &ConnectionSettings, path: &str) -> Result<ApiResult, Error> {
        self.answer(Call {
            method: "GET",
            path: path.to_string(),
            connection: connection.clone(),
            json: None,
            form: None,
        })
        .await
    }

    async fn post_json(
        &self,
        connection: &ConnectionSettings,
        path: &str,
        body: &Value,
    ) -> Result<ApiResult, Error> {
        self.answer(Call {
            method: "POST",
            path: path.to_string(),
            connection: connection.clone(),
            json: Some(body.clone()),
            form: None,
        })
        .await
    }

    async fn post_form(
        &self,
        connection: &ConnectionSettings,
        path: &str,
        body: FormBody,
    ) -> Result<ApiResult, Error> {
        self.answer(Call {
            method: "POST",
            path: path.to_string(),
            connection: connection.clone(),
            json: None,
            form: Some(body),
        })
        .await
    }
}
