use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const HEALTH_PATH: &str = "/";
pub const UPLOAD_PATH: &str = "/upload";
pub const BILLS_PATH: &str = "/bills";
pub const NOTIFY_PATH: &str = "/notify";

/// List path, with the status filter as a query parameter when one is set.
pub fn bills_path(status: Option<&str>) -> String {
    match status {
        Some(status) if !status.is_empty() => {
            format!("{BILLS_PATH}?status={}", urlencoding::encode(status))
        }
        _ => BILLS_PATH.to_string(),
    }
}

pub fn mark_paid_path(bill_id: &str) -> String {
    format!("{BILLS_PATH}/{bill_id}/mark_paid")
}

/// A response body: JSON when it parses, otherwise the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Json(Value),
    Raw(String),
}

impl Decoded {
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Decoded::Json(value),
            Err(_) => Decoded::Raw(text),
        }
    }

    /// Compact JSON rendering of the body. Raw text is rendered as a JSON
    /// string literal, quotes included.
    pub fn stringify(&self) -> String {
        match self {
            Decoded::Json(value) => value.to_string(),
            Decoded::Raw(text) => Value::String(text.clone()).to_string(),
        }
    }

    /// Human readable rendering: raw text as-is, JSON pretty printed.
    pub fn pretty(&self) -> String {
        match self {
            Decoded::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Decoded::Raw(text) => text.clone(),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Decoded::Json(value) => Some(value),
            Decoded::Raw(_) => None,
        }
    }
}

/// Normalized outcome of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult {
    /// Transport-level success, says nothing about the body
    pub ok: bool,
    pub status: u16,
    pub body: Decoded,
}

impl ApiResult {
    pub fn new(status: u16, text: String) -> Self {
        ApiResult {
            ok: (200..400).contains(&status),
            status,
            body: Decoded::from_text(text),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Bill {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vendor: String,
    #[serde(default)]
    pub amount: Value,
    #[serde(default, deserialize_with = "lenient_string")]
    pub due_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
}

impl Bill {
    /// Amount coerced to a number the way a browser's `Number()` would:
    /// null, blank and `false` are 0, `true` is 1, anything unparseable NaN.
    pub fn amount_value(&self) -> f64 {
        match &self.amount {
            Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Value::String(s) => parse_number(s.trim()),
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Null => 0.0,
            Value::Array(_) | Value::Object(_) => f64::NAN,
        }
    }
}

fn parse_number(s: &str) -> f64 {
    match s {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => match s.parse::<f64>() {
            // spelled-out "inf" and "nan" are not numbers, overflow is
            Ok(n) if n.is_nan() || (n.is_infinite() && s.to_lowercase().contains("inf")) => {
                f64::NAN
            }
            Ok(n) => n,
            Err(_) => f64::NAN,
        },
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct BillList {
    #[serde(default)]
    pub items: Vec<Bill>,
}

impl BillList {
    /// Reads `items` out of a list response. A missing field or a raw body
    /// gives an empty list and entries that are not objects are skipped.
    pub fn from_body(body: &Decoded) -> Self {
        let items = body
            .as_json()
            .and_then(|value| value.get("items"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .filter_map(|item| serde_json::from_value::<Bill>(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        BillList { items }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotifyChannel {
    Auto,
    Sms,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NotifyRequest {
    pub bill_id: String,
    pub channel: NotifyChannel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl NotifyRequest {
    /// An sms reminder when a destination is given, otherwise let the service
    /// pick.
    pub fn new(bill_id: &str, to: Option<&str>) -> Self {
        let to = to.map(str::trim).filter(|to| !to.is_empty());
        NotifyRequest {
            bill_id: bill_id.to_string(),
            channel: if to.is_some() {
                NotifyChannel::Sms
            } else {
                NotifyChannel::Auto
            },
            to: to.map(String::from),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SentVia {
    #[serde(default)]
    pub channel: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct NotifyResponse {
    #[serde(default)]
    pub sent_via: Option<SentVia>,
    #[serde(default)]
    pub link: Option<String>,
}

impl NotifyResponse {
    pub fn from_body(body: &Decoded) -> Self {
        body.as_json()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    /// Channel the service reports, `console` when it does not say.
    pub fn channel(&self) -> &str {
        self.sent_via
            .as_ref()
            .and_then(|s| s.channel.as_deref())
            .filter(|c| !c.is_empty())
            .unwrap_or("console")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

/// Fields of a multipart submission, in the order they are sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormBody {
    fields: Vec<(String, FormValue)>,
}

impl FormBody {
    pub fn new() -> Self {
        FormBody::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.fields
            .push((name.to_string(), FormValue::Text(value.to_string())));
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        self.fields.push((
            name.to_string(),
            FormValue::File {
                file_name: file_name.to_string(),
                bytes,
            },
        ));
        self
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn into_fields(self) -> Vec<(String, FormValue)> {
        self.fields
    }
}
