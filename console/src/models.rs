use std::str::FromStr;

use bill_console_client::FormBody;
use serde::{Deserialize, Serialize};

use crate::settings::ConnectionSettings;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ConnectionForm {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl From<ConnectionForm> for ConnectionSettings {
    fn from(form: ConnectionForm) -> Self {
        ConnectionSettings {
            base_url: form.base_url,
            api_key: form.api_key,
        }
    }
}

/// Manual bill entry, exactly as typed.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ManualEntry {
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub note: String,
}

impl ManualEntry {
    /// Multipart fields for the entry, `None` when vendor, amount or due
    /// date is blank. A blank note is left out.
    pub fn to_form(&self) -> Option<FormBody> {
        let vendor = self.vendor.trim();
        let amount = self.amount.trim();
        let due_date = self.due_date.trim();
        let note = self.note.trim();

        if vendor.is_empty() || amount.is_empty() || due_date.is_empty() {
            return None;
        }

        let form = FormBody::new()
            .text("vendor", vendor)
            .text("amount", amount)
            .text("due_date", due_date);

        Some(if note.is_empty() {
            form
        } else {
            form.text("note", note)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FilterForm {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct NotifyForm {
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Unpaid,
    Paid,
    Canceled,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Unpaid,
        StatusFilter::Paid,
        StatusFilter::Canceled,
    ];

    /// Value sent as the `status` query parameter, empty for no filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "",
            StatusFilter::Unpaid => "unpaid",
            StatusFilter::Paid => "paid",
            StatusFilter::Canceled => "canceled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Unpaid => "Unpaid",
            StatusFilter::Paid => "Paid",
            StatusFilter::Canceled => "Canceled",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "unpaid" => Ok(StatusFilter::Unpaid),
            "paid" => Ok(StatusFilter::Paid),
            "canceled" => Ok(StatusFilter::Canceled),
            other => Err(format!("Unknown status filter: {other}")),
        }
    }
}
