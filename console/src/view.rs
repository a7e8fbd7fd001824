use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::StatusFilter;
use crate::render::{BillRow, Message};
use crate::settings::ConnectionSettings;

/// What the controller can read from and write to the page.
pub trait View: Send + Sync {
    /// Current values of the connection form.
    fn connection(&self) -> ConnectionSettings;
    fn set_connection(&self, settings: &ConnectionSettings);
    fn set_connection_message(&self, text: &str);
    fn set_health_output(&self, text: &str);
    fn set_upload_message(&self, message: Message);
    fn status_filter(&self) -> StatusFilter;
    fn set_list_message(&self, message: Message);
    /// Replaces the whole table body.
    fn replace_rows(&self, rows: Vec<BillRow>);
    fn alert(&self, text: &str);
    /// Asks the operator for a value, `None` when nothing was answered.
    fn prompt(&self, question: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub connection: ConnectionSettings,
    pub connection_message: String,
    pub health_output: String,
    pub upload_message: Message,
    pub status_filter: StatusFilter,
    pub list_message: Message,
    pub rows: Vec<BillRow>,
    pub alert: Option<String>,
}

/// The console page as served to the browser.
#[derive(Debug, Clone, Default)]
pub struct SharedPage {
    state: Arc<Mutex<PageState>>,
}

impl SharedPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> PageState {
        self.lock().clone()
    }

    pub fn set_status_filter(&self, filter: StatusFilter) {
        self.lock().status_filter = filter;
    }

    /// Copy of the page for rendering. A pending alert is handed out once.
    pub fn take_for_render(&self) -> PageState {
        let mut state = self.lock();
        let snapshot = state.clone();
        state.alert = None;
        snapshot
    }
}

impl View for SharedPage {
    fn connection(&self) -> ConnectionSettings {
        self.lock().connection.clone()
    }

    fn set_connection(&self, settings: &ConnectionSettings) {
        self.lock().connection = settings.clone();
    }

    fn set_connection_message(&self, text: &str) {
        self.lock().connection_message = text.to_string();
    }

    fn set_health_output(&self, text: &str) {
        self.lock().health_output = text.to_string();
    }

    fn set_upload_message(&self, message: Message) {
        self.lock().upload_message = message;
    }

    fn status_filter(&self) -> StatusFilter {
        self.lock().status_filter
    }

    fn set_list_message(&self, message: Message) {
        self.lock().list_message = message;
    }

    fn replace_rows(&self, rows: Vec<BillRow>) {
        self.lock().rows = rows;
    }

    fn alert(&self, text: &str) {
        self.lock().alert = Some(text.to_string());
    }

    fn prompt(&self, _question: &str) -> Option<String> {
        None
    }
}

/// The page, with the answer to a prompt already collected from a form.
pub struct PromptedView<'a> {
    page: &'a SharedPage,
    answer: Option<String>,
}

impl<'a> PromptedView<'a> {
    pub fn new(page: &'a SharedPage, answer: Option<String>) -> Self {
        PromptedView { page, answer }
    }
}

impl View for PromptedView<'_> {
    fn connection(&self) -> ConnectionSettings {
        self.page.connection()
    }

    fn set_connection(&self, settings: &ConnectionSettings) {
        self.page.set_connection(settings)
    }

    fn set_connection_message(&self, text: &str) {
        self.page.set_connection_message(text)
    }

    fn set_health_output(&self, text: &str) {
        self.page.set_health_output(text)
    }

    fn set_upload_message(&self, message: Message) {
        self.page.set_upload_message(message)
    }

    fn status_filter(&self) -> StatusFilter {
        self.page.status_filter()
    }

    fn set_list_message(&self, message: Message) {
        self.page.set_list_message(message)
    }

    fn replace_rows(&self, rows: Vec<BillRow>) {
        self.page.replace_rows(rows)
    }

    fn alert(&self, text: &str) {
        self.page.alert(text)
    }

    fn prompt(&self, _question: &str) -> Option<String> {
        self.answer.clone()
    }
}
