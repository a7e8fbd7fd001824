use bill_console_client::{
    bills_path, mark_paid_path, ApiResult, BillList, FormBody, NotifyRequest, NotifyResponse,
    HEALTH_PATH, NOTIFY_PATH, UPLOAD_PATH,
};
use log::{debug, info, warn};
use serde_json::json;

use crate::error::ConsoleError;
use crate::models::{ManualEntry, UploadFile};
use crate::render::{render_rows, Message, RowAction};
use crate::settings::{self, ConnectionSettings, SettingsStore};
use crate::transport::Api;
use crate::view::View;

pub const NO_FILE: &str = "Choose a file";
pub const MISSING_FIELDS: &str = "Provide vendor, amount, and due date.";
pub const UPLOADED: &str = "Uploaded successfully.";
pub const NO_BILLS: &str = "No bills yet.";
pub const NOTIFY_PROMPT: &str = "SMS number (E.164) or leave blank for console:";

fn failure(action: &str, res: &ApiResult) -> String {
    format!("{action} failed ({}): {}", res.status, res.body.stringify())
}

pub struct Console<S, A> {
    store: S,
    api: A,
    origin: String,
}

impl<S: SettingsStore, A: Api> Console<S, A> {
    pub fn new(store: S, api: A, origin: &str) -> Self {
        Console {
            store,
            api,
            origin: origin.to_string(),
        }
    }

    /// Fills the connection form from the store.
    pub fn load_connection<V: View>(&self, view: &V) -> Result<ConnectionSettings, ConsoleError> {
        let settings = settings::load(&self.store, &self.origin)?;
        view.set_connection(&settings);
        view.set_connection_message(&format!("Loaded. Base={}", settings.base_url));
        Ok(settings)
    }

    pub fn save_connection<V: View>(
        &self,
        view: &V,
        form: &ConnectionSettings,
    ) -> Result<ConnectionSettings, ConsoleError> {
        let settings = settings::save(&self.store, form)?;
        view.set_connection(&settings);
        view.set_connection_message(&format!("Saved. Base={}", settings.base_url));
        info!("Saved connection settings, base url {}", settings.base_url);
        Ok(settings)
    }

    pub async fn check_health<V: View>(&self, view: &V) -> Result<(), ConsoleError> {
        let res = self.api.get(&view.connection(), HEALTH_PATH).await?;
        view.set_health_output(&res.body.pretty());
        Ok(())
    }

    pub async fn upload_file<V: View>(
        &self,
        view: &V,
        file: Option<UploadFile>,
    ) -> Result<(), ConsoleError> {
        let Some(file) = file else {
            view.set_upload_message(Message::err(NO_FILE));
            return Ok(());
        };

        let form = FormBody::new().file("file", &file.file_name, file.bytes);
        self.submit_upload(view, form).await
    }

    pub async fn upload_manual<V: View>(
        &self,
        view: &V,
        entry: &ManualEntry,
    ) -> Result<(), ConsoleError> {
        let Some(form) = entry.to_form() else {
            view.set_upload_message(Message::err(MISSING_FIELDS));
            return Ok(());
        };

        self.submit_upload(view, form).await
    }

    async fn submit_upload<V: View>(&self, view: &V, form: FormBody) -> Result<(), ConsoleError> {
        let res = self
            .api
            .post_form(&view.connection(), UPLOAD_PATH, form)
            .await?;

        if res.ok {
            view.set_upload_message(Message::ok(UPLOADED));
            self.load_bills(view).await
        } else {
            warn!("Upload rejected with status {}", res.status);
            view.set_upload_message(Message::err(&failure("Upload", &res)));
            Ok(())
        }
    }

    /// Re-fetches the list with the current filter and rebuilds the table.
    pub async fn load_bills<V: View>(&self, view: &V) -> Result<(), ConsoleError> {
        let path = bills_path(Some(view.status_filter().as_str()));
        debug!("Loading bills from {path}");
        let res = self.api.get(&view.connection(), &path).await?;

        if !res.ok {
            view.replace_rows(Vec::new());
            view.set_list_message(Message::err(&failure("Load", &res)));
            return Ok(());
        }

        let list = BillList::from_body(&res.body);
        view.replace_rows(render_rows(&list.items, &RowAction::ALL));
        view.set_list_message(if list.items.is_empty() {
            Message::plain(NO_BILLS)
        } else {
            Message::empty()
        });
        Ok(())
    }

    pub async fn mark_paid<V: View>(&self, view: &V, bill_id: &str) -> Result<(), ConsoleError> {
        let res = self
            .api
            .post_json(&view.connection(), &mark_paid_path(bill_id), &json!({}))
            .await?;

        if res.ok {
            self.load_bills(view).await
        } else {
            view.alert(&failure("Mark paid", &res));
            Ok(())
        }
    }

    pub async fn notify<V: View>(&self, view: &V, bill_id: &str) -> Result<(), ConsoleError> {
        let to = view.prompt(NOTIFY_PROMPT);
        let request = NotifyRequest::new(bill_id, to.as_deref());
        let res = self
            .api
            .post_json(&view.connection(), NOTIFY_PATH, &serde_json::to_value(&request)?)
            .await?;

        if res.ok {
            let response = NotifyResponse::from_body(&res.body);
            if let Some(link) = &response.link {
                info!("Reminder for bill {bill_id} links to {link}");
            }
            view.alert(&format!("Notification sent via {}", response.channel()));
        } else {
            view.alert(&failure("Notify", &res));
        }
        Ok(())
    }

    /// Loads the connection, then probes the service and lists bills on a
    /// best-effort basis: transport failures there are only logged.
    pub async fn startup<V: View>(&self, view: &V) -> Result<(), ConsoleError> {
        self.load_connection(view)?;

        if let Err(e) = self.check_health(view).await {
            debug!("Startup health probe failed: {e}");
        }
        if let Err(e) = self.load_bills(view).await {
            debug!("Startup bill load failed: {e}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use bill_console_client::Error;
    use serde_json::{json, Value};

    use super::*;
    use crate::models::StatusFilter;
    use crate::test_utils::{FakeApi, MemoryStore};
    use crate::view::{PromptedView, SharedPage};

    const ORIGIN: &str = "http://127.0.0.1:4050";

    fn console(api: FakeApi) -> Console<MemoryStore, FakeApi> {
        Console::new(MemoryStore::default(), api, ORIGIN)
    }

    fn one_bill() -> String {
        json!({"items": [
            {"id": "b1", "vendor": "Acme", "amount": 12.5, "due_date": "2024-01-01", "status": "open"}
        ]})
        .to_string()
    }

    fn entry(vendor: &str, amount: &str, due_date: &str) -> ManualEntry {
        ManualEntry {
            vendor: vendor.to_string(),
            amount: amount.to_string(),
            due_date: due_date.to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn test_save_then_load_connection() {
        let console = console(FakeApi::default());
        let page = SharedPage::new();

        let loaded = console.load_connection(&page).unwrap();
        assert_eq!(loaded.base_url, "http://127.0.0.1:4050/api");
        assert_eq!(
            page.snapshot().connection_message,
            "Loaded. Base=http://127.0.0.1:4050/api"
        );

        let form = ConnectionSettings {
            base_url: String::from("https://bills.example.com/api/"),
            api_key: String::from(" key "),
        };
        console.save_connection(&page, &form).unwrap();
        let state = page.snapshot();
        assert_eq!(state.connection_message, "Saved. Base=https://bills.example.com/api");
        assert_eq!(state.connection.api_key, "key");

        let fresh = SharedPage::new();
        assert_eq!(console.load_connection(&fresh).unwrap(), state.connection);
    }

    #[tokio::test]
    async fn test_requests_use_form_connection() {
        let api = FakeApi::default();
        let console = console(api.clone());
        let page = SharedPage::new();
        console.load_connection(&page).unwrap();
        console
            .save_connection(
                &page,
                &ConnectionSettings::normalized("http://svc/api", "k1"),
            )
            .unwrap();

        console.load_bills(&page).await.unwrap();
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].connection.base_url, "http://svc/api");
        assert_eq!(calls[0].connection.api_key, "k1");
    }

    #[tokio::test]
    async fn test_filter_query_parameter() {
        for filter in StatusFilter::ALL {
            let api = FakeApi::default();
            let console = console(api.clone());
            let page = SharedPage::new();
            page.set_status_filter(filter);

            console.load_bills(&page).await.unwrap();

            let expected = match filter {
                StatusFilter::All => String::from("/bills"),
                other => format!("/bills?status={}", other.as_str()),
            };
            assert_eq!(api.paths(), vec![format!("GET {expected}")]);
        }
    }

    #[tokio::test]
    async fn test_load_bills_renders_rows() {
        let api = FakeApi::default().respond("/bills", 200, &one_bill());
        let console = console(api);
        let page = SharedPage::new();

        console.load_bills(&page).await.unwrap();

        let state = page.snapshot();
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.rows[0].cells[2], "12.50");
        assert_eq!(state.rows[0].actions, RowAction::ALL.to_vec());
        assert!(state.list_message.is_empty());
    }

    #[tokio::test]
    async fn test_load_bills_empty() {
        let api = FakeApi::default().respond("/bills", 200, r#"{"items":[]}"#);
        let console = console(api);
        let page = SharedPage::new();
        page.replace_rows(render_rows(
            &BillList::from_body(&bill_console_client::Decoded::from_text(one_bill())).items,
            &RowAction::ALL,
        ));

        console.load_bills(&page).await.unwrap();

        let state = page.snapshot();
        assert!(state.rows.is_empty());
        assert_eq!(state.list_message.to_html(), NO_BILLS);
    }

    #[tokio::test]
    async fn test_load_bills_error_state() {
        let api = FakeApi::default().respond("/bills", 401, r#"{"error":"bad key"}"#);
        let console = console(api);
        let page = SharedPage::new();

        console.load_bills(&page).await.unwrap();

        let state = page.snapshot();
        assert!(state.rows.is_empty());
        assert_eq!(
            state.list_message.to_html(),
            "<span class=\"err\">Load failed (401): {&quot;error&quot;:&quot;bad key&quot;}</span>"
        );
    }

    #[tokio::test]
    async fn test_upload_file_requires_file() {
        let api = FakeApi::default();
        let console = console(api.clone());
        let page = SharedPage::new();

        console.upload_file(&page, None).await.unwrap();

        assert!(api.calls().is_empty());
        assert_eq!(
            page.snapshot().upload_message.to_html(),
            "<span class=\"err\">Choose a file</span>"
        );
    }

    #[tokio::test]
    async fn test_upload_file_then_reload() {
        let api = FakeApi::default().respond("/bills", 200, &one_bill());
        let console = console(api.clone());
        let page = SharedPage::new();

        let file = UploadFile {
            file_name: String::from("bill.txt"),
            bytes: b"Vendor: Acme\nAmount: $12.50\nDue: 2024-01-01".to_vec(),
        };
        console.upload_file(&page, Some(file)).await.unwrap();

        assert_eq!(api.paths(), vec!["POST /upload", "GET /bills"]);
        let form = api.calls()[0].form.clone().unwrap();
        assert_eq!(form.field_names(), vec!["file"]);
        let state = page.snapshot();
        assert_eq!(
            state.upload_message.to_html(),
            "<span class=\"ok\">Uploaded successfully.</span>"
        );
        assert_eq!(state.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_manual_validation() {
        let api = FakeApi::default();
        let console = console(api.clone());
        let page = SharedPage::new();

        for missing in [
            entry("", "12.50", "2024-01-01"),
            entry("Acme", "", "2024-01-01"),
            entry("Acme", "12.50", ""),
        ] {
            console.upload_manual(&page, &missing).await.unwrap();
            assert_eq!(
                page.snapshot().upload_message,
                Message::err(MISSING_FIELDS)
            );
        }
        assert!(api.calls().is_empty());

        console
            .upload_manual(&page, &entry("Acme", "12.50", "2024-01-01"))
            .await
            .unwrap();
        let form = api.calls()[0].form.clone().unwrap();
        assert_eq!(form.field_names(), vec!["vendor", "amount", "due_date"]);
    }

    #[tokio::test]
    async fn test_upload_failure_is_escaped() {
        let api = FakeApi::default().respond("/upload", 400, "<html>Bad & broken</html>");
        let console = console(api.clone());
        let page = SharedPage::new();

        console
            .upload_manual(&page, &entry("Acme", "12.50", "2024-01-01"))
            .await
            .unwrap();

        assert_eq!(api.paths(), vec!["POST /upload"]);
        assert_eq!(
            page.snapshot().upload_message.to_html(),
            "<span class=\"err\">Upload failed (400): &quot;&lt;html&gt;Bad &amp; broken&lt;/html&gt;&quot;</span>"
        );
    }

    #[tokio::test]
    async fn test_mark_paid() {
        let api = FakeApi::default().respond("/bills", 200, &one_bill());
        let console = console(api.clone());
        let page = SharedPage::new();

        console.mark_paid(&page, "b1").await.unwrap();

        assert_eq!(api.paths(), vec!["POST /bills/b1/mark_paid", "GET /bills"]);
        assert_eq!(api.calls()[0].json, Some(json!({})));
        assert!(page.snapshot().alert.is_none());
    }

    #[tokio::test]
    async fn test_mark_paid_failure_alerts() {
        let api = FakeApi::default().respond("/bills/b1/mark_paid", 401, r#"{"error":"bad key"}"#);
        let console = console(api.clone());
        let page = SharedPage::new();

        console.mark_paid(&page, "b1").await.unwrap();

        assert_eq!(api.paths(), vec!["POST /bills/b1/mark_paid"]);
        assert_eq!(
            page.snapshot().alert.as_deref(),
            Some(r#"Mark paid failed (401): {"error":"bad key"}"#)
        );
    }

    #[tokio::test]
    async fn test_notify_blank_prompt_is_auto() {
        let api = FakeApi::default().respond("/notify", 200, r#"{"ok":true,"sent_via":{}}"#);
        let console = console(api.clone());
        let page = SharedPage::new();

        let view = PromptedView::new(&page, Some(String::new()));
        console.notify(&view, "b1").await.unwrap();

        let body: Value = api.calls()[0].json.clone().unwrap();
        assert_eq!(body, json!({"bill_id": "b1", "channel": "auto"}));
        assert_eq!(
            page.snapshot().alert.as_deref(),
            Some("Notification sent via console")
        );
    }

    #[tokio::test]
    async fn test_notify_sms() {
        let api = FakeApi::default().respond(
            "/notify",
            200,
            r#"{"ok":true,"sent_via":{"channel":"sms","status":200},"link":"http://svc/pay/b1?t=x"}"#,
        );
        let console = console(api.clone());
        let page = SharedPage::new();

        let view = PromptedView::new(&page, Some(String::from("+15551234567")));
        console.notify(&view, "b1").await.unwrap();

        assert_eq!(
            api.calls()[0].json,
            Some(json!({"bill_id": "b1", "channel": "sms", "to": "+15551234567"}))
        );
        assert_eq!(page.snapshot().alert.as_deref(), Some("Notification sent via sms"));
    }

    #[tokio::test]
    async fn test_notify_failure_alerts() {
        let api = FakeApi::default().respond("/notify", 404, r#"{"detail":"Bill not found"}"#);
        let console = console(api);
        let page = SharedPage::new();

        console.notify(&page, "gone").await.unwrap();

        let alert = page.snapshot().alert.unwrap();
        assert!(alert.contains("404"));
        assert_eq!(alert, r#"Notify failed (404): {"detail":"Bill not found"}"#);
    }

    #[tokio::test]
    async fn test_health_output() {
        let api = FakeApi::default().respond("/", 200, r#"{"ok":true}"#);
        let console = console(api);
        let page = SharedPage::new();

        console.check_health(&page).await.unwrap();
        assert_eq!(page.snapshot().health_output, "{\n  \"ok\": true\n}");
    }

    #[tokio::test]
    async fn test_startup_swallows_transport_errors() {
        let api = FakeApi::unreachable();
        let console = console(api.clone());
        let page = SharedPage::new();

        console.startup(&page).await.unwrap();

        assert_eq!(api.paths(), vec!["GET /", "GET /bills"]);
        let state = page.snapshot();
        assert_eq!(state.connection_message, "Loaded. Base=http://127.0.0.1:4050/api");
        assert!(state.rows.is_empty());
    }

    #[tokio::test]
    async fn test_user_actions_propagate_transport_errors() {
        let api = FakeApi::unreachable();
        let console = console(api);
        let page = SharedPage::new();

        assert!(matches!(
            console.load_bills(&page).await,
            Err(ConsoleError::Client(Error::Reqwest(_)))
        ));
        assert!(matches!(
            console.mark_paid(&page, "b1").await,
            Err(ConsoleError::Client(Error::Reqwest(_)))
        ));
        assert!(matches!(
            console.notify(&PromptedView::new(&page, None), "b1").await,
            Err(ConsoleError::Client(Error::Reqwest(_)))
        ));
        assert!(page.snapshot().alert.is_none());
    }

    #[test]
    fn test_failure_message() {
        let res = ApiResult::new(401, String::from(r#"{"error":"bad key"}"#));
        assert_eq!(failure("Upload", &res), r#"Upload failed (401): {"error":"bad key"}"#);
    }
}
