//! Row model and markup for the bill table and message lines.
//!
//! Text from the service or the operator is never pre-escaped here; it is
//! escaped by `html!` when the markup is built.

use bill_console_client::Bill;
use maud::{html, Markup, Render};

/// Two decimals, the way the service's amounts read in a browser: exact
/// halves round away from zero and anything that is not a number is `NaN`.
pub fn to_fixed(amount: f64) -> String {
    if amount.is_nan() {
        return String::from("NaN");
    }
    if amount.is_infinite() {
        return String::from(if amount > 0.0 { "Infinity" } else { "-Infinity" });
    }
    // -0 prints as 0
    let amount = if amount == 0.0 { 0.0 } else { amount };

    // only odd multiples of 1/8 sit exactly halfway between two cents
    let eighths = amount * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 && eighths.abs() < 1e15 {
        let cents = (amount * 100.0).round();
        return format!("{:.2}", cents / 100.0);
    }

    format!("{amount:.2}")
}

pub fn format_amount(bill: &Bill) -> String {
    to_fixed(bill.amount_value())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Ok,
    Err,
    Plain,
}

/// A message line under one of the page's sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    text: String,
}

impl Message {
    pub fn ok(text: &str) -> Self {
        Message {
            kind: MessageKind::Ok,
            text: text.to_string(),
        }
    }

    pub fn err(text: &str) -> Self {
        Message {
            kind: MessageKind::Err,
            text: text.to_string(),
        }
    }

    pub fn plain(text: &str) -> Self {
        Message {
            kind: MessageKind::Plain,
            text: text.to_string(),
        }
    }

    pub fn empty() -> Self {
        Self::plain("")
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn to_html(&self) -> String {
        self.render().into_string()
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::empty()
    }
}

impl Render for Message {
    fn render(&self) -> Markup {
        html! {
            @match self.kind {
                MessageKind::Ok => { span class="ok" { (self.text) } }
                MessageKind::Err => { span class="err" { (self.text) } }
                MessageKind::Plain => { (self.text) }
            }
        }
    }
}

/// Per-row actions, each posting back to the console for its bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    MarkPaid,
    Notify,
}

impl RowAction {
    pub const ALL: [RowAction; 2] = [RowAction::MarkPaid, RowAction::Notify];

    pub fn path(&self, bill_id: &str) -> String {
        let id = urlencoding::encode(bill_id);
        match self {
            RowAction::MarkPaid => format!("/bills/{id}/mark_paid"),
            RowAction::Notify => format!("/bills/{id}/notify"),
        }
    }

    fn markup(self, bill_id: &str) -> Markup {
        html! {
            form method="post" action=(self.path(bill_id)) class="inline" {
                @match self {
                    RowAction::MarkPaid => {
                        button class="btnPaid" { "Mark Paid" }
                    }
                    RowAction::Notify => {
                        input name="to" placeholder="SMS number (E.164) or blank for console";
                        button class="btnNotify" { "Notify" }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillRow {
    pub bill_id: String,
    /// id, vendor, amount, due date, status
    pub cells: [String; 5],
    pub note: Option<String>,
    pub actions: Vec<RowAction>,
}

impl Render for BillRow {
    fn render(&self) -> Markup {
        let [id, vendor, amount, due_date, status] = &self.cells;
        html! {
            tr {
                td { (id) }
                td title=[self.note.as_deref()] { (vendor) }
                td class="right" { (amount) }
                td { (due_date) }
                td { (status) }
                td {
                    @for action in &self.actions {
                        (action.markup(&self.bill_id))
                    }
                }
            }
        }
    }
}

/// One row per bill, with the given actions attached to every row.
pub fn render_rows(bills: &[Bill], actions: &[RowAction]) -> Vec<BillRow> {
    bills
        .iter()
        .map(|bill| BillRow {
            bill_id: bill.id.clone(),
            cells: [
                bill.id.clone(),
                bill.vendor.clone(),
                format_amount(bill),
                bill.due_date.clone(),
                bill.status.clone(),
            ],
            note: bill.note.clone().filter(|note| !note.is_empty()),
            actions: actions.to_vec(),
        })
        .collect()
}
