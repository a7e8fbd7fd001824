use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::models::StatusFilter;
use crate::view::PageState;

const STYLE: &str = "body{font-family:system-ui;margin:2rem;max-width:960px}\
section{border:1px solid #ddd;border-radius:6px;padding:1rem;margin-bottom:1rem}\
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #eee;padding:.3rem}\
.right{text-align:right}.ok{color:#1a7f37}.err{color:#cf222e}form.inline{display:inline}\
.alert{background:#fff8c5;border:1px solid #d4a72c;padding:.6rem;margin-bottom:1rem}";

fn status_options(selected: StatusFilter) -> Markup {
    html! {
        @for filter in StatusFilter::ALL {
            option value=(filter.as_str()) selected[filter == selected] { (filter.label()) }
        }
    }
}

fn connection_section(state: &PageState) -> Markup {
    html! {
        section id="connection" {
            h2 { "Connection" }
            form method="post" action="/connection" {
                label {
                    "Base URL "
                    input id="baseUrl" name="base_url" value=(state.connection.base_url) size="40";
                }
                label {
                    "API key "
                    input id="apiKey" name="api_key" value=(state.connection.api_key) type="password";
                }
                button id="saveConn" { "Save" }
            }
            div id="connMsg" { (state.connection_message) }
        }
        section id="health" {
            h2 { "Health" }
            form method="post" action="/health" {
                button id="btnHealth" { "Check" }
            }
            pre id="healthOut" { (state.health_output) }
        }
    }
}

fn upload_section(state: &PageState) -> Markup {
    html! {
        section id="upload" {
            h2 { "Upload bill" }
            form method="post" action="/upload/file" enctype="multipart/form-data" {
                input id="billFile" type="file" name="file";
                button id="btnUploadFile" { "Upload file" }
            }
            form method="post" action="/upload/manual" {
                input id="vendor" name="vendor" placeholder="Vendor";
                input id="amount" name="amount" type="number" step="0.01" placeholder="Amount";
                input id="due" name="due_date" type="date";
                input id="note" name="note" placeholder="Note (optional)";
                button id="btnUploadForm" { "Upload fields" }
            }
            div id="upMsg" { (state.upload_message) }
        }
    }
}

fn bills_section(state: &PageState) -> Markup {
    html! {
        section id="bills" {
            h2 { "Bills" }
            form method="post" action="/bills" {
                select id="statusFilter" name="status" onchange="this.form.submit()" {
                    (status_options(state.status_filter))
                }
                button id="btnLoadBills" { "Load bills" }
            }
            table id="billsTbl" {
                thead {
                    tr {
                        th { "ID" }
                        th { "Vendor" }
                        th class="right" { "Amount" }
                        th { "Due" }
                        th { "Status" }
                        th { "Actions" }
                    }
                }
                tbody {
                    @for row in &state.rows {
                        (row)
                    }
                }
            }
            div id="listMsg" { (state.list_message) }
        }
    }
}

/// Renders the whole console page.
pub fn render_page(state: &PageState) -> String {
    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "Bill Console" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { "Bill Console" }
                @if let Some(alert) = &state.alert {
                    div class="alert" role="alert" { (alert) }
                }
                (connection_section(state))
                (upload_section(state))
                (bills_section(state))
            }
        }
    };

    markup.into_string()
}
