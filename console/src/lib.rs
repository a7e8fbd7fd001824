use std::sync::Arc;

pub mod api;
pub mod app;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod render;
pub mod settings;
pub mod transport;
pub mod view;

#[cfg(test)]
mod test_utils;

pub use crate::console::Console;
pub use crate::error::ConsoleError;
pub use crate::view::SharedPage;

/// Shared by every route: the controller and the page it draws on.
pub struct State<S, A> {
    pub console: Arc<Console<S, A>>,
    pub page: SharedPage,
}

impl<S, A> State<S, A> {
    pub fn new(console: Console<S, A>) -> Self {
        State {
            console: Arc::new(console),
            page: SharedPage::new(),
        }
    }
}

impl<S, A> Clone for State<S, A> {
    fn clone(&self) -> Self {
        State {
            console: self.console.clone(),
            page: self.page.clone(),
        }
    }
}
