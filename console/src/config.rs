use clap::Parser;
use url::Url;

#[derive(Parser, Debug, Clone)]
#[command(version, author, about)]
/// A local web console for the bill-management service
pub struct Config {
    #[clap(default_value_t = String::from("127.0.0.1"), long)]
    /// Bind address for the console's webserver
    pub bind: String,
    #[clap(default_value_t = 4050, long)]
    /// Port for the console's webserver
    pub port: u16,
    #[clap(long)]
    /// Public origin the console is reached at, the default API base url is `<origin>/api`
    pub origin: Option<Url>,
    #[clap(long)]
    /// Location of the settings database
    settings_path: Option<String>,
    #[clap(default_value_t = log::Level::Info, long)]
    /// Log level ["error", "warn", "info", "debug", "trace"]
    pub log_level: log::Level,
}

impl Config {
    pub fn origin(&self) -> String {
        match &self.origin {
            Some(url) => url.origin().ascii_serialization(),
            None => format!("http://{}:{}", self.bind, self.port),
        }
    }

    pub fn settings_path(&self) -> String {
        self.settings_path
            .clone()
            .unwrap_or_else(default_settings_path)
    }
}

fn home_directory() -> String {
    let str = match home::home_dir() {
        Some(buf) => format!("{}", buf.display()),
        None => String::from("."),
    };

    // to be safe remove possible trailing '/' and
    // we can manually add it to paths
    match str.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => str,
    }
}

pub fn default_settings_path() -> String {
    format!("{}/.bill-console/settings", home_directory())
}
