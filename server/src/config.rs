use error_stack::ResultExt;
use kernel::KernelError;

static POSTGRES_URL: &str = "POSTGRES_URL";
static SERVER_PORT: &str = "SERVER_PORT";
static RUST_LOG: &str = "RUST_LOG";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_FILTER: &str =
    "application=debug,driver=debug,server=debug,tower_http=debug,sqlx=debug";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    /// Books are kept in process memory when unset.
    pub postgres_url: Option<String>,
    pub log_filter: String,
}

impl AppConfig {
    /// Reads the process environment, falling back to a `.env` file.
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        Self::load(|key| dotenvy::var(key).ok())
    }

    fn load(var: impl Fn(&str) -> Option<String>) -> error_stack::Result<Self, KernelError> {
        let port = match var(SERVER_PORT) {
            Some(port) => port
                .parse::<u16>()
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| format!("{SERVER_PORT} is not a port number: {port}"))?,
            None => DEFAULT_PORT,
        };
        let postgres_url = var(POSTGRES_URL).filter(|url| !url.is_empty());
        let log_filter = var(RUST_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Ok(Self {
            port,
            postgres_url,
            log_filter,
        })
    }
}
