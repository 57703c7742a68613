use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use lead_api::DEFAULT_SOURCE;

use crate::error::ServerError;

#[derive(Parser)]
#[command(name = "lead-server", about = "Приём заявок с сайта и отправка в Google Sheets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Запустить сервер
    Serve(ServeArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Путь к TOML конфиг файлу. Отсутствующий файл — не ошибка.
    #[arg(long, default_value = "config.toml", env = "LEAD_SERVER_CONFIG")]
    pub config: String,

    /// URL Apps Script web app. Пусто — заявки только логируются.
    #[arg(long, env = "GOOGLE_SHEETS_URL")]
    pub sheets_url: Option<String>,

    /// Порт HTTP сервера
    #[arg(long, env = "LEAD_SERVER_PORT")]
    pub port: Option<u16>,
}

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub sheets_url: Option<String>,
    /// Метка `source` для заявок без неё.
    pub source: Option<String>,
    /// Таймаут запроса к Sheets. Не задан — без таймаута.
    pub request_timeout_ms: Option<u64>,
}

impl ServerConfig {
    pub fn load(path: &str) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config { context: "read", detail: format!("'{path}': {e}") })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &str) -> Result<Self, ServerError> {
        toml::from_str(content)
            .map_err(|e| ServerError::Config { context: "parse", detail: format!("'{path}': {e}") })
    }
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Итоговая конфигурация после мержа: config.toml < env/CLI
#[derive(Debug)]
pub struct Effective {
    pub host: String,
    pub port: u16,
    /// None — хранилище не сконфигурировано (пустая строка тоже).
    pub sheets_url: Option<String>,
    pub source: String,
    pub request_timeout: Option<Duration>,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

impl Effective {
    pub fn new(args: &ServeArgs) -> Result<Self, ServerError> {
        let cfg = if std::path::Path::new(&args.config).exists() {
            ServerConfig::load(&args.config)?
        } else {
            tracing::debug!(config = %args.config, "config file not found, using defaults");
            ServerConfig::default()
        };
        Ok(Self::merge(args, cfg))
    }

    fn merge(args: &ServeArgs, cfg: ServerConfig) -> Self {
        let sheets_url = args
            .sheets_url
            .clone()
            .or(cfg.sheets_url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Self {
            host: cfg.host.unwrap_or_else(default_host),
            port: args.port.or(cfg.port).unwrap_or_else(default_port),
            sheets_url,
            source: cfg
                .source
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            request_timeout: cfg.request_timeout_ms.map(Duration::from_millis),
        }
    }
}
