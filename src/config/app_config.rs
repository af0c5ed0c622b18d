//! config/app_config.rs
//! Estructuras de configuración del servidor y del despacho de mensajes.
//! Cada campo tiene un valor por defecto; las variables de entorno lo sobrescriben.

use std::{env, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://api.dbconecta.com";
pub const DEFAULT_COUNTRY_PREFIX: &str = "55";
pub const DEFAULT_NAME_PLACEHOLDER: &str = "{name}";
pub const DEFAULT_FALLBACK_CONTACT_NAME: &str = "Nome não informado";
pub const DEFAULT_MESSAGE: &str = "Olá, tudo bem? Espero que sim! Estou entrando em contato para compartilhar uma novidade incrível que pode ser do seu interesse. Você tem alguns minutos para conversarmos?";

/// Dónde escucha el servidor y dónde vive la base SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 5022,
            database_path: "data/dispatch.db".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = ServerConfig::default();
        ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_env("SERVER_PORT", defaults.port),
            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
        }
    }
}

/// Parámetros del procesador de lotes. Las credenciales del gateway
/// NO viven aquí: llegan en cada petición de envío.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub gateway_base_url: String,
    pub country_prefix: String,
    pub name_placeholder: String,
    pub fallback_contact_name: String,
    pub pacing_interval_ms: u64,
    pub gateway_timeout_secs: u64,
    pub default_message: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            gateway_base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
            country_prefix: DEFAULT_COUNTRY_PREFIX.to_string(),
            name_placeholder: DEFAULT_NAME_PLACEHOLDER.to_string(),
            fallback_contact_name: DEFAULT_FALLBACK_CONTACT_NAME.to_string(),
            pacing_interval_ms: 1000,
            gateway_timeout_secs: 30,
            default_message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

impl DispatchConfig {
    pub fn from_env() -> Self {
        let defaults = DispatchConfig::default();

        // El prefijo se compara contra un string de solo dígitos
        let country_prefix: String = env::var("DEFAULT_COUNTRY_PREFIX")
            .unwrap_or(defaults.country_prefix)
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();

        DispatchConfig {
            gateway_base_url: env::var("GATEWAY_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gateway_base_url),
            country_prefix,
            name_placeholder: non_empty_env("NAME_PLACEHOLDER").unwrap_or(defaults.name_placeholder),
            fallback_contact_name: env::var("FALLBACK_CONTACT_NAME")
                .unwrap_or(defaults.fallback_contact_name),
            pacing_interval_ms: parse_env("PACING_INTERVAL_MS", defaults.pacing_interval_ms),
            gateway_timeout_secs: parse_env("GATEWAY_TIMEOUT_SECS", defaults.gateway_timeout_secs),
            default_message: non_empty_env("DEFAULT_MESSAGE").unwrap_or(defaults.default_message),
        }
    }

    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_interval_ms)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Lee una variable numérica; si no parsea, se queda con el default y avisa.
fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!(
                    "Valor inválido para {}='{}', usando default {}",
                    key,
                    raw,
                    default
                );
                default
            }
        },
        Err(_) => default,
    }
}
