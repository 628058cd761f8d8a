// Configuration lue depuis l'environnement (.env chargé par dotenv dans main)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_SECRET_KEY: &str = "you-will-never-guess";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub bind_addr: String,
    pub posts_per_page: u64,
    pub reset_token_ttl_secs: i64,
    pub admins: Vec<String>,
}

impl Config {
    /// Construit la configuration à partir des variables d'environnement
    /// Chaque valeur absente ou invalide retombe sur sa valeur par défaut
    pub fn from_env() -> Self {
        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("SECRET_KEY not set, using the default key (INSECURE)");
            DEFAULT_SECRET_KEY.to_string()
        });

        let admins = env::var("ADMINS")
            .map(|raw| parse_admins(&raw))
            .unwrap_or_default();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://app.db?mode=rwc".to_string()),
            secret_key,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            posts_per_page: parse_or("POSTS_PER_PAGE", 3),
            reset_token_ttl_secs: parse_or("RESET_TOKEN_TTL_SECS", 600),
            admins: if admins.is_empty() {
                vec!["admin@localhost".to_string()]
            } else {
                admins
            },
        }
    }

    /// Dossier des fichiers de log (LOG_DIR, défaut `logs`)
    /// Lu avant `from_env` car le logging doit exister avant les warnings
    pub fn log_dir() -> PathBuf {
        env::var("LOG_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    /// Adresse d'expédition des emails (premier admin)
    pub fn mail_sender(&self) -> &str {
        self.admins
            .first()
            .map(String::as_str)
            .unwrap_or("admin@localhost")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            bind_addr: "127.0.0.1:8080".to_string(),
            posts_per_page: 3,
            reset_token_ttl_secs: 600,
            admins: vec!["admin@localhost".to_string()],
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "invalid value, falling back to default");
            default
        }),
        Err(_) => default,
    }
}

fn parse_admins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
