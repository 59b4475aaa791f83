use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::domain::ChatId;
use crate::menu::MenuCatalog;
use crate::store::DEFAULT_RETENTION;
use crate::{errors::Error, Result};

/// Typed configuration, loaded from the environment at startup.
///
/// A missing bot token or admin chat id is fatal: the process must not start
/// serving without them.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    /// The single privileged chat that receives forwarded user messages.
    pub admin_chat_id: ChatId,

    pub session_retention: Duration,
    pub send_timeout: Duration,
    pub session_store_path: PathBuf,

    pub menu: MenuCatalog,

    /// Webhook mode when set; long polling otherwise.
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").and_then(non_empty).ok_or_else(|| {
            Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;

        let admin_chat_id = env_str("ADMIN_CHAT_ID")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(ChatId)
            .ok_or_else(|| {
                Error::Config("ADMIN_CHAT_ID environment variable is required".to_string())
            })?;

        let session_retention = env_u64("SESSION_RETENTION_DAYS")
            .map(|days| Duration::from_secs(days * 24 * 60 * 60))
            .unwrap_or(DEFAULT_RETENTION);

        let send_timeout = Duration::from_secs(env_u64("SEND_TIMEOUT_SECS").unwrap_or(10));

        let session_store_path = env_path("SESSION_STORE_PATH")
            .unwrap_or_else(|| PathBuf::from("/tmp/market-relay-sessions.json"));

        let menu = match env_path("MENU_FILE") {
            Some(path) => MenuCatalog::load(&path)?,
            None => MenuCatalog::default(),
        };

        let webhook_url = env_str("WEBHOOK_URL").and_then(non_empty);
        let webhook_port = env_u64("WEBHOOK_PORT").unwrap_or(8443) as u16;

        Ok(Self {
            telegram_bot_token,
            admin_chat_id,
            session_retention,
            send_timeout,
            session_store_path,
            menu,
            webhook_url,
            webhook_port,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_loader_does_not_override_existing_env() {
        let path = std::env::temp_dir().join(format!("mrb-env-{}.env", std::process::id()));
        std::fs::write(
            &path,
            "MRB_TEST_EXISTING=from_file\nMRB_TEST_FRESH=\"quoted value\"\n# comment\n",
        )
        .unwrap();

        env::set_var("MRB_TEST_EXISTING", "from_env");
        load_dotenv_if_present(&path);

        assert_eq!(env::var("MRB_TEST_EXISTING").unwrap(), "from_env");
        assert_eq!(env::var("MRB_TEST_FRESH").unwrap(), "quoted value");

        env::remove_var("MRB_TEST_EXISTING");
        env::remove_var("MRB_TEST_FRESH");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn numeric_helpers_reject_garbage() {
        env::set_var("MRB_TEST_NUM", " 21 ");
        assert_eq!(env_u64("MRB_TEST_NUM"), Some(21));
        env::set_var("MRB_TEST_NUM", "three");
        assert_eq!(env_u64("MRB_TEST_NUM"), None);
        env::remove_var("MRB_TEST_NUM");
    }
}
