use std::sync::Arc;

use mrb_core::{config::Config, store::FileSessionStore};

#[tokio::main]
async fn main() -> Result<(), mrb_core::Error> {
    mrb_core::logging::init("mrb")?;

    let cfg = Arc::new(Config::load()?);
    let store = Arc::new(FileSessionStore::open(
        cfg.session_store_path.clone(),
        cfg.session_retention,
    )?);

    mrb_telegram::run(cfg, store)
        .await
        .map_err(|e| mrb_core::Error::Transport(format!("telegram bot failed: {e}")))?;

    Ok(())
}
