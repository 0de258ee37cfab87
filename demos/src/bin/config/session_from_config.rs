//! Session From Config
//!
//! Loads a `SessionConfig` from JSON (the `serde` feature), the way a host
//! application would read it from its own settings file, and reports how the
//! session maps its start page. Without arguments a sample config is written
//! next to a throwaway web root first.
//!
//!   cargo run -p webview-vhost-demos --bin session_from_config -- ./vhost.json

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use webview_vhost::{SessionConfig, VirtualHostSession};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut _demo_dir = None;
    let config_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let dir = tempfile::tempdir()?;
            let root = dir.path().join("dist");
            fs::create_dir_all(&root)?;
            fs::write(root.join("main.html"), "<main>demo</main>")?;
            let config_path = dir.path().join("vhost.json");
            let sample = serde_json::json!({
                "start_page": root.join("main.html"),
                "content_host": "app.localhost",
            });
            fs::write(&config_path, serde_json::to_vec_pretty(&sample)?)?;
            println!("No config given; wrote sample to {}", config_path.display());
            _demo_dir = Some(dir);
            config_path
        }
    };

    let raw = fs::read_to_string(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let config: SessionConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", config_path.display()))?;

    let session = VirtualHostSession::with_config(config)?;
    println!("content host : {}", session.content_host());
    println!("content root : {}", session.content_root().path().display());
    println!("start page   : {}", session.host_page_relative_url());
    println!("start uri    : {}", session.start_uri());

    let response = session
        .try_resolve(session.start_uri())?
        .context("start uri must be intercepted")?;
    println!("start page status: {}", response.status_code());
    Ok(())
}
