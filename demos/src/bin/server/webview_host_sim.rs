//! Simulated Webview Host
//!
//! Plays the part of a platform adapter: it builds a `VirtualHostSession` for a
//! start page, waits for the navigation event, then feeds the session the kind
//! of requests a webview would issue (the start page, its assets, a traversal
//! attempt and a request for a real website) and prints what it would render.
//!
//! Run without arguments for an offline demo over a throwaway web root:
//!   cargo run -p webview-vhost-demos --bin webview_host_sim
//! Or point it at your own files:
//!   cargo run -p webview-vhost-demos --bin webview_host_sim -- \
//!       --start-page ./wwwroot/index.html https://0.0.0.0/css/site.css

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::mpsc;
use tracing_subscriber::EnvFilter;
use webview_vhost::{SessionConfig, Url, VirtualHostSession, DEFAULT_CONTENT_HOST};

#[derive(Parser)]
#[command(name = "webview-host-sim")]
#[command(about = "Resolve webview requests against a virtual host session")]
struct Cli {
    /// Start page; its directory becomes the content root
    #[arg(short, long)]
    start_page: Option<PathBuf>,
    /// Synthetic host name to intercept
    #[arg(long, default_value = DEFAULT_CONTENT_HOST)]
    host: String,
    /// Extra request URIs to resolve after the start page
    requests: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("webview_vhost=debug,webview_host_sim=info")),
        )
        .init();

    let cli = Cli::parse();

    // Keep the demo directory alive until we are done.
    let mut _demo_root = None;
    let start_page = match cli.start_page {
        Some(path) => path,
        None => {
            let dir = demo_web_root()?;
            let page = dir.path().join("wwwroot").join("index.html");
            _demo_root = Some(dir);
            page
        }
    };

    let config = SessionConfig::new(&start_page).with_content_host(cli.host.as_str());
    let session = VirtualHostSession::with_config(config)
        .with_context(|| format!("cannot host {}", start_page.display()))?;
    println!("Content root: {}", session.content_root().path().display());

    // The real adapter would forward this to the webview's navigate call.
    let (tx, rx) = mpsc::channel::<Url>();
    session.on_navigate(move |uri| {
        let _ = tx.send(uri.clone());
    });
    session.start()?;
    let start_uri = rx.recv().context("navigation event was not emitted")?;
    tracing::info!(uri = %start_uri, "webview navigating");
    println!("Navigate to: {start_uri}");

    let mut requests = vec![start_uri.to_string()];
    if cli.requests.is_empty() {
        let host = session.content_host();
        requests.extend([
            format!("https://{host}/css/site.css"),
            format!("https://{host}/js/app.js?v=42"),
            format!("https://{host}/..%2F..%2F..%2Fetc%2Fpasswd"),
            format!("https://{host}/does_not_exist.html"),
            "https://example.com/index.html".to_string(),
        ]);
    } else {
        requests.extend(cli.requests);
    }

    for request in &requests {
        println!("\nRequest: {request}");
        match session.try_resolve_str(request)? {
            None => {
                tracing::info!(%request, "passing request to the network");
                println!("  -> not intercepted; falls through to the network");
            }
            Some(response) => {
                let (status, text, headers, mut body) = response.into_parts();
                let mut bytes = Vec::new();
                body.read_to_end(&mut bytes)?;
                tracing::info!(%request, status, "intercepted request");
                println!("  -> {status} {text}");
                for line in headers.lines() {
                    println!("     {line}");
                }
                if status == 200 {
                    println!("  -> served {} bytes", bytes.len());
                } else {
                    println!("  -> {}", String::from_utf8_lossy(&bytes));
                }
            }
        }
    }

    session.dispose();
    Ok(())
}

fn demo_web_root() -> Result<tempfile::TempDir> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("wwwroot");
    fs::create_dir_all(root.join("css"))?;
    fs::create_dir_all(root.join("js"))?;
    fs::write(root.join("index.html"), "<h1>Welcome!</h1>")?;
    fs::write(root.join("css/site.css"), "body { color: #333; }")?;
    fs::write(root.join("js/app.js"), "console.log('ready');")?;
    fs::write(dir.path().join("secret.txt"), "not for the webview")?;
    Ok(dir)
}
