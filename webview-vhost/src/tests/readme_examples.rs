// Keeps the README quick start honest.

#[test]
fn readme_quick_start() -> Result<(), Box<dyn std::error::Error>> {
    use crate::VirtualHostSession;
    use std::io::Read;

    let site = tempfile::tempdir()?;
    std::fs::create_dir_all(site.path().join("wwwroot/css"))?;
    std::fs::write(site.path().join("wwwroot/index.html"), "<h1>Welcome!</h1>")?;
    std::fs::write(site.path().join("wwwroot/css/site.css"), "body { color: #333; }")?;

    let session = VirtualHostSession::new(site.path().join("wwwroot/index.html"))?;
    session.on_navigate(|uri| println!("navigate to {uri}"));
    session.start()?;

    for uri in [
        "https://0.0.0.0/index.html",
        "https://0.0.0.0/css/site.css",
        "https://0.0.0.0/..%2F..%2Fetc%2Fpasswd",
        "https://example.com/",
    ] {
        match session.try_resolve_str(uri)? {
            Some(response) => {
                let status = response.status_code();
                let mut body = Vec::new();
                response.into_body().read_to_end(&mut body)?;
                println!("{uri} -> {status} ({} bytes)", body.len());
                if uri.contains("passwd") {
                    assert_eq!(status, 404);
                } else {
                    assert_eq!(status, 200);
                }
            }
            None => assert_eq!(uri, "https://example.com/"),
        }
    }
    Ok(())
}
