use super::*;
use std::io;
use std::path::{Path, PathBuf};

#[test]
fn truncate_path_display_preserves_short_paths() {
    let path = Path::new("wwwroot/index.html");
    let rendered = truncate_path_display(path, 256);
    assert_eq!(rendered, path.to_string_lossy());
}

#[test]
fn truncate_path_display_inserts_ellipsis_for_long_paths() {
    let segment = "verylongcomponent".repeat(20);
    let path = PathBuf::from(format!("/app/{segment}/index.html"));
    let max_len = 48;
    let rendered = truncate_path_display(&path, max_len);
    assert!(rendered.chars().count() <= max_len);
    assert!(rendered.contains("..."));
    assert!(rendered.ends_with("index.html"));
}

#[test]
fn virtual_host_error_sources_are_reported() {
    let root = VirtualHostError::InvalidContentRoot {
        root: PathBuf::from("/app/wwwroot"),
        source: io::Error::new(io::ErrorKind::NotFound, "gone"),
    };
    assert!(root.source().is_some());

    let file = VirtualHostError::FileIo {
        path: PathBuf::from("/app/wwwroot/index.html"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };
    assert!(file.source().is_some());

    let uri = VirtualHostError::InvalidRequestUri {
        uri: String::new(),
        source: url::ParseError::EmptyHost,
    };
    assert!(uri.source().is_some());

    assert!(VirtualHostError::AlreadyStarted.source().is_none());
    let host = VirtualHostError::InvalidContentHost {
        host: "bad host".into(),
    };
    assert!(host.source().is_none());
}

#[test]
fn invalid_usage_covers_adapter_mistakes_only() {
    assert!(VirtualHostError::AlreadyStarted.is_invalid_usage());
    assert!(VirtualHostError::InvalidRequestUri {
        uri: "nope".into(),
        source: url::ParseError::RelativeUrlWithoutBase,
    }
    .is_invalid_usage());

    let io_failure = VirtualHostError::FileIo {
        path: PathBuf::from("/app/wwwroot/app.js"),
        source: io::Error::new(io::ErrorKind::Other, "boom"),
    };
    assert!(!io_failure.is_invalid_usage());
}

#[test]
fn display_mentions_offending_values() {
    assert_eq!(
        VirtualHostError::AlreadyStarted.to_string(),
        "Can only start once"
    );

    let rendered = VirtualHostError::FileIo {
        path: PathBuf::from("/app/wwwroot/app.js"),
        source: io::Error::new(io::ErrorKind::Other, "boom"),
    }
    .to_string();
    assert!(rendered.contains("/app/wwwroot/app.js"));

    let rendered = VirtualHostError::InvalidContentHost {
        host: "a b".into(),
    }
    .to_string();
    assert!(rendered.contains("'a b'"));
}
