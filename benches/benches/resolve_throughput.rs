//! Resolve Throughput: VirtualHostSession vs. Manual soft-canonicalize
//!
//! A page load is a burst of requests against the same content root: the page,
//! its stylesheets, scripts and images. The session canonicalizes the root once
//! and reuses it for every request, where a naive interceptor re-derives the
//! boundary per request.
//!
//! 1. Manual: canonicalize root + candidate, component-wise check, open file
//! 2. Session: `try_resolve` on a prebuilt session (decode, contain, open)
//! 3. Session rejections: traversal and missing-file requests answered with 404

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use soft_canonicalize::soft_canonicalize;
use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::{fs, io};
use tempfile::TempDir;
use webview_vhost::{Url, VirtualHostSession};

/// A small single-page app: one html page and its assets.
struct PageLoadWorkload {
    _temp_dir: TempDir,
    web_root: PathBuf,
    relative: Vec<String>,
    requests: Vec<Url>,
}

impl PageLoadWorkload {
    fn new(asset_count: usize) -> io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let web_root = temp_dir.path().join("wwwroot");
        fs::create_dir_all(web_root.join("assets"))?;
        fs::write(web_root.join("index.html"), "<html></html>")?;

        let mut relative = vec!["index.html".to_string()];
        for i in 0..asset_count {
            let ext = ["js", "css", "png", "svg"][i % 4];
            let name = format!("assets/chunk_{i}.{ext}");
            fs::write(web_root.join(&name), vec![b'x'; 512])?;
            relative.push(name);
        }

        let requests = relative
            .iter()
            .map(|name| Url::parse(&format!("https://0.0.0.0/{name}")))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        Ok(Self {
            _temp_dir: temp_dir,
            web_root,
            relative,
            requests,
        })
    }

    fn session(&self) -> VirtualHostSession {
        VirtualHostSession::new(self.web_root.join("index.html")).expect("session")
    }
}

fn manual_pattern(web_root: &Path, files: &[String]) {
    for file in files {
        let root = soft_canonicalize(web_root).unwrap();
        let canon = soft_canonicalize(web_root.join(black_box(file))).unwrap();
        if !canon.starts_with(&root) || !canon.is_file() {
            panic!("Escape attempt!");
        }
        black_box(fs::File::open(&canon).unwrap());
    }
}

fn session_pattern(session: &VirtualHostSession, requests: &[Url]) {
    for request in requests {
        let response = session.try_resolve(black_box(request)).unwrap();
        black_box(response);
    }
}

fn bench_page_load(c: &mut Criterion) {
    for assets in [10usize, 100] {
        let workload = PageLoadWorkload::new(assets).expect("Failed to create workload");
        let session = workload.session();
        let n = workload.requests.len() as u64;

        let mut group = c.benchmark_group(format!("page_load_{assets}_assets"));
        group.throughput(Throughput::Elements(n));

        group.bench_function("manual_soft_canonicalize", |b| {
            b.iter(|| manual_pattern(&workload.web_root, &workload.relative));
        });

        group.bench_function("session_try_resolve", |b| {
            b.iter(|| session_pattern(&session, &workload.requests));
        });

        group.finish();
    }
}

fn bench_rejections(c: &mut Criterion) {
    let workload = PageLoadWorkload::new(4).expect("Failed to create workload");
    let session = workload.session();
    let hostile: Vec<Url> = [
        "https://0.0.0.0/..%2F..%2F..%2Fetc%2Fpasswd",
        "https://0.0.0.0/assets/..%2F..%2Fsecret.txt",
        "https://0.0.0.0/does/not/exist.js",
        "https://0.0.0.0/assets/",
    ]
    .iter()
    .map(|s| Url::parse(s).expect("static url"))
    .collect();
    let foreign = Url::parse("https://example.com/index.html").expect("static url");

    let mut group = c.benchmark_group("rejections");
    group.bench_function("not_found_responses", |b| {
        b.iter(|| session_pattern(&session, &hostile));
    });
    group.bench_function("foreign_host_passthrough", |b| {
        b.iter(|| black_box(session.try_resolve(black_box(&foreign)).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_page_load, bench_rejections);
criterion_main!(benches);
