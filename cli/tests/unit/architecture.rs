//! Layer boundaries: the domain stays pure and the application layer only
//! talks to infrastructure through its ports.

use std::path::{Path, PathBuf};

fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).expect("readable source dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            out.extend(rust_files(&path));
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(path);
        }
    }
    out
}

fn src(layer: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer)
}

fn assert_no_imports(layer: &str, forbidden: &[&str]) {
    let files = rust_files(&src(layer));
    assert!(!files.is_empty(), "no sources found for {layer}");
    for file in files {
        let text = std::fs::read_to_string(&file).expect("readable source");
        let code: Vec<&str> = text
            .lines()
            .filter(|l| !l.trim_start().starts_with("//"))
            .collect();
        for needle in forbidden {
            assert!(
                !code.iter().any(|l| l.contains(needle)),
                "{} must not use `{needle}`",
                file.display()
            );
        }
    }
}

#[test]
fn domain_is_free_of_io_and_outer_layers() {
    assert_no_imports(
        "domain",
        &[
            "crate::application",
            "crate::infra",
            "crate::commands",
            "crate::output",
            "tokio::",
            "std::fs",
            "std::process",
        ],
    );
}

#[test]
fn application_depends_only_on_domain_and_ports() {
    assert_no_imports(
        "application",
        &[
            "crate::infra",
            "crate::commands",
            "crate::output",
            "crate::app::",
            "std::fs",
            "tokio::",
        ],
    );
}

#[test]
fn output_does_not_reach_into_infrastructure() {
    assert_no_imports("output", &["crate::infra", "crate::commands"]);
}
