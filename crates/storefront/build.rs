//! Build script for the storefront.
//!
//! Fingerprints `static/css/main.css` so the layout can link an immutable
//! `main.{hash}.css`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by Cargo"));
    let css_dir = manifest_dir.join("static/css");
    let hash = fingerprint(&css_dir, "main", "css");
    println!("cargo:rustc-env=CSS_HASH={hash}");
}

/// Copy `{dir}/{stem}.{ext}` to `{dir}/derived/{stem}.{hash}.{ext}` and
/// return the hash. Older fingerprints of the same file are removed.
fn fingerprint(dir: &Path, stem: &str, ext: &str) -> String {
    let source = dir.join(format!("{stem}.{ext}"));
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", source.display());
            return String::new();
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let hash = digest.get(..HASH_LEN).unwrap_or(&digest).to_string();

    let derived = dir.join("derived");
    fs::create_dir_all(&derived).expect("Failed to create derived asset directory");

    let target_name = format!("{stem}.{hash}.{ext}");
    if let Ok(entries) = fs::read_dir(&derived) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&format!("{stem}.")) && name.ends_with(ext) && name != target_name {
                let _ = fs::remove_file(entry.path());
            }
        }
    }

    fs::copy(&source, derived.join(&target_name)).expect("Failed to copy fingerprinted asset");
    hash
}
