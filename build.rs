//! Build script for recipewise
//!
//! Bumps the local build counter and embeds build metadata.

use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let counter = Path::new("build_number.txt");

    let previous: u64 = fs::read_to_string(counter)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let build = previous + 1;

    fs::write(counter, build.to_string()).expect("Failed to write build number file");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=RECIPEWISE_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=RECIPEWISE_BUILD_TIMESTAMP={}", timestamp);
}
