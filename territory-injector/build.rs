//! Stamps the binary with a one-line build identity, shown at the top of
//! every session log so an injected file can be traced to the tool build
//! that produced it.
//!
//! `TERRITORY_INJECTOR_BUILD` reads `<commit>[+dirty] <profile> <date>`,
//! e.g. `3f9c21ab+dirty release 2025-11-02`.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");

    let commit = git(&["rev-parse", "--short=8", "HEAD"]).unwrap_or_else(|| "nogit".to_string());
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .map(|status| !status.is_empty())
        .unwrap_or(false);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let date = chrono::Local::now().format("%Y-%m-%d");

    println!(
        "cargo:rustc-env=TERRITORY_INJECTOR_BUILD={}{} {} {}",
        commit,
        if dirty { "+dirty" } else { "" },
        profile,
        date
    );
}
