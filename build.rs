//! Build script for fuzzykit
//!
//! Embeds version and target information in the binary.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Set version for embedding
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    println!("cargo:rustc-env=FUZZYKIT_VERSION={}", version);

    // Emit target info
    if let Ok(target) = env::var("TARGET") {
        println!("cargo:rustc-env=FUZZYKIT_TARGET={}", target);
    }
}
