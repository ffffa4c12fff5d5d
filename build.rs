//! Build script for datafingerprint: links a system DuckDB when the bundled copy is disabled

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=DUCKDB_LIB_PATH");

    // The parquet and json extensions are only available with the bundled build
    let bundled = ["CARGO_FEATURE_BUNDLED", "CARGO_FEATURE_PARQUET", "CARGO_FEATURE_JSON"]
        .iter()
        .any(|feature| env::var_os(feature).is_some());
    if bundled {
        return;
    }

    match find_duckdb_library() {
        Some(lib_path) => {
            println!("cargo:rustc-link-search=native={}", lib_path.display());
            println!("cargo:rustc-link-lib=duckdb");
            println!("cargo:warning=Linking system DuckDB from {}", lib_path.display());
        }
        None => {
            eprintln!("❌ DuckDB library not found!");
            eprintln!();
            eprintln!("Build with the bundled DuckDB (the default):");
            eprintln!("  cargo build");
            eprintln!("or point DUCKDB_LIB_PATH at the directory holding libduckdb.");
            panic!("DuckDB library not found");
        }
    }
}

fn find_duckdb_library() -> Option<PathBuf> {
    env::var_os("DUCKDB_LIB_PATH")
        .map(PathBuf::from)
        .into_iter()
        .chain(pkg_config_dirs())
        .chain(standard_dirs())
        .find(|dir| has_duckdb_library(dir))
}

fn pkg_config_dirs() -> Vec<PathBuf> {
    if cfg!(target_os = "windows") {
        return Vec::new();
    }

    Command::new("pkg-config")
        .args(["--libs-only-L", "duckdb"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| {
            String::from_utf8_lossy(&output.stdout)
                .split_whitespace()
                .filter_map(|flag| flag.strip_prefix("-L"))
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default()
}

fn standard_dirs() -> Vec<PathBuf> {
    let dirs: &[&str] = if cfg!(target_os = "macos") {
        &["/opt/homebrew/lib", "/usr/local/lib", "/opt/local/lib"]
    } else if cfg!(target_os = "windows") {
        &["C:\\Program Files\\DuckDB\\lib", "C:\\duckdb\\lib"]
    } else {
        &[
            "/usr/lib",
            "/usr/local/lib",
            "/usr/lib/x86_64-linux-gnu",
            "/usr/lib64",
        ]
    };
    dirs.iter().map(PathBuf::from).collect()
}

fn has_duckdb_library(dir: &Path) -> bool {
    let names: &[&str] = if cfg!(target_os = "windows") {
        &["duckdb.dll", "duckdb.lib"]
    } else if cfg!(target_os = "macos") {
        &["libduckdb.dylib", "libduckdb.a"]
    } else {
        &["libduckdb.so", "libduckdb.so.1", "libduckdb.a"]
    };
    names.iter().any(|name| dir.join(name).exists())
}
