//! Build script to embed the built-in levels
//!
//! Scans assets/levels/ and generates a table of `(file_name, contents)`
//! pairs, since WASM can't enumerate directories at runtime. Levels are
//! played in file-name order.

use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=assets/levels");

    let levels_dir = Path::new("assets/levels");

    let mut files: Vec<String> = Vec::new();
    if let Ok(entries) = fs::read_dir(levels_dir) {
        files = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext.to_ascii_lowercase() == "ron")
                    .unwrap_or(false)
            })
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
    }
    files.sort();

    let mut table = String::from("&[\n");
    for name in &files {
        table.push_str(&format!(
            "    ({:?}, include_str!(concat!(env!(\"CARGO_MANIFEST_DIR\"), \"/assets/levels/{}\"))),\n",
            name, name
        ));
    }
    table.push(']');

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let out_path = Path::new(&out_dir).join("builtin_levels.rs");
    let mut file = fs::File::create(&out_path).expect("create builtin_levels.rs");
    file.write_all(table.as_bytes()).expect("write builtin_levels.rs");
}
