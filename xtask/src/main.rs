//! Build and packaging tasks for Decaf Rising
//!
//! Usage:
//!   cargo xtask build-web            # WASM build + page + assets into dist/web
//!   cargo xtask package-web          # Zip dist/web for upload
//!   cargo xtask package-native       # Release binary + assets into dist/native/<os>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

const BIN_NAME: &str = "decaf-rising";
const MQ_JS_BUNDLE: &str =
    "https://raw.githubusercontent.com/not-fl3/macroquad/v0.4.14/js/mq_js_bundle.js";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for Decaf Rising")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the WASM bundle with a minimal host page
    BuildWeb {
        /// Keep the debug overlay enabled in the generated config
        #[arg(long)]
        debug_overlay: bool,
    },
    /// Build the web bundle and zip it
    PackageWeb,
    /// Build a native release with its assets
    PackageNative,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildWeb { debug_overlay } => build_web(debug_overlay),
        Commands::PackageWeb => package_web(),
        Commands::PackageNative => package_native(),
    }
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}

fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

fn fresh_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("removing {}", dir.display()))?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

fn index_html() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Decaf Rising</title>
<style>
html, body, canvas {{ margin: 0; padding: 0; width: 100%; height: 100%; overflow: hidden; background: #000; }}
</style>
</head>
<body>
<canvas id="glcanvas" tabindex="1"></canvas>
<script src="mq_js_bundle.js"></script>
<script>load("{bin}.wasm");</script>
</body>
</html>
"#,
        bin = BIN_NAME
    )
}

fn build_web(debug_overlay: bool) -> Result<()> {
    let root = project_root()?;
    let dist = root.join("dist/web");

    println!("Building WASM...");
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--target", "wasm32-unknown-unknown"]),
    )?;

    fresh_dir(&dist)?;

    let wasm = format!("{}.wasm", BIN_NAME);
    std::fs::copy(
        root.join("target/wasm32-unknown-unknown/release").join(&wasm),
        dist.join(&wasm),
    )
    .context("copying wasm binary")?;

    std::fs::write(dist.join("index.html"), index_html())?;

    let mq_js = dist.join("mq_js_bundle.js");
    println!("Downloading {}...", MQ_JS_BUNDLE);
    run_cmd(Command::new("curl").args(["-L", "-o"]).arg(&mq_js).arg(MQ_JS_BUNDLE))?;

    copy_dir_recursive(&root.join("assets"), &dist.join("assets"))?;

    if debug_overlay {
        // Levels are compiled in, so only config.ron needs rewriting
        let config_path = dist.join("assets/config.ron");
        let config = std::fs::read_to_string(&config_path).unwrap_or_else(|_| "()".to_string());
        let config = if config.contains("show_debug") {
            config.replace("show_debug: false", "show_debug: true")
        } else {
            config.replacen('(', "(\n    show_debug: true,", 1)
        };
        std::fs::write(&config_path, config)?;
    }

    println!("Web build complete: dist/web/");
    Ok(())
}

fn package_web() -> Result<()> {
    build_web(false)?;

    let root = project_root()?;
    let dist = root.join("dist");
    let zip_name = format!("{}-web.zip", BIN_NAME);
    let zip_path = dist.join(&zip_name);

    if zip_path.exists() {
        std::fs::remove_file(&zip_path)?;
    }

    println!("Creating {}...", zip_name);
    run_cmd(
        Command::new("zip")
            .current_dir(dist.join("web"))
            .arg("-r")
            .arg(format!("../{}", zip_name))
            .arg("."),
    )?;

    println!("Web package ready: dist/{}", zip_name);
    Ok(())
}

fn package_native() -> Result<()> {
    let root = project_root()?;
    let os = std::env::consts::OS;
    let dist = root.join("dist/native").join(os);

    println!("Building native release for {}...", os);
    run_cmd(Command::new("cargo").current_dir(&root).args(["build", "--release"]))?;

    fresh_dir(&dist)?;

    let binary = format!("{}{}", BIN_NAME, std::env::consts::EXE_SUFFIX);
    std::fs::copy(root.join("target/release").join(&binary), dist.join(&binary))
        .context("copying native binary")?;

    copy_dir_recursive(&root.join("assets"), &dist.join("assets"))?;

    println!("Native build complete: dist/native/{}/", os);
    Ok(())
}
