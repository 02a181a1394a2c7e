//! Build script for gphotos-manifest.
//!
//! Injects build metadata (git revision, build date, compiler version) as
//! compile-time environment variables and copies the `.env.example` template
//! into the local data directory where the application looks for its `.env`.

use std::{env, fs, path::PathBuf, process::Command};

/// Runs a command and returns its trimmed stdout, if it succeeded.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let full_sha =
        command_output("git", &["rev-parse", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    let short_sha = command_output("git", &["rev-parse", "--short", "HEAD"])
        .unwrap_or_else(|| "unknown".to_string());
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rustc_version =
        command_output(&rustc, &["--version"]).unwrap_or_else(|| "unknown".to_string());
    let build_date = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    println!("cargo:rustc-env=GPM_GIT_SHA={full_sha}");
    println!("cargo:rustc-env=GPM_GIT_SHORT_SHA={short_sha}");
    println!("cargo:rustc-env=GPM_BUILD_DATE={build_date}");
    println!("cargo:rustc-env=GPM_RUSTC_VERSION={rustc_version}");

    // Where to copy FROM (crate root)
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("gphotos-manifest");

    // Only copy if the source exists and the data dir is writable; a read-only
    // home must not fail the build.
    if env_example_path.is_file() {
        let copied = fs::create_dir_all(&out_dir)
            .and_then(|_| fs::read_to_string(&env_example_path))
            .and_then(|contents| fs::write(out_dir.join(".env.example"), contents));
        if let Err(e) = copied {
            println!(
                "cargo:warning=could not copy .env.example to {}: {}",
                out_dir.display(),
                e
            );
        }
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
