// OutlierCrab - GPL-3.0-or-later
// Embeds the git revision into the binary's version string

use std::process::Command;

fn git(args: &[&str]) -> Option<Vec<u8>> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| output.stdout)
}

fn main() {
    let hash = git(&["rev-parse", "--short", "HEAD"])
        .and_then(|stdout| String::from_utf8(stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let dirty = git(&["status", "--porcelain"]).is_some_and(|stdout| !stdout.is_empty());
    let hash = if dirty { format!("{hash}-dirty") } else { hash };

    println!("cargo:rustc-env=GIT_HASH={hash}");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
}
