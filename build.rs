use std::env;
use std::process::Command;

/// Run a git command, returning trimmed stdout on success.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    // 模板与静态资源变化时重新嵌入
    println!("cargo:rerun-if-changed=templates");
    println!("cargo:rerun-if-changed=assets");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    // 允许在没有 .git 的构建环境中手动注入
    if let Ok(commit) = env::var("LINKBOARD_GIT_COMMIT") {
        println!("cargo:rustc-env=LINKBOARD_GIT_COMMIT={}", commit);
        for key in ["LINKBOARD_GIT_COMMIT_TIME", "LINKBOARD_GIT_DIRTY"] {
            if let Ok(value) = env::var(key) {
                println!("cargo:rustc-env={}={}", key, value);
            }
        }
        return;
    }

    // 不在 git 仓库中时不导出任何变量，/health 返回空值
    let Some(commit) = git(&["rev-parse", "HEAD"]) else {
        println!("cargo:warning=git metadata unavailable, /health will report empty build info");
        return;
    };
    println!("cargo:rustc-env=LINKBOARD_GIT_COMMIT={}", commit);

    if let Some(time) = git(&["log", "-1", "--format=%cI"]) {
        println!("cargo:rustc-env=LINKBOARD_GIT_COMMIT_TIME={}", time);
    }

    let dirty = git(&["status", "--porcelain"])
        .map(|status| !status.is_empty())
        .unwrap_or(false);
    println!("cargo:rustc-env=LINKBOARD_GIT_DIRTY={}", dirty);
}
