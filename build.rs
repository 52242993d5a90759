use std::path::{Path, PathBuf};
use std::process::Command;

const MAX_LINES: usize = 750;

const CHECKED_EXTENSIONS: &[&str] = &["rs", "yaml", "toml"];

const EXCLUDED_DIRS: &[&str] = &["target", ".git", "examples"];

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/main");

    let sha = git_output(&["rev-parse", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=SIGNDESK_GIT_SHA={}", sha);

    let root = PathBuf::from(
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set"),
    );
    let files = collect_files_to_check(&root);
    for file in &files {
        println!("cargo:rerun-if-changed={}", file.display());
    }

    let rust_sources: Vec<(PathBuf, String)> = files
        .iter()
        .filter(|p| {
            p.extension().and_then(|e| e.to_str()) == Some("rs")
                && p.file_name().and_then(|n| n.to_str()) != Some("build.rs")
        })
        .filter_map(|p| {
            let rel = p.strip_prefix(&root).unwrap_or(p).to_path_buf();
            std::fs::read_to_string(p).ok().map(|content| (rel, content))
        })
        .collect();

    enforce_line_limits(&root, &files);
    enforce_no_dead_code_allows(&rust_sources);
    enforce_serial_for_env_mutations(&rust_sources);
}

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn collect_files_to_check(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_directory(root, &mut files);
    files.sort();
    files
}

fn walk_directory(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if path.is_dir() {
            if !EXCLUDED_DIRS.contains(&name) {
                walk_directory(&path, files);
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| CHECKED_EXTENSIONS.contains(&ext))
            && name != "Cargo.lock"
        {
            files.push(path);
        }
    }
}

fn count_non_empty_lines(content: &str) -> usize {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count()
}

fn enforce_line_limits(root: &Path, files: &[PathBuf]) {
    let violations: Vec<(PathBuf, usize)> = files
        .iter()
        .filter_map(|file| {
            let count = count_non_empty_lines(&std::fs::read_to_string(file).ok()?);
            (count > MAX_LINES).then(|| (file.strip_prefix(root).unwrap_or(file).to_path_buf(), count))
        })
        .collect();

    if violations.is_empty() {
        return;
    }

    eprintln!("\n========================================");
    eprintln!("FILE LINE LIMIT EXCEEDED (max {} lines)", MAX_LINES);
    eprintln!("========================================");
    for (path, lines) in &violations {
        eprintln!(
            "  {} - {} lines (exceeds by {})",
            path.display(),
            lines,
            lines - MAX_LINES
        );
    }
    eprintln!("\nPlease split these files into smaller modules.\n");
    panic!(
        "Build failed: {} file(s) exceed the {} line limit",
        violations.len(),
        MAX_LINES
    );
}

fn enforce_no_dead_code_allows(sources: &[(PathBuf, String)]) {
    let mut violations = Vec::new();
    for (path, content) in sources {
        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if (trimmed.starts_with("#[allow(") || trimmed.starts_with("#![allow("))
                && trimmed.contains("dead_code")
            {
                violations.push(format!("{}:{}  {}", path.display(), line_num + 1, trimmed));
            }
        }
    }

    if violations.is_empty() {
        return;
    }

    eprintln!("\n========================================");
    eprintln!("#[allow(dead_code)] IS NOT ALLOWED");
    eprintln!("========================================");
    for violation in &violations {
        eprintln!("  {}", violation);
    }
    eprintln!("\nDelete unused code, or gate test-only code with #[cfg(test)].\n");
    panic!(
        "Build failed: {} #[allow(dead_code)] occurrence(s) found. Remove the dead code.",
        violations.len()
    );
}

/// Tests that touch process environment variables must run under `#[serial]`.
fn enforce_serial_for_env_mutations(sources: &[(PathBuf, String)]) {
    let mut violations = Vec::new();

    for (path, content) in sources {
        let mut has_serial = false;
        let mut in_test_fn = false;
        let mut brace_depth = 0i32;
        let mut test_line = 0;

        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed == "#[serial]" || trimmed == "#[serial_test::serial]" {
                has_serial = true;
            }
            if trimmed == "#[test]" || trimmed.starts_with("#[tokio::test") {
                in_test_fn = true;
                brace_depth = 0;
                test_line = i + 1;
                continue;
            }
            if !in_test_fn {
                continue;
            }

            if !has_serial
                && !trimmed.starts_with("//")
                && (trimmed.contains("env::set_var") || trimmed.contains("env::remove_var"))
            {
                violations.push(format!("{}:{}", path.display(), test_line));
                in_test_fn = false;
                continue;
            }

            for c in line.chars() {
                match c {
                    '{' => brace_depth += 1,
                    '}' => {
                        brace_depth -= 1;
                        if brace_depth == 0 {
                            in_test_fn = false;
                            has_serial = false;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    if violations.is_empty() {
        return;
    }

    eprintln!("\n========================================");
    eprintln!("ENV MUTATIONS REQUIRE #[serial]");
    eprintln!("========================================");
    for violation in &violations {
        eprintln!("  {}", violation);
    }
    eprintln!("\nAdd #[serial] from the serial_test crate to these tests.\n");
    panic!(
        "Build failed: {} test(s) mutate env vars without #[serial].",
        violations.len()
    );
}
