// Shared helpers for integration tests.
//
// Provides a fake system (PATH, package manager, git, curl and installer
// scripts) backed by a temporary home directory, so a whole bootstrap can
// run twice without touching the host.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use zsh_bootstrap::config::Config;
use zsh_bootstrap::exec::{ExecResult, Executor};
use zsh_bootstrap::logging::{Log, Logger};
use zsh_bootstrap::platform::{OsProfile, OsRelease};
use zsh_bootstrap::tasks::{Context, Paths};

/// Stock framework template written by the fake oh-my-zsh installer.
pub const TEMPLATE: &str = "\
# Path to your oh-my-zsh installation.
export ZSH=\"$HOME/.oh-my-zsh\"

ZSH_THEME=\"robbyrussell\"

plugins=(git)

source $ZSH/oh-my-zsh.sh

# User configuration
";

/// Binary a package puts on PATH when it differs from the package name.
fn binary_for(package: &str) -> &str {
    match package {
        "ripgrep" => "rg",
        "fd-find" => "fdfind",
        "bat" => "batcat",
        "fontconfig" => "fc-cache",
        "util-linux-user" | "passwd" => "chsh",
        other => other,
    }
}

/// A fake system that simulates the side effects of every external command
/// the bootstrapper runs.
///
/// - `apt-get install -y <pkg>` puts the package's binary on PATH
/// - `git clone <url> <dest>` creates `dest`
/// - `curl -o <file>` writes `file`
/// - `sh <script>` with `ZSH` set creates the framework and its template;
///   without it, puts `zoxide` on PATH
///
/// Any command whose line contains a string registered with
/// [`failing`](Self::failing) fails without side effects.
#[derive(Debug, Default)]
pub struct FakeSystem {
    present: Mutex<HashSet<String>>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeSystem {
    /// A host with the bare essentials on PATH.
    pub fn new() -> Self {
        Self::default().with_binaries(&["zsh", "git", "curl", "sh"])
    }

    pub fn with_binaries(self, names: &[&str]) -> Self {
        for name in names {
            self.add(name);
        }
        self
    }

    pub fn without_binary(self, name: &str) -> Self {
        self.present.lock().expect("lock").remove(name);
        self
    }

    pub fn failing(mut self, needle: &str) -> Self {
        self.failing.push(needle.to_string());
        self
    }

    fn add(&self, name: &str) {
        self.present.lock().expect("lock").insert(name.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("lock").clear();
    }

    fn simulate(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> anyhow::Result<ExecResult> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().expect("lock").push(line.clone());
        if self.failing.iter().any(|f| line.contains(f.as_str())) {
            anyhow::bail!("{program} failed (exit 1): simulated failure");
        }

        match (program, args) {
            ("apt-get", ["install", "-y", package]) => self.add(binary_for(package)),
            ("git", ["clone", .., dest]) => std::fs::create_dir_all(dest)?,
            ("curl", [.., "-o", dest, _url]) => std::fs::write(dest, "downloaded")?,
            ("sh", _) => {
                if let Some((_, zsh)) = env.iter().find(|(k, _)| *k == "ZSH") {
                    let templates = Path::new(zsh).join("templates");
                    std::fs::create_dir_all(&templates)?;
                    std::fs::write(templates.join("zshrc.zsh-template"), TEMPLATE)?;
                } else {
                    self.add("zoxide");
                }
            }
            _ => {}
        }
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }
}

impl Executor for FakeSystem {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.simulate(program, args, &[])
    }

    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> anyhow::Result<ExecResult> {
        self.simulate(program, args, env)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.simulate(program, args, &[]).unwrap_or_else(|e| ExecResult {
            stdout: String::new(),
            stderr: e.to_string(),
            success: false,
            code: Some(1),
        }))
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> anyhow::Result<()> {
        self.simulate(program, args, &[]).map(|_| ())
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.present
            .lock()
            .expect("lock")
            .contains(program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }
}

/// Debian profile running as root.
pub fn debian() -> OsProfile {
    OsProfile::from_os_release(&OsRelease::parse("ID=debian\nVERSION_ID=\"12\"\n"))
        .expect("debian is supported")
}

/// Build a fresh context (empty report) over `home` and `system`.
pub fn context(home: &Path, system: &Arc<FakeSystem>, log: &Arc<Logger>) -> Context {
    Context::new(
        Arc::new(Config::embedded().expect("embedded manifest parses")),
        Arc::new(debian()),
        Arc::clone(log) as Arc<dyn Log>,
        Arc::clone(system) as Arc<dyn Executor>,
        Paths::under_home(home),
    )
}
