//! Entry point for the sysload TUI. Parses args, resolves the profile and runs the App.

mod app;
mod ui;

use app::App;
use std::env;
use std::io::{self, Write};
use std::time::Duration;
use sysload::history::DEFAULT_CAPACITY;
use sysload::profiles::{load_profiles, save_profiles, ProfileEntry, ProfileRequest, ResolveProfile};
use tracing_subscriber::EnvFilter;

const USAGE_ARGS: &str =
    "[--profile NAME|-P NAME] [--capacity N|-c N] [--save] [--demo] [--dry-run] [ws://HOST:PORT/ws]";

#[derive(Debug, Default, PartialEq)]
struct ParsedArgs {
    url: Option<String>,
    profile: Option<String>,
    capacity: Option<usize>,
    save: bool,
    demo: bool,
    dry_run: bool,
}

fn parse_capacity(v: &str) -> Result<usize, String> {
    match v.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Invalid capacity {v:?}: expected a positive integer")),
    }
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "sysload".into());
    let mut parsed = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Err(format!("Usage: {prog} {USAGE_ARGS}"));
            }
            "--profile" | "-P" => {
                parsed.profile = it.next();
            }
            "--capacity" | "-c" => {
                let v = it.next().unwrap_or_default();
                parsed.capacity = Some(parse_capacity(&v)?);
            }
            "--save" => parsed.save = true,
            "--demo" => parsed.demo = true,
            "--dry-run" => parsed.dry_run = true,
            _ if arg.starts_with("--profile=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.profile = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--capacity=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    parsed.capacity = Some(parse_capacity(v)?);
                }
            }
            _ => {
                if parsed.url.is_none() {
                    parsed.url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. Usage: {prog} {USAGE_ARGS}"));
                }
            }
        }
    }
    Ok(parsed)
}

// Logs go to $SYSLOAD_LOG only; the TUI owns the terminal
fn init_logging() {
    let Some(path) = env::var_os("SYSLOAD_LOG") else {
        return;
    };
    let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };
    init_logging();

    if parsed.demo || matches!(parsed.profile.as_deref(), Some("demo")) {
        return run_demo_mode(parsed.capacity.unwrap_or(DEFAULT_CAPACITY), parsed.dry_run).await;
    }

    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        capacity: parsed.capacity,
    };
    let resolved = req.resolve(&profiles_file);

    let mut profiles_mut = profiles_file.clone();
    let entry: ProfileEntry = match resolved {
        ResolveProfile::Direct(entry) => {
            if let Some(name) = parsed.profile.as_ref() {
                match profiles_mut.profiles.get(name) {
                    None => {
                        // New profile: auto-save immediately
                        profiles_mut.profiles.insert(name.clone(), entry.clone());
                        save_profiles(&profiles_mut)?;
                    }
                    Some(existing) if *existing != entry => {
                        let overwrite = parsed.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ));
                        if overwrite {
                            profiles_mut.profiles.insert(name.clone(), entry.clone());
                            save_profiles(&profiles_mut)?;
                        }
                    }
                    Some(_) => {}
                }
            }
            entry
        }
        ResolveProfile::Loaded(entry) => entry,
        ResolveProfile::PromptSelect(mut names) => {
            if !names.iter().any(|n| n == "demo") {
                names.push("demo".into());
            }
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let Some(name) = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
            else {
                return Ok(());
            };
            if name == "demo" {
                return run_demo_mode(parsed.capacity.unwrap_or(DEFAULT_CAPACITY), parsed.dry_run)
                    .await;
            }
            match profiles_mut.profiles.get(name) {
                Some(entry) => ProfileEntry {
                    url: entry.url.clone(),
                    capacity: parsed.capacity.or(entry.capacity),
                },
                None => return Ok(()),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter URL (ws://HOST:PORT/ws or wss://...): ")?;
            if url.trim().is_empty() {
                return Ok(());
            }
            let entry = ProfileEntry {
                url: url.trim().to_string(),
                capacity: parsed.capacity,
            };
            profiles_mut.profiles.insert(name, entry.clone());
            save_profiles(&profiles_mut)?;
            entry
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(());
        }
    };

    let capacity = entry.capacity.unwrap_or(DEFAULT_CAPACITY);
    if parsed.dry_run {
        println!("url={} capacity={capacity}", entry.url);
        return Ok(());
    }
    let mut app = App::new(&entry.url, capacity)?;
    app.run().await
}

fn prompt_yes_no(prompt: &str) -> bool {
    match prompt_string(prompt) {
        Ok(line) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

// --- Demo Mode ---

async fn run_demo_mode(capacity: usize, dry_run: bool) -> anyhow::Result<()> {
    let port = 3231;
    let url = format!("ws://127.0.0.1:{port}/ws");
    if dry_run {
        println!("url={url} capacity={capacity}");
        return Ok(());
    }
    let agent = spawn_demo_agent(port)?;
    // Give the agent a brief moment to bind
    tokio::time::sleep(Duration::from_millis(300)).await;
    // Raw mode delivers Ctrl-C as a key, so run() always reaches its teardown
    let mut app = App::new(&url, capacity)?;
    let res = app.run().await;
    drop(agent);
    res
}

// Kills the demo agent when dropped
struct DemoGuard(std::process::Child);

impl Drop for DemoGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn spawn_demo_agent(port: u16) -> io::Result<DemoGuard> {
    let mut cmd = std::process::Command::new(find_agent_executable());
    cmd.arg("--port").arg(port.to_string());
    cmd.stdout(std::process::Stdio::null());
    cmd.stderr(std::process::Stdio::null());
    Ok(DemoGuard(cmd.spawn()?))
}

fn find_agent_executable() -> std::path::PathBuf {
    #[cfg(windows)]
    let name = "sysload_agent.exe";
    #[cfg(not(windows))]
    let name = "sysload_agent";
    if let Some(parent) = env::current_exe().ok().as_deref().and_then(|p| p.parent()) {
        let candidate = parent.join(name);
        if candidate.exists() {
            return candidate;
        }
    }
    // Fallback to relying on PATH
    std::path::PathBuf::from(name)
}
