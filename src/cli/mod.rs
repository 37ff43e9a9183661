//! CLI command implementations for growthdash.
//!
//! Provides subcommand handlers for:
//! - `growthdash sentiment|benchmark|pricing|...` — one module submission
//! - `growthdash campaign|pitch|lead-score` — one generator hub submission
//! - `growthdash chat` — interactive chat session
//! - `growthdash dashboard` — sidebar navigation, module forms and chat, with
//!   the health poller running in the background
//! - `growthdash health [--watch]` — backend health check
//! - `growthdash status` — check `/health` and every module endpoint
//! - `growthdash activity` — recent activity log entries
//! - `growthdash config show|init|set|reset` — configuration management

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Value, json};

use crate::activity::{ActivityEvent, ActivityLog};
use crate::api::{ApiClient, Transport};
use crate::chat::{ChatSession, ChatStatus, Sender};
use crate::config::{self, DashConfig};
use crate::health::{self, HealthPoller, HealthReport};
use crate::modules::{FormInput, ModuleKind, SubmitStatus};
use crate::nav::NavController;
use crate::render::{Panel, terminal};

/// Output format for every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// growthdash <module>
// ---------------------------------------------------------------------------

/// Submit one module with positional field values and print its panel.
///
/// A failed submission is still a successful command: the error is what the
/// panel shows.
pub fn run_module(
    config: &DashConfig,
    kind: ModuleKind,
    values: &[String],
    format: OutputFormat,
) -> Result<()> {
    let client = ApiClient::from_config(&config.api);
    let activity = ActivityLog::from_config(&config.logging);

    let form = form_from_values(kind, values);
    let mut panel = kind.panel();
    submit_logged(kind, &client, &form, &mut panel, &activity);
    show_panel(kind, &panel, format);

    Ok(())
}

/// Fill a module's fields, in declaration order, from `values`. Missing
/// values leave the field unset (read as empty text).
pub fn form_from_values(kind: ModuleKind, values: &[String]) -> FormInput {
    let mut form = FormInput::new();
    for ((id, _), value) in kind.fields().iter().zip(values) {
        form.set(*id, value.as_str());
    }
    form
}

/// Run the module pipeline and record it in the activity log.
pub fn submit_logged(
    kind: ModuleKind,
    transport: &dyn Transport,
    form: &FormInput,
    panel: &mut Panel,
    activity: &ActivityLog,
) -> SubmitStatus {
    let started = Instant::now();
    let status = kind.submit(transport, form, panel);
    activity.record(&ActivityEvent::submission(kind, &status, elapsed_ms(started)));
    status
}

fn show_panel(kind: ModuleKind, panel: &Panel, format: OutputFormat) {
    match format {
        OutputFormat::Table => terminal::print_panel(kind.name(), panel),
        OutputFormat::Json => terminal::print_panel_json(kind.name(), panel),
    }
}

// ---------------------------------------------------------------------------
// growthdash chat
// ---------------------------------------------------------------------------

/// Interactive chat on stdin. Ends on EOF or `/quit`.
pub fn run_chat(config: &DashConfig, format: OutputFormat) -> Result<()> {
    let client = ApiClient::from_config(&config.api);
    let activity = ActivityLog::from_config(&config.logging);
    let mut session = ChatSession::new();

    if format == OutputFormat::Table {
        println!("{}", "AI Chatbot".bold().cyan());
        println!("{}", "=".repeat(50));
        println!("  {}", "Type a message, /quit to leave.".dimmed());
        println!();
    }

    let stdin = io::stdin();
    chat_loop(&mut stdin.lock(), &mut session, &client, &activity, format)
}

/// Read chat messages from `input` until EOF, `/quit` or `/back`.
fn chat_loop<R: BufRead>(
    input: &mut R,
    session: &mut ChatSession,
    transport: &dyn Transport,
    activity: &ActivityLog,
    format: OutputFormat,
) -> Result<()> {
    while let Some(mut line) = prompt(input, "you")? {
        if matches!(line.trim(), "/quit" | "/back") {
            break;
        }

        let before = session.log().len();
        let started = Instant::now();
        let status = session.submit(transport, &mut line);
        if status != ChatStatus::Ignored {
            activity.record(&ActivityEvent::chat(&status, elapsed_ms(started)));
        }

        for entry in &session.log()[before..] {
            match format {
                OutputFormat::Table if entry.sender == Sender::Bot => {
                    terminal::print_chat_line(entry);
                }
                OutputFormat::Table => {}
                OutputFormat::Json => println!(
                    "{}",
                    json!({ "sender": entry.sender.to_string(), "text": entry.text })
                ),
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// growthdash dashboard
// ---------------------------------------------------------------------------

/// Interactive dashboard on stdin. The health poller (if enabled) runs for
/// as long as the dashboard is open.
pub fn run_dashboard(config: &DashConfig, format: OutputFormat) -> Result<()> {
    let client = ApiClient::from_config(&config.api);
    let activity = ActivityLog::from_config(&config.logging);

    let poller = config.health.enabled.then(|| {
        let sink_log = activity.clone();
        HealthPoller::from_secs(config.health.interval_secs)
            .start(client.clone(), move |report| {
                deliver_health(&report, &sink_log, &mut io::stderr())
            })
    });

    let mut dashboard = Dashboard::new();
    let stdin = io::stdin();
    let result = dashboard.run(&mut stdin.lock(), &client, &activity, format);

    if let Some(handle) = poller {
        handle.stop();
    }
    result
}

/// Terminal dashboard state: sidebar, one panel per module, chat session.
#[derive(Debug, Clone)]
pub struct Dashboard {
    nav: NavController,
    panels: Vec<Panel>,
    chat: ChatSession,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            nav: NavController::dashboard(),
            panels: ModuleKind::ALL.iter().map(|k| k.panel()).collect(),
            chat: ChatSession::new(),
        }
    }

    pub fn nav(&self) -> &NavController {
        &self.nav
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn panel(&self, kind: ModuleKind) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id() == kind.panel_id())
    }

    /// Read commands from `input` until EOF or `q`.
    ///
    /// A command selects a sidebar entry by number (`3`), fragment
    /// (`#pricing`) or bare id (`pricing`). Module sections then prompt for
    /// each field and submit; the chat section runs until `/back`.
    pub fn run<R: BufRead>(
        &mut self,
        input: &mut R,
        transport: &dyn Transport,
        activity: &ActivityLog,
        format: OutputFormat,
    ) -> Result<()> {
        self.print_sidebar();

        while let Some(line) = prompt(input, "dashboard")? {
            let choice = line.trim();
            match choice {
                "" => continue,
                "q" | "quit" | "exit" => break,
                "?" | "help" | "menu" => {
                    self.print_sidebar();
                    continue;
                }
                _ => {}
            }

            let Some((id, module)) = self.select(choice) else {
                println!("  {} no section '{}'", "!".yellow().bold(), choice);
                continue;
            };

            match module {
                Some(kind) => {
                    let Some(form) = read_form(input, kind)? else {
                        break;
                    };
                    let Some(index) = ModuleKind::ALL.iter().position(|k| *k == kind) else {
                        continue;
                    };
                    submit_logged(kind, transport, &form, &mut self.panels[index], activity);
                    show_panel(kind, &self.panels[index], format);
                }
                None => {
                    println!("{} {}", "→".cyan(), id.bold());
                    chat_loop(input, &mut self.chat, transport, activity, format)?;
                }
            }
        }
        Ok(())
    }

    fn select(&mut self, choice: &str) -> Option<(String, Option<ModuleKind>)> {
        let section = if choice.starts_with('#') {
            self.nav.click_href(choice)
        } else if let Ok(n) = choice.parse::<usize>() {
            self.nav.click(n.checked_sub(1)?)
        } else {
            self.nav.click_href(&format!("#{choice}"))
        };
        section.map(|s| (s.id.clone(), s.module))
    }

    fn print_sidebar(&self) {
        println!("{}", "AI Business Growth Platform".bold().cyan());
        println!("{}", "=".repeat(50));
        for (i, link) in self.nav.links().iter().enumerate() {
            let marker = if link.active { "›".green().bold() } else { " ".normal() };
            println!(
                "  {} {:>2}. {:<24} {}",
                marker,
                i + 1,
                link.label,
                link.href.dimmed()
            );
        }
        println!("  {}", "Pick a section by number or #id; q to quit.".dimmed());
        println!();
    }
}

/// Prompt for each field of `kind`. `None` on EOF.
fn read_form<R: BufRead>(input: &mut R, kind: ModuleKind) -> Result<Option<FormInput>> {
    let mut form = FormInput::new();
    for (id, label) in kind.fields() {
        let Some(value) = prompt(input, label)? else {
            return Ok(None);
        };
        form.set(*id, value);
    }
    Ok(Some(form))
}

/// Print `label › ` and read one line without its line ending. `None` on
/// EOF.
fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<Option<String>> {
    print!("{} {} ", label.bold(), "›".dimmed());
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        println!();
        return Ok(None);
    }

    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

// ---------------------------------------------------------------------------
// growthdash health
// ---------------------------------------------------------------------------

/// One health check, or (with `watch`) a check now and then one every
/// configured interval until the process is interrupted.
pub fn run_health(config: &DashConfig, watch: bool, format: OutputFormat) -> Result<()> {
    let client = ApiClient::from_config(&config.api);
    let activity = ActivityLog::from_config(&config.logging);

    let report = health::check_once(&client);
    activity.record(&ActivityEvent::health(&report));
    print_health_report(&report, format);

    if !watch {
        return Ok(());
    }

    let poller = HealthPoller::from_secs(config.health.interval_secs);
    if format == OutputFormat::Table {
        println!(
            "  {}",
            format!("Polling every {}s. Press Ctrl+C to stop.", poller.interval().as_secs()).dimmed()
        );
    }

    let _handle = poller.start(client, move |report| {
        activity.record(&ActivityEvent::health(&report));
        print_health_report(&report, format);
    });

    loop {
        thread::park();
    }
}

/// Route a background health report: into the activity log when it is
/// enabled, otherwise as a dimmed line on `out`.
fn deliver_health(report: &HealthReport, activity: &ActivityLog, out: &mut impl Write) {
    if activity.path().is_some() {
        activity.record(&ActivityEvent::health(report));
    } else {
        let _ = writeln!(out, "{}", health_line(report).dimmed());
    }
}

fn health_line(report: &HealthReport) -> String {
    let stamp = report.checked_at.format("%H:%M:%S");
    match &report.outcome {
        Ok(body) => format!("[{stamp}] health ok: {body}"),
        Err(err) => format!("[{stamp}] health failed: {err}"),
    }
}

fn print_health_report(report: &HealthReport, format: OutputFormat) {
    let stamp = report.checked_at.format("%Y-%m-%d %H:%M:%S").to_string();
    match (format, &report.outcome) {
        (OutputFormat::Json, Ok(body)) => println!(
            "{}",
            json!({ "checked_at": report.checked_at.to_rfc3339(), "ok": true, "body": body })
        ),
        (OutputFormat::Json, Err(err)) => println!(
            "{}",
            json!({ "checked_at": report.checked_at.to_rfc3339(), "ok": false, "error": err })
        ),
        (OutputFormat::Table, Ok(body)) => {
            println!("  {} {} {}", "✓".green().bold(), stamp.dimmed(), body)
        }
        (OutputFormat::Table, Err(err)) => {
            println!("  {} {} {}", "✗".red().bold(), stamp.dimmed(), err.red())
        }
    }
}

// ---------------------------------------------------------------------------
// growthdash status
// ---------------------------------------------------------------------------

/// Check `/health` and submit every module's sample form.
pub fn run_status(config: &DashConfig, format: OutputFormat) -> Result<()> {
    let client = ApiClient::from_config(&config.api);
    let activity = ActivityLog::from_config(&config.logging);

    let items = check_endpoints(&client, &activity);

    match format {
        OutputFormat::Json => {
            let value: Vec<Value> = items
                .iter()
                .map(|(name, ok, detail)| json!({ "name": name, "ok": ok, "detail": detail }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => {
            println!("{}", "growthdash Status".bold().cyan());
            println!("{}", "=".repeat(50));
            println!("  {} {}", "Backend:".bold(), client.url(""));
            println!();
            for (name, ok, detail) in &items {
                print_status_item(name, *ok, detail);
            }
        }
    }

    Ok(())
}

/// `(name, ok, detail)` for the health endpoint and each module.
fn check_endpoints(transport: &dyn Transport, activity: &ActivityLog) -> Vec<(String, bool, String)> {
    let mut items = Vec::with_capacity(ModuleKind::ALL.len() + 1);

    let report = health::check_once(transport);
    activity.record(&ActivityEvent::health(&report));
    items.push(match report.outcome {
        Ok(body) => {
            let detail = body
                .get("status")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string());
            ("Health".to_string(), true, detail)
        }
        Err(err) => ("Health".to_string(), false, err),
    });

    for kind in ModuleKind::ALL {
        let mut panel = kind.panel();
        let status = submit_logged(kind, transport, &kind.sample_form(), &mut panel, activity);
        let ok = matches!(status, SubmitStatus::Rendered);
        let detail = status.detail().unwrap_or_else(|| {
            let rows = panel.result().map_or(0, |m| m.len());
            format!("{} ({rows} rows)", kind.endpoint())
        });
        items.push((kind.name().to_string(), ok, detail));
    }

    items
}

fn print_status_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// growthdash activity
// ---------------------------------------------------------------------------

/// Show the most recent activity log entries.
pub fn run_activity(config: &DashConfig, limit: usize, format: OutputFormat) -> Result<()> {
    let activity = ActivityLog::from_config(&config.logging);
    let events = activity.recent(limit);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!(
            "{}",
            "No activity yet. Submit a module or run a health check first.".yellow()
        );
        return Ok(());
    }

    println!("{}", "Recent Activity".bold().cyan());
    println!(
        "  {:<19} {:<7} {:<22} {:<9} {:>8}",
        "Time", "Kind", "Target", "Status", "Latency"
    );
    println!("  {}", "-".repeat(69));

    for event in &events {
        let latency = event
            .latency_ms
            .map(|ms| format!("{ms}ms"))
            .unwrap_or_default();
        println!(
            "  {:<19} {:<7} {:<22} {} {:>8}",
            truncate(&event.timestamp.replace('T', " "), 19),
            event.kind,
            truncate(&event.target, 22),
            colorize_status(&event.status),
            latency,
        );
        if let Some(detail) = &event.detail
            && event.status != "ok"
        {
            println!("  {:<19} {}", "", truncate(detail, 60).dimmed());
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// growthdash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective growthdash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file().is_some_and(|p| p.exists());
    let project_exists = config::project_config_file().is_some_and(|p| p.exists());

    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.growthdash/config.toml", global_exists);
    print_source(".growthdash.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "GROWTHDASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(label: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), label.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.growthdash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to point growthdash at your backend.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Truncate to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Colorize an activity status, padded to the status column.
fn colorize_status(status: &str) -> colored::ColoredString {
    let padded = format!("{status:<9}");
    match status {
        "ok" => padded.green(),
        "rejected" => padded.yellow(),
        "failed" => padded.red(),
        _ => padded.normal(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
