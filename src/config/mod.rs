/// Configuration system for growthdash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — [`schema::DashConfig::default()`]
/// 2. **User global config** — `~/.growthdash/config.toml`
/// 3. **Project local config** — `.growthdash.toml` in the current directory
/// 4. **Environment variables** — `GROWTHDASH_*` overrides (highest precedence)
///
/// File layers are merged key by key: a project file that only sets
/// `api.base_url` keeps every other value from the global file.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::DashConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
pub fn load() -> DashConfig {
    let layers = [global_config_path(), project_config_path()];
    let mut config = load_layers(layers.iter().flatten().map(PathBuf::as_path));
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Merge the given TOML files over the defaults, in order.
///
/// Missing or malformed files are skipped, and so is a file whose values
/// don't fit the schema: the layers before it still apply.
fn load_layers<'a>(paths: impl Iterator<Item = &'a Path>) -> DashConfig {
    let Ok(mut merged) = toml::Value::try_from(DashConfig::default()) else {
        return DashConfig::default();
    };

    for path in paths {
        let Some(layer) = read_toml_value(path) else {
            continue;
        };

        let mut candidate = merged.clone();
        merge_values(&mut candidate, layer);
        let checked: Result<DashConfig, _> = candidate.clone().try_into();
        if checked.is_ok() {
            merged = candidate;
        }
    }

    merged.try_into().unwrap_or_default()
}

fn read_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively overlay `overlay` onto `base`. Tables merge; anything else
/// replaces.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.growthdash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".growthdash").join("config.toml"))
}

/// `.growthdash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".growthdash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `GROWTHDASH_API_URL` — backend base URL
/// - `GROWTHDASH_API_ROOT` — API path prefix
/// - `GROWTHDASH_HEALTH` — health poller on/off
/// - `GROWTHDASH_HEALTH_INTERVAL_SECS` — poll interval
/// - `GROWTHDASH_LOG` — activity log on/off
/// - `GROWTHDASH_LOG_PATH` — activity log location
/// - `NO_COLOR` — any value disables colored output
fn apply_env_overrides(config: &mut DashConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("GROWTHDASH_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Some(val) = var("GROWTHDASH_API_ROOT") {
        config.api.api_root = val;
    }

    if let Some(val) = var("GROWTHDASH_HEALTH") {
        config.health.enabled = is_truthy(&val);
    }
    if let Some(val) = var("GROWTHDASH_HEALTH_INTERVAL_SECS")
        && let Ok(secs) = val.parse::<u64>()
    {
        config.health.interval_secs = secs;
    }

    if let Some(val) = var("GROWTHDASH_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Some(val) = var("GROWTHDASH_LOG_PATH")
        && !val.is_empty()
    {
        config.logging.path = val;
    }

    if var("NO_COLOR").is_some() {
        config.display.color = false;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.growthdash/config.toml`.
///
/// Fails if the file already exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    write_config_file(&path, &DashConfig::default_toml())?;
    Ok(path)
}

/// Set a dotted key (e.g. `health.interval_secs`) in the global config file.
///
/// The value is parsed according to the type of the key's default, so
/// `set health.enabled off` writes a boolean.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut root = match read_toml_value(&path) {
        Some(existing) => existing,
        None => toml::Value::try_from(DashConfig::default())
            .context("failed to serialize default config")?,
    };

    set_toml_value(&mut root, key, value)?;

    // Reject values that would no longer deserialize into the schema.
    let _: DashConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    write_config_file(&path, &output)
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let (section, leaf) = key
        .rsplit_once('.')
        .with_context(|| format!("config key must be 'section.key', got '{key}'"))?;

    let table = root
        .get_mut(section)
        .and_then(toml::Value::as_table_mut)
        .with_context(|| format!("config section not found: '{section}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
