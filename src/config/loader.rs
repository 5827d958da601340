//! Configuration loader with YAML/TOML parsing and environment variable overrides
//!
//! Rule files are YAML by default. A `.toml` extension selects TOML.

use super::schema::VeilConfig;
use crate::domain::errors::VeilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a YAML or TOML file
///
/// This function:
/// 1. Reads the file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the document into [`VeilConfig`]
/// 4. Applies environment variable overrides (VEIL_* prefix)
/// 5. Validates the configuration, including every rule
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - Parsing fails
/// - A referenced environment variable is not set
/// - Configuration or rule validation fails
///
/// # Examples
///
/// ```no_run
/// use veil::config::loader::load_config;
///
/// let config = load_config("veil.yaml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VeilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VeilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config = parse_config(&contents, Format::from_path(path))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        VeilError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    // Surfaces the first invalid rule with its PII type and parameter
    config.rule_set()?;

    Ok(config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

fn parse_config(contents: &str, format: Format) -> Result<VeilConfig> {
    match format {
        Format::Yaml => serde_yaml::from_str(contents)
            .map_err(|e| VeilError::Configuration(format!("Failed to parse YAML: {}", e))),
        Format::Toml => toml::from_str(contents)
            .map_err(|e| VeilError::Configuration(format!("Failed to parse TOML: {}", e))),
    }
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| VeilError::Configuration(format!("Invalid substitution pattern: {}", e)))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(VeilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

/// Applies environment variable overrides using the VEIL_* prefix
///
/// Unparseable boolean values leave the file setting in place.
fn apply_env_overrides(config: &mut VeilConfig) {
    if let Some(val) = env_bool("VEIL_GLOBAL_HANDLE_NULLS") {
        config.global.handle_nulls = val;
    }
    if let Some(val) = env_bool("VEIL_GLOBAL_PRESERVE_DATA_TYPES") {
        config.global.preserve_data_types = val;
    }
    if let Some(val) = env_bool("VEIL_GLOBAL_CASE_SENSITIVE") {
        config.global.case_sensitive = val;
    }
    if let Ok(val) = std::env::var("VEIL_GLOBAL_PSEUDONYM_CACHE_CAPACITY") {
        if let Ok(capacity) = val.parse() {
            config.global.pseudonym_cache_capacity = capacity;
        }
    }

    if let Ok(val) = std::env::var("VEIL_LOG_LEVEL") {
        config.logging.level = val.to_lowercase();
    }
    if let Some(val) = env_bool("VEIL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val;
    }
    if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
