use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::CliError;

/// Preferred representative locale; unset means "first listed locale".
pub const DEFAULT_LOCALE_VAR: &str = "CTF_DEFAULT_LOCALE";

/// Environment variable manager that loads from system and .env files.
///
/// Variables already present in the process environment win over the ones
/// read from a file.
///
/// The file format is `KEY=VALUE` per line, with optional `export ` prefix and
/// surrounding single or double quotes. Unlike dotenv, inline `# comments`
/// after a value are kept as part of the value, and escape sequences such as
/// `\n` inside double quotes are not expanded.
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Load variables from a .env file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)?;
        Ok(())
    }

    /// Like [`EnvManager::load_from_file`], but a missing file is not an
    /// error. Returns whether the file was loaded.
    pub fn load_if_present<P: AsRef<Path>>(&mut self, path: P) -> Result<bool, CliError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(false);
        }
        self.load_from_file(path)?;
        Ok(true)
    }

    pub fn all(&self) -> &HashMap<String, String> {
        &self.vars
    }

    /// Value of `key`, with blank values treated as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);

            // Parse KEY=VALUE format
            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim();
                let value = line[eq_pos + 1..].trim();

                if key.is_empty() {
                    return Err(CliError::Config(format!(
                        "Invalid env file: empty key at line {}",
                        line_num + 1
                    )));
                }

                let value = Self::unquote_value(value);

                self.vars.entry(key.to_string()).or_insert(value);
            } else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            }
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}
