//! TOML parser with helpful error messages

use std::path::Path;

use super::GitConfig;
use crate::error::{Error, Result};

/// Parse a tether config file with detailed error messages
pub fn parse_config_file(path: &Path) -> Result<GitConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read config file: {}", path.display()), e))?;

    parse_config_str(&content).map_err(|message| Error::Config {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse config content from string.
///
/// The error is the human-readable description; callers attach the path.
pub fn parse_config_str(content: &str) -> std::result::Result<GitConfig, String> {
    let config: GitConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(&e, content))?;

    config.validate()?;

    Ok(config)
}

/// Serialize a configuration to TOML string
pub fn to_toml(config: &GitConfig) -> std::result::Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

/// Enhance TOML parsing errors with the surrounding lines
fn enhance_toml_error(error: &toml::de::Error, content: &str) -> String {
    let detail = error.message();

    match error.span() {
        Some(span) => {
            let line_num = content[..span.start.min(content.len())]
                .matches('\n')
                .count()
                + 1;
            format!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                get_line_context(content, line_num),
                detail
            )
        }
        None => format!("TOML parsing error: {}", detail),
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
