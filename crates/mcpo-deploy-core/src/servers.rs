//! MCPO server-definition file handling.
//!
//! MCPO reads a `config.json` from the image describing the MCP servers it
//! proxies. The orchestrator never interprets that file; it only makes sure
//! one exists in the build context (writing a default template when
//! missing) and warns when the template's placeholder secret was never
//! replaced. The placeholder check is a plain substring test, not a parse.

use std::io;
use std::path::Path;

use serde_json::json;

/// File name MCPO expects inside the build context.
pub const SERVERS_FILE: &str = "config.json";

/// Placeholder written into the default template.
pub const SECRET_PLACEHOLDER: &str = "your-tavily-api-key";

/// Whether the file was already there or had to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServersFileStatus {
    Existing,
    CreatedDefault,
}

/// Ensure the server-definition file exists in the build context.
pub fn ensure_servers_file(context_dir: &Path) -> io::Result<ServersFileStatus> {
    let path = context_dir.join(SERVERS_FILE);
    if path.exists() {
        return Ok(ServersFileStatus::Existing);
    }

    let template = default_template();
    std::fs::write(&path, serde_json::to_string_pretty(&template)?)?;
    tracing::debug!("wrote default server definitions to {}", path.display());
    Ok(ServersFileStatus::CreatedDefault)
}

/// Whether the file still carries the template's placeholder secret.
pub fn has_placeholder_secret(context_dir: &Path) -> io::Result<bool> {
    let path = context_dir.join(SERVERS_FILE);
    if !path.exists() {
        return Ok(false);
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(content.contains(SECRET_PLACEHOLDER))
}

fn default_template() -> serde_json::Value {
    json!({
        "mcpServers": {
            "time": {
                "command": "uvx",
                "args": ["mcp-server-time", "--local-timezone=UTC"]
            },
            "fetch": {
                "command": "uvx",
                "args": ["mcp-server-fetch"]
            },
            "tavily": {
                "command": "npx",
                "args": ["-y", "tavily-mcp"],
                "env": {
                    "TAVILY_API_KEY": SECRET_PLACEHOLDER
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_template_when_missing() {
        let dir = tempdir().unwrap();
        let status = ensure_servers_file(dir.path()).unwrap();
        assert_eq!(status, ServersFileStatus::CreatedDefault);

        let content = std::fs::read_to_string(dir.path().join(SERVERS_FILE)).unwrap();
        assert!(content.contains("mcpServers"));
        assert!(has_placeholder_secret(dir.path()).unwrap());
    }

    #[test]
    fn leaves_existing_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SERVERS_FILE);
        std::fs::write(&path, r#"{"mcpServers":{}}"#).unwrap();

        let status = ensure_servers_file(dir.path()).unwrap();
        assert_eq!(status, ServersFileStatus::Existing);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, r#"{"mcpServers":{}}"#);
        assert!(!has_placeholder_secret(dir.path()).unwrap());
    }

    #[test]
    fn placeholder_check_is_a_substring_test() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SERVERS_FILE);
        // Not even valid JSON; the check must still work.
        std::fs::write(&path, format!("prefix {} suffix", SECRET_PLACEHOLDER)).unwrap();
        assert!(has_placeholder_secret(dir.path()).unwrap());
    }
}
