use console::style;
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
        }
    }

    pub fn success(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("✓").green().bold(), message);
            }
            OutputFormat::Json => {
                println!("{}", envelope("success", message));
            }
        }
    }

    pub fn info(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("ℹ").blue().bold(), message);
            }
            OutputFormat::Json => {
                println!("{}", envelope("info", message));
            }
        }
    }

    pub fn warning(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", style("⚠").yellow().bold(), message);
            }
            OutputFormat::Json => {
                eprintln!("{}", envelope("warning", message));
            }
        }
    }

    /// Status line as the dashboard shows it
    pub fn status(&self, line: impl Display) {
        if self.format == OutputFormat::Human {
            println!("{}", style(line).dim());
        }
    }

    pub fn table<T: Tabled>(&self, data: Vec<T>) {
        if data.is_empty() {
            println!("{}", style("(no data)").dim());
        } else {
            let mut table = Table::new(data);
            table.with(Style::rounded());
            println!("{}", table);
        }
    }

    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let output = serde_json::json!({
            "status": "success",
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    pub fn kv(&self, key: impl Display, value: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{}: {}", style(key).bold(), value);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    key.to_string(): value.to_string(),
                });
                println!("{}", output);
            }
        }
    }

    pub fn section(&self, title: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("\n{}", style(title).bold().underlined());
            }
            OutputFormat::Json => {}
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

/// `{"status": ..., "message": ...}` line for JSON mode
fn envelope(status: &str, message: impl Display) -> String {
    let output = serde_json::json!({
        "status": status,
        "message": message.to_string(),
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let parsed: serde_json::Value = serde_json::from_str(&envelope("info", "hello")).unwrap();
        assert_eq!(parsed["status"], "info");
        assert_eq!(parsed["message"], "hello");
    }

    #[test]
    fn test_format_selection() {
        assert!(OutputWriter::new(true).is_json());
        assert!(!OutputWriter::new(false).is_json());
    }
}
