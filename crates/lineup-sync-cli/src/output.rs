use clap::ValueEnum;
use comfy_table::{presets, modifiers, Table};
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            self.status_line("success", "✓".green(), msg.as_ref());
        }
    }

    /// Shown even in quiet mode, on stderr for the human format
    pub fn error(&self, msg: impl AsRef<str>) {
        self.status_line("error", "✗".red(), msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            self.status_line("warning", "⚠".yellow(), msg.as_ref());
        }
    }

    fn status_line(&self, kind: &str, symbol: impl std::fmt::Display, msg: &str) {
        match self.format {
            OutputFormat::Human if kind == "error" => eprintln!("{} {}", symbol, msg),
            OutputFormat::Human => println!("{} {}", symbol, msg),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": kind, "message": msg }));
            }
        }
    }

    /// Structured result; only printed in the JSON formats
    pub fn json(&self, data: &serde_json::Value) {
        if self.format == OutputFormat::Human {
            return;
        }
        self.print_json(data);
    }

    /// Human-format table; ignored in JSON formats and in quiet mode
    pub fn table(&self, mut table: Table) {
        if self.quiet || self.format != OutputFormat::Human {
            return;
        }
        table.load_preset(presets::UTF8_FULL);
        table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
        println!("{}", table);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}", data);
            }
        }
    }
}
