//! Shared output formatting for checkoff CLI commands.

use serde::Serialize;

use crate::error::{Error, JsonError, Result};

pub const SCHEMA_VERSION: &str = "checkoff.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        println!("{}", success_envelope(command, data, human)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        println!("{}", error_envelope(command, err, next_steps)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Render the JSON envelope for a successful command.
pub fn success_envelope<T: Serialize>(
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<String> {
    #[derive(Serialize)]
    struct Envelope<'a, T: Serialize> {
        schema_version: &'static str,
        command: &'a str,
        status: &'static str,
        data: &'a T,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        next_steps: Vec<String>,
    }

    let payload = Envelope {
        schema_version: SCHEMA_VERSION,
        command,
        status: "success",
        data,
        warnings: human.map(|h| h.warnings.clone()).unwrap_or_default(),
        next_steps: human.map(|h| h.next_steps.clone()).unwrap_or_default(),
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

fn error_envelope(command: &str, err: &Error, next_steps: Vec<String>) -> Result<String> {
    #[derive(Serialize)]
    struct Envelope<'a> {
        schema_version: &'static str,
        command: &'a str,
        status: &'static str,
        error: JsonError,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        next_steps: Vec<String>,
    }

    let payload = Envelope {
        schema_version: SCHEMA_VERSION,
        command,
        status: "error",
        error: JsonError::from(err),
        next_steps,
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    push_section(&mut lines, "Details", &output.details);
    push_section(&mut lines, "Warnings", &output.warnings);
    push_section(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

/// Command name (`task add`, `overview`, ...) from raw arguments.
///
/// Values of global options are skipped so `--data-dir /x task ls` still
/// reads as `task ls`.
pub fn command_name_from(args: impl IntoIterator<Item = String>) -> String {
    let mut words = Vec::new();
    let mut skip_value = false;

    for arg in args {
        if skip_value {
            skip_value = false;
            continue;
        }
        if arg == "--data-dir" || arg == "--config" {
            skip_value = true;
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        words.push(arg);
        let grouped = matches!(words[0].as_str(), "task" | "list");
        if !grouped || words.len() == 2 {
            break;
        }
    }

    if words.is_empty() {
        "checkoff".to_string()
    } else {
        words.join(" ")
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::TaskNotFound(_) => vec!["checkoff task ls --all".to_string()],
        Error::ListNotFound(_) => vec!["checkoff list ls".to_string()],
        Error::InvalidConfig(_) => vec!["fix config.toml then retry".to_string()],
        Error::LockFailed(path) => {
            vec![format!("another checkoff may be running; remove {} if stale", path.display())]
        }
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskId;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn human_output_sections() {
        let mut out = HumanOutput::new("checkoff task add: created task 1");
        out.push_summary("title", "Buy milk");
        out.push_summary("list", "");
        out.push_warning("policy flags ignored for list members");
        out.push_next_step("checkoff task complete 1");

        let text = format_human(&out);
        assert!(text.starts_with("checkoff task add: created task 1"));
        assert!(text.contains("- title: Buy milk"));
        assert!(text.contains("- list\n"));
        assert!(text.contains("Warnings:\n- policy flags ignored"));
        assert!(text.contains("Next steps:\n- checkoff task complete 1"));
        assert!(!text.contains("Details:"));
    }

    #[test]
    fn success_envelope_shape() {
        let mut human = HumanOutput::new("ok");
        human.push_next_step("checkoff overview");
        let raw = success_envelope("task ls", &vec![1, 2], Some(&human)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["command"], "task ls");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"], serde_json::json!([1, 2]));
        assert_eq!(value["next_steps"][0], "checkoff overview");
        assert!(value.get("warnings").is_none());
    }

    #[test]
    fn error_envelope_carries_kind_and_code() {
        let err = Error::TaskNotFound(TaskId(9));
        let raw = error_envelope("task show", &err, error_next_steps(&err)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["kind"], "not_found");
        assert_eq!(value["error"]["code"], 2);
        assert_eq!(value["next_steps"][0], "checkoff task ls --all");
    }

    #[test]
    fn command_names_group_subcommands() {
        assert_eq!(command_name_from(args(&["task", "add", "x"])), "task add");
        assert_eq!(command_name_from(args(&["--json", "overview"])), "overview");
        assert_eq!(
            command_name_from(args(&["--data-dir", "/tmp/x", "list", "show", "1"])),
            "list show"
        );
        assert_eq!(command_name_from(args(&[])), "checkoff");
    }
}
