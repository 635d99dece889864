//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use journal_core::{decision_label, Entry, EntryInput};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single entry in full
    pub fn print_entry(&self, entry: &Entry) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:           {}", entry.id);
                println!("Title:        {}", unescape_html(&entry.title));
                println!("Created:      {}", display_date(entry));
                if !entry.decision_type.is_empty() {
                    println!(
                        "Decision:     {}",
                        unescape_html(decision_label(&entry.decision_type))
                    );
                }
                if !entry.participants.is_empty() {
                    println!("Participants: {}", unescape_html(&entry.participants));
                }
                if !entry.tags.is_empty() {
                    println!("Tags:         {}", unescape_html(&entry.tags.join(", ")));
                }

                println!();
                println!("── Summary ──");
                println!("{}", unescape_html(&entry.summary));
                println!();
                println!("── Commitments ──");
                println!("{}", unescape_html(&entry.commitments));
            }
            OutputFormat::Json => print_json(entry),
            OutputFormat::Quiet => {
                println!("{}", entry.id);
            }
        }
    }

    /// Print a list of entries, one per line
    pub fn print_entries(&self, entries: &[Entry]) {
        match self.format {
            OutputFormat::Human => {
                if entries.is_empty() {
                    println!("No entries found.");
                    return;
                }
                for entry in entries {
                    let kind = if entry.decision_type.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", unescape_html(decision_label(&entry.decision_type)))
                    };
                    println!(
                        "{} | {} | {}{}",
                        short_id(&entry.id),
                        display_date(entry),
                        truncate(&unescape_html(&entry.title), 45),
                        kind
                    );
                }
                println!("\n{} entry(ies)", entries.len());
            }
            OutputFormat::Json => print_json(entries),
            OutputFormat::Quiet => {
                for entry in entries {
                    println!("{}", entry.id);
                }
            }
        }
    }

    /// Print tags with usage counts
    pub fn print_tags(&self, tags: &[(String, usize)]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for (name, count) in tags {
                    let label = decision_label(name);
                    if label != name {
                        println!("{} - {} ({})", unescape_html(name), label, count);
                    } else {
                        println!("{} ({})", unescape_html(name), count);
                    }
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                let json_tags: Vec<_> = tags
                    .iter()
                    .map(|(name, count)| {
                        serde_json::json!({
                            "name": name,
                            "label": decision_label(name),
                            "count": count
                        })
                    })
                    .collect();
                print_json(&json_tags);
            }
            OutputFormat::Quiet => {
                for (name, _) in tags {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print the saved draft as entered
    pub fn print_draft(&self, draft: &EntryInput) {
        match self.format {
            OutputFormat::Human => {
                println!("Draft:");
                let fields = draft.string_fields();
                if fields.is_empty() && draft.tags.is_none() {
                    println!("  (empty)");
                }
                for (name, value) in fields {
                    println!("  {:<13} {}", format!("{}:", name), value);
                }
                if let Some(ref tags) = draft.tags {
                    if !matches!(tags, journal_core::TagsInput::Text(_)) {
                        println!("  {:<13} {}", "tags:", tags.raw_text());
                    }
                }
            }
            OutputFormat::Json => print_json(draft),
            OutputFormat::Quiet => {
                if let Some(ref title) = draft.title {
                    println!("{}", title);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to encode JSON: {}", e),
    }
}

/// Creation date for listings, or the raw value when it does not parse
fn display_date(entry: &Entry) -> String {
    entry
        .created_at_time()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| entry.created_at.clone())
}

/// Leading part of an id, enough to tell entries apart
pub fn short_id(id: &str) -> String {
    let tail = id.strip_prefix("entry-").unwrap_or(id);
    tail.chars().take(13).collect()
}

/// Reverse the escaping applied when entries are stored
///
/// `&amp;` must be handled last so `&amp;lt;` comes back as `&lt;`.
pub fn unescape_html(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
