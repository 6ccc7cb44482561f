//! # Help Text
//!
//! Help message displayed via the `!help` command.

pub const HEADER: &str = "**🐴 Canni Help**\nUse: !command _args_\n";

/// One line per loaded module that exposes a command.
pub fn module_line(name: &str, usage: &str) -> String {
    format!("* **{name}**: {usage}")
}

pub fn render(lines: &[String]) -> String {
    if lines.is_empty() {
        return format!("{HEADER}\n_No commands loaded._");
    }
    format!("{HEADER}\n{}", lines.join("\n"))
}
