use console::style;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Body text, printed as-is
    pub fn text(&self, message: &str) {
        println!("{}", message);
    }

    pub fn emphasis(&self, message: &str) {
        println!("{}", style(message).italic());
    }

    pub fn bullet(&self, label: &str, detail: &str) {
        if detail.is_empty() {
            println!("  • {}", style(label).bold());
        } else {
            println!("  • {} {}", style(label).bold(), style(detail).dim());
        }
    }

    pub fn link(&self, label: &str, url: &str) {
        println!("  {} {}", style(label).cyan(), style(url).dim().underlined());
    }

    /// File content with a line-number gutter
    pub fn code(&self, content: &str) {
        let width = content.lines().count().max(1).to_string().len();
        for (idx, line) in content.lines().enumerate() {
            println!(
                "{} {} {}",
                style(format!("{:>width$}", idx + 1, width = width)).dim(),
                style("│").dim(),
                line
            );
        }
    }

    /// Chat turn
    pub fn chat(&self, speaker: &str, message: &str) {
        println!("{} {}", style(format!("{}:", speaker)).bold().magenta(), message);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
