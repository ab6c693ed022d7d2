use cardport::{Reference, ScanReport, Suggestion};
use serde::Serialize;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        fn wrap(&self, s: &str, code: &str) -> String {
            if self.enabled { format!("{code}{s}{RESET}") } else { s.to_string() }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            self.wrap(s.as_ref(), color)
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), BOLD)
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), DIM)
        }
    }
}

/// A reference that is not in the pool, with its ranked replacements.
#[derive(Debug, Serialize)]
pub struct Unresolved<'r> {
    pub reference: &'r Reference,
    pub suggestions: Vec<Suggestion>,
}

fn section(palette: &ansi::Palette, title: &str) {
    println!("\n{}", palette.paint(format!("━━━ {title} ━━━"), ansi::GRAY));
}

pub fn print_scan(report: &ScanReport, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint("⚙  Scan", ansi::CYAN)));

    section(&palette, "References");
    if report.references.is_empty() {
        println!("{}", palette.dim("  No identifiers found"));
    }
    for (idx, reference) in report.references.iter().enumerate() {
        print_reference(idx, reference, &palette);
    }

    let metrics = &report.metrics;
    section(&palette, "Traversal");
    println!(
        "  Cards: {}  │  Fallback: {}  │  Skipped: {}  │  Identifiers: {}",
        palette.paint(metrics.nodes_visited.to_string(), ansi::BLUE),
        palette.paint(metrics.fallback_nodes.to_string(), ansi::YELLOW),
        palette.paint(metrics.skipped.to_string(), ansi::YELLOW),
        palette.paint(metrics.identifiers.to_string(), ansi::GREEN),
    );
    println!("  Time: {}", palette.dim(format!("{:?}", metrics.elapsed)));
    println!();
}

pub fn print_suggestions(identifier: &str, suggestions: &[Suggestion], color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Suggest: \"{identifier}\""), ansi::CYAN)));

    section(&palette, "Candidates");
    print_candidates(suggestions, &palette);
    println!();
}

pub fn print_missing(missing: &[Unresolved<'_>], total: usize, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint("⚙  Missing references", ansi::CYAN)));

    section(&palette, "Unresolved");
    if missing.is_empty() {
        println!("  {}", palette.paint(format!("✓ all {total} references resolve"), ansi::GREEN));
        println!();
        return;
    }

    for (idx, entry) in missing.iter().enumerate() {
        print_reference(idx, entry.reference, &palette);
        print_candidates(&entry.suggestions, &palette);
    }

    println!(
        "\n  {} of {} references unresolved",
        palette.paint(missing.len().to_string(), ansi::RED),
        palette.paint(total.to_string(), ansi::BLUE),
    );
    println!();
}

fn print_reference(idx: usize, reference: &Reference, palette: &ansi::Palette) {
    let context = match &reference.context {
        Some(label) => format!("  {} {}", palette.dim("│"), palette.paint(format!("\"{label}\""), ansi::YELLOW)),
        None => String::new(),
    };
    println!(
        "  {} {}{}",
        palette.paint(format!("[{idx}]"), ansi::GRAY),
        palette.bold(palette.paint(&reference.identifier, ansi::GREEN)),
        context,
    );
    println!(
        "      {} {}  {} {}",
        palette.dim("kind:"),
        palette.paint(&reference.kind, ansi::BLUE),
        palette.dim("│ at:"),
        palette.paint(reference.location.to_string(), ansi::CYAN),
    );
}

fn print_candidates(suggestions: &[Suggestion], palette: &ansi::Palette) {
    if suggestions.is_empty() {
        println!("      {}", palette.dim("✗ no candidates in this domain"));
        return;
    }
    for suggestion in suggestions {
        println!(
            "      {} {}",
            palette.paint(format!("{:>6.2}", suggestion.score), ansi::YELLOW),
            palette.paint(&suggestion.identifier, ansi::GREEN),
        );
    }
}
