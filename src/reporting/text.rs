use crate::reporting::model::ExtractionReport;
use unicode_width::UnicodeWidthStr;

// ==============================
// BOX CONFIGURATION
// ==============================

const BOX_WIDTH: usize = 70;
const INNER_WIDTH: usize = BOX_WIDTH - 2;

// ==============================
// WIDTH HANDLING
// ==============================

fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

// ==============================
// BOX RENDERING HELPERS
// ==============================

fn top_border() -> String {
    format!("╔{}╗", "═".repeat(INNER_WIDTH))
}

fn middle_border() -> String {
    format!("╠{}╣", "═".repeat(INNER_WIDTH))
}

fn bottom_border() -> String {
    format!("╚{}╝", "═".repeat(INNER_WIDTH))
}

/// Left-aligned box line (emoji-safe)
fn box_line(content: &str) -> String {
    let safe_content = format!(" {} ", content);
    let width = visual_width(&safe_content);

    let padding = INNER_WIDTH.saturating_sub(width);
    format!("║{}{}║", safe_content, " ".repeat(padding))
}

/// Centered box line (emoji-safe)
fn box_line_centered(content: &str) -> String {
    let safe_content = format!(" {} ", content);
    let width = visual_width(&safe_content);

    if width >= INNER_WIDTH {
        return box_line(content);
    }

    let remaining = INNER_WIDTH - width;
    let left = remaining / 2;
    let right = remaining - left;

    format!(
        "║{}{}{}║",
        " ".repeat(left),
        safe_content,
        " ".repeat(right)
    )
}

// ==============================
// MAIN REPORT RENDERER
// ==============================

pub fn render(report: &ExtractionReport) -> String {
    let mut lines = Vec::new();

    lines.push(top_border());
    if report.secrets.is_empty() {
        lines.push(box_line_centered("EXTRACTION COMPLETE"));
        lines.push(middle_border());
        lines.push(box_line("No secrets matched any probe"));
    } else {
        lines.push(box_line_centered("SECRETS EXTRACTED"));
        lines.push(middle_border());
        lines.push(box_line(&format!(
            "Owners: {}   Distinct values: {}",
            report.secrets.len(),
            report.distinct_secrets
        )));
        lines.push(middle_border());
        for (rank, secret) in report.secrets.iter().enumerate() {
            lines.push(box_line(&format!("#{:<4} {}", rank, secret)));
        }
    }
    lines.push(bottom_border());

    lines.push(String::new());
    lines.push(format!("Target:     {}", report.target));
    lines.push(format!("Parameter:  {}", report.parameter));
    lines.push(format!("Alphabet:   {} ({} chars)", report.alphabet, report.alphabet.chars().count()));
    lines.push(format!(
        "Queries:    {} (lt {}, equals {}, gte {}, retries {})",
        report.queries.total(),
        report.queries.less_than,
        report.queries.equals,
        report.queries.greater_or_equal,
        report.queries.retries
    ));
    lines.push(format!("Elapsed:    {:.1}s", report.elapsed_ms as f64 / 1000.0));

    lines.join("\n")
}
