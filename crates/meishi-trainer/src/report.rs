//! Console rendering of evaluation and inspection results.

use meishi_core::metrics::EvaluationReport;

use crate::harness::InspectionRow;

/// Header line of the inspection table.
pub const INSPECTION_HEADER: &str = "  Words          P(PERSON)  P(O)";

/// The four headline metrics, one `name value` line each, followed by a
/// per-class table.
pub fn render_metrics(report: &EvaluationReport) -> String {
    let mut lines: Vec<String> = [
        ("f_score=", report.f_score),
        ("accuracy=", report.accuracy),
        ("recall=", report.recall),
        ("precision=", report.precision),
    ]
    .iter()
    .map(|(name, value)| format!("{name:<15} {value:.4}"))
    .collect();

    lines.push(String::new());
    lines.push(format!(
        "  {:<15} {:>9} {:>9} {:>9} {:>9}",
        "class", "precision", "recall", "f_score", "support"
    ));
    lines.push("-".repeat(58));
    lines.extend(report.classes.iter().map(|class| {
        format!(
            "  {:<15} {:>9.4} {:>9.4} {:>9.4} {:>9}",
            class.class, class.precision, class.recall, class.f_score, class.support
        )
    }));

    join_lines(lines)
}

/// Per-token probability table. The probability of the gold class is
/// starred.
pub fn render_inspection(rows: &[InspectionRow]) -> String {
    let mut lines = vec![INSPECTION_HEADER.to_string(), "-".repeat(40)];
    lines.extend(rows.iter().map(|row| {
        if row.gold.is_person() {
            format!("  {:<15} *{:6.4}   {:6.4}", row.token, row.p_person, row.p_outside)
        } else {
            format!("  {:<15}  {:6.4}  *{:6.4}", row.token, row.p_person, row.p_outside)
        }
    }));

    join_lines(lines)
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
