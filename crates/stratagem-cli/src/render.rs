//! Terminal formatting.

use colored::Colorize;
use stratagem_core::perspective::Perspective;
use stratagem_core::report::{MonthGroup, Report};

pub fn perspective(p: &Perspective) -> String {
    format!(
        "{} {}\n{}\n{}\n{}\n",
        format!("{}.", p.id).cyan().bold(),
        p.title.bold(),
        layer("Strategy", &p.strategy),
        layer("Tactics", &p.tactics),
        layer("Actions", &p.actions),
    )
}

fn layer(label: &str, text: &str) -> String {
    let mut out = format!("   {}", label.dimmed());
    for line in text.lines() {
        out.push_str("\n     ");
        out.push_str(line);
    }
    out
}

pub fn report_line(report: &Report) -> String {
    format!(
        "  {}  {}  ({} perspectives, {})",
        report.id.to_string().dimmed(),
        report.topic,
        report.perspectives.len(),
        report.date.format("%Y-%m-%d"),
    )
}

pub fn history(groups: &[MonthGroup]) -> String {
    if groups.is_empty() {
        return "No reports yet. Run `stratagem generate <topic>` to create one.".to_string();
    }

    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("{}\n", group.label.bold()));
        for report in &group.reports {
            out.push_str(&report_line(report));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stratagem_core::report::group_by_month;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn perspective_shows_every_layer() {
        plain();
        let p = Perspective::new(7, "Subscription beans", "Recurring revenue", "Monthly box", "1. Price\n2. Launch");
        let text = perspective(&p);
        assert!(text.starts_with("7. Subscription beans"));
        assert!(text.contains("Strategy\n     Recurring revenue"));
        assert!(text.contains("     1. Price\n     2. Launch"));
    }

    #[test]
    fn history_lists_groups_and_reports() {
        plain();
        let report = Report {
            id: 42,
            topic: "coffee".to_string(),
            perspectives: Vec::new(),
            date: Utc.with_ymd_and_hms(2026, 10, 15, 8, 0, 0).unwrap(),
        };
        let text = history(&group_by_month(&[report]));
        assert!(text.contains("October 2026"));
        assert!(text.contains("42  coffee  (0 perspectives, 2026-10-15)"));
    }

    #[test]
    fn empty_history_has_hint() {
        assert!(history(&[]).contains("No reports yet"));
    }
}
