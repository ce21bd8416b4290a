//! Terminal rendering for plans and reports

use colored::{ColoredString, Colorize};
use std::fmt::Write;

use speedplan_core::{
    Category, Difficulty, Impact, MetricStatus, ScoreBand, ScoreComparison, SpeedAuditPlan,
};

fn band_colored(score: u8) -> ColoredString {
    let text = score.to_string();
    match ScoreBand::of(score) {
        ScoreBand::Fail => text.red().bold(),
        ScoreBand::Average => text.yellow().bold(),
        ScoreBand::Pass => text.green().bold(),
    }
}

fn difficulty_colored(difficulty: Difficulty) -> ColoredString {
    match difficulty {
        Difficulty::Easy => difficulty.as_str().green(),
        Difficulty::Medium => difficulty.as_str().yellow(),
        Difficulty::Hard => difficulty.as_str().red(),
    }
}

fn impact_colored(impact: Impact) -> ColoredString {
    match impact {
        Impact::High => impact.as_str().red().bold(),
        Impact::Medium => impact.as_str().yellow(),
        Impact::Low => impact.as_str().dimmed(),
    }
}

fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Plugin => "🔌",
        Category::Hosting => "☁️",
        Category::Code => "👨‍💻",
        Category::Configuration => "⚙️",
    }
}

fn status_symbol(status: MetricStatus) -> ColoredString {
    match status {
        MetricStatus::Good => "●".green(),
        MetricStatus::NeedsImprovement => "■".yellow(),
        MetricStatus::Poor => "▲".red(),
    }
}

/// Numbered checklist, in plan order
pub fn render_plan(plan: &SpeedAuditPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", plan.site_url.bold());
    let _ = writeln!(
        out,
        "Estimated current score: {}",
        band_colored(plan.estimated_current_score)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Summary".bold());
    let _ = writeln!(out, "{}", plan.summary);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Implementation guide".bold());

    for (i, task) in plan.tasks.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:>3}. [ ] {}", i + 1, task.title.bold());
        let _ = writeln!(
            out,
            "       {} | {} {} | Impact: {}",
            difficulty_colored(task.difficulty),
            category_icon(task.category),
            task.category,
            impact_colored(task.impact)
        );
        for line in task.instructions.lines() {
            let _ = writeln!(out, "       {}", line);
        }
        if !task.tools.is_empty() {
            let _ = writeln!(out, "       Tools: {}", task.tools.join(", ").cyan());
        }
    }

    out
}

/// Before/after scores and colour-coded readings
pub fn render_comparison(comparison: &ScoreComparison) -> String {
    let mut out = String::new();

    let delta = if comparison.delta > 0 {
        format!("+{}", comparison.delta).green()
    } else if comparison.delta < 0 {
        comparison.delta.to_string().red()
    } else {
        "±0".normal()
    };

    let _ = writeln!(
        out,
        "Before (estimated): {}   After: {}   Change: {}",
        band_colored(comparison.before),
        band_colored(comparison.after),
        delta
    );
    let _ = writeln!(out, "Parsed at {}", comparison.timestamp);
    let _ = writeln!(out);

    for reading in &comparison.readings {
        let _ = writeln!(
            out,
            "  {:<4} {:>12} {} {}",
            reading.label,
            reading.value,
            status_symbol(reading.status),
            reading.status
        );
    }

    out
}
