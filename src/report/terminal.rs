use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{star_string, DatasetScore};

/// Render a colored terminal report.
///
/// Datasets that are closed or not machine-readable (0 or 1 star) are always
/// listed; `verbose` lists every dataset.
pub fn render(scores: &[DatasetScore], source: &str, verbose: bool, quiet: bool) -> Result<()> {
    let total = scores.len();
    let counts = super::count_by_score(scores);
    let closed = counts[0];
    let open = total - closed;

    if quiet {
        println!(
            "Total: {}  Open: {}  Closed: {}  Average: {:.1}★",
            total,
            open.to_string().green(),
            closed.to_string().red(),
            super::average_score(scores),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "openness-stars".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Source: {}\n", source);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total datasets : {}", total));
    for score in (0..=5u8).rev() {
        let line = format!(
            "{}  : {:>4}  {}",
            star_string(score),
            counts[usize::from(score)],
            summarize_names(scores, score),
        );
        println!(" │  {:<48} │", line);
    }
    println!(
        " │  {:<48} │",
        format!("Average        : {:.1}", super::average_score(scores))
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    let attention: Vec<&DatasetScore> = scores.iter().filter(|s| s.openness.score <= 1).collect();
    if !attention.is_empty() {
        println!(
            " {} Datasets that are closed or not machine-readable:\n",
            "[LOW]".red().bold()
        );
        render_table(&attention);
        println!();
    }

    if verbose && !scores.is_empty() {
        println!(" {} All datasets:\n", "[ALL]".green().bold());
        let all: Vec<&DatasetScore> = scores.iter().collect();
        render_table(&all);
        println!();
    }

    Ok(())
}

fn render_table(scores: &[&DatasetScore]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Dataset").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Formats").add_attribute(Attribute::Bold),
            Cell::new("Stars").add_attribute(Attribute::Bold),
            Cell::new("Reason").add_attribute(Attribute::Bold),
        ]);

    for score in scores {
        table.add_row(vec![
            Cell::new(&score.name),
            Cell::new(score.license_label()),
            Cell::new(score.formats.join(", ")),
            Cell::new(star_string(score.openness.score))
                .fg(score_color(score.openness.score))
                .set_alignment(CellAlignment::Center),
            Cell::new(&score.openness.reason),
        ]);
    }

    println!("{}", table);
}

fn score_color(score: u8) -> Color {
    match score {
        0 => Color::Red,
        1 => Color::DarkYellow,
        2 => Color::Yellow,
        3 | 4 => Color::Green,
        _ => Color::Cyan,
    }
}

/// Up to three dataset names with the given score, e.g. `[roads, rail, +2]`.
fn summarize_names(scores: &[DatasetScore], score: u8) -> String {
    let names: Vec<&str> = scores
        .iter()
        .filter(|s| s.openness.score == score)
        .map(|s| s.name.as_str())
        .collect();

    if names.is_empty() {
        return String::new();
    }

    let mut shown: Vec<String> = names.iter().take(3).map(|n| truncate(n, 10)).collect();
    if names.len() > 3 {
        shown.push(format!("+{}", names.len() - 3));
    }
    format!("[{}]", shown.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Openness;

    fn scored(name: &str, score: u8) -> DatasetScore {
        DatasetScore {
            name: name.to_string(),
            license: Some("cc-by".into()),
            formats: vec!["csv".into()],
            openness: Openness {
                score,
                reason: String::new(),
            },
        }
    }

    #[test]
    fn test_summarize_names() {
        let scores = vec![
            scored("a", 3),
            scored("b", 3),
            scored("c", 1),
            scored("d", 3),
            scored("e", 3),
        ];
        assert_eq!(summarize_names(&scores, 3), "[a, b, d, +1]");
        assert_eq!(summarize_names(&scores, 1), "[c]");
        assert_eq!(summarize_names(&scores, 5), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("road-network", 10), "road-netw…");
        assert_eq!(truncate("roads", 10), "roads");
    }
}
