use std::collections::BTreeMap;
use std::fmt;

/// Stat names per row of the display grid
pub const STATS_LAYOUT: [&[&str]; 3] = [
    &["intellect", "discipline", "strength"],
    &["armor", "recovery", "agility"],
    &["optics", "defense"],
];

const FILLER: &str = "- - - - - - - - ";

/// Character stats laid out as a 3x3 grid for terminal output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsTable {
    rows: Vec<[String; 3]>,
}

fn cell(name: &str, stats: &BTreeMap<String, i64>) -> String {
    let mut title = String::with_capacity(name.len());
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        title.extend(first.to_uppercase());
        title.push_str(chars.as_str());
    }
    format!("{:<3} -> {:03}", title, stats.get(name).copied().unwrap_or(0))
}

impl StatsTable {
    pub fn new(stats: &BTreeMap<String, i64>) -> Self {
        let rows = STATS_LAYOUT
            .iter()
            .map(|names| {
                let cells: Vec<String> = names.iter().map(|name| cell(name, stats)).collect();
                match cells.as_slice() {
                    [a, b, c] => [a.clone(), b.clone(), c.clone()],
                    // Short row: keep the outer cells and fill the middle
                    [a, b] => [a.clone(), FILLER.to_string(), b.clone()],
                    [a] => [a.clone(), FILLER.to_string(), String::new()],
                    _ => [String::new(), FILLER.to_string(), String::new()],
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[[String; 3]] {
        &self.rows
    }
}

impl fmt::Display for StatsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths = [0usize; 3];
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line = format!(
                "{:<w0$}  {:<w1$}  {:<w2$}",
                row[0],
                row[1],
                row[2],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2]
            );
            f.write_str(line.trim_end())?;
        }
        Ok(())
    }
}
