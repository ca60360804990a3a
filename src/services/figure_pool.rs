use std::fs::File;
use std::io::{self, BufRead};
use log::{info, warn};

use crate::models::FigureEntry;

pub const DEFAULT_HINT: &str = "No hint";

const BUILTIN_FIGURES: &[(&str, &str)] = &[
    ("King Sejong", "Created the Korean alphabet, Hangul"),
    ("Yi Sun-sin", "Won the Battle of Myeongnyang"),
    ("Mahatma Gandhi", "Leader of the Indian independence movement"),
    ("Abraham Lincoln", "Abolished slavery in the United States"),
    ("Albert Einstein", "Theory of relativity"),
    ("Yu Gwan-sun", "Took part in the March 1st Movement"),
    ("Socrates", "Ancient Greek philosopher"),
    ("Shin Saimdang", "Joseon painter and mother of Yulgok Yi I"),
    ("Jeong Yak-yong", "Joseon Silhak scholar known as Dasan"),
    ("Marie Curie", "Research on radioactivity"),
    ("Nelson Mandela", "South African human rights leader"),
    ("Leonardo da Vinci", "Painter of the Mona Lisa"),
    ("Napoleon Bonaparte", "French general and statesman"),
    ("Che Guevara", "Cuban revolutionary"),
    ("Galileo Galilei", "Argued for heliocentrism"),
];

/// The catalog served when no figure file is configured
pub fn builtin_figures() -> Vec<FigureEntry> {
    BUILTIN_FIGURES
        .iter()
        .map(|&(name, hint)| FigureEntry::new(name, hint))
        .collect()
}

/// Parse a single `name|hint` line. Returns `None` for blanks and comments.
fn parse_line(line: &str) -> Option<Result<FigureEntry, String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let Some((name, hint)) = line.split_once('|') else {
        return Some(Err(format!("missing '|' separator: {}", line)));
    };

    let name = name.trim();
    if name.is_empty() {
        return Some(Err(format!("empty name: {}", line)));
    }

    let hint = match hint.trim() {
        "" => DEFAULT_HINT,
        h => h,
    };

    Some(Ok(FigureEntry::new(name, hint)))
}

/// Load figures from a plain text file (one `name|hint` per line)
pub fn load_figures(file_path: &str) -> io::Result<Vec<FigureEntry>> {
    let file = File::open(file_path)?;
    let reader = io::BufReader::new(file);

    let mut figures = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Some(Ok(entry)) => figures.push(entry),
            Some(Err(reason)) => warn!("Skipping {} line {}: {}", file_path, lineno + 1, reason),
            None => {}
        }
    }

    Ok(figures)
}

/// Resolve the figure pool, falling back to the built-in catalog
pub fn resolve_pool(file_path: Option<&str>) -> Vec<FigureEntry> {
    let Some(path) = file_path else {
        return builtin_figures();
    };

    match load_figures(path) {
        Ok(figures) if !figures.is_empty() => {
            info!("Loaded {} figures from {}.", figures.len(), path);
            figures
        }
        Ok(_) => {
            warn!("No figures found in {}, using built-in pool.", path);
            builtin_figures()
        }
        Err(e) => {
            warn!("Failed to load figures from {}: {}. Using built-in pool.", path, e);
            builtin_figures()
        }
    }
}
