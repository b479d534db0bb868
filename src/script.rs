//! Genealogy script parsing

use anyhow::{Context, bail};
use std::path::Path;

/// One script instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Declare the stem. Must come first, exactly once.
    Stem(String),
    Create { id: String, parents: Vec<String> },
    Connect { child: String, parent: String },
    Remove(String),
}

/// A directive with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub directive: Directive,
}

pub fn read(path: &Path) -> anyhow::Result<Vec<Line>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse(&source).with_context(|| format!("Invalid script {}", path.display()))
}

/// Parse a script. Blank lines and `#` comments are skipped.
pub fn parse(source: &str) -> anyhow::Result<Vec<Line>> {
    let mut lines = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let number = index + 1;
        let text = raw.split('#').next().unwrap_or_default();
        let mut tokens = text.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let directive = match (keyword, args.as_slice()) {
            ("stem", [id]) => Directive::Stem(id.clone()),
            ("create", [id, parents @ ..]) if !parents.is_empty() => Directive::Create {
                id: id.clone(),
                parents: parents.to_vec(),
            },
            ("connect", [child, parent]) => Directive::Connect {
                child: child.clone(),
                parent: parent.clone(),
            },
            ("remove", [id]) => Directive::Remove(id.clone()),
            ("stem" | "remove", _) => bail!("line {number}: `{keyword}` takes one identifier"),
            ("create", _) => bail!("line {number}: `create` takes an identifier and at least one parent"),
            ("connect", _) => bail!("line {number}: `connect` takes a child and a parent"),
            _ => bail!("line {number}: unknown directive `{keyword}`"),
        };

        lines.push(Line { number, directive });
    }

    Ok(lines)
}
