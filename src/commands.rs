//! CLI command implementations

use crate::script::{self, Directive, Line};
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::path::Path;
use stemma_core::{Entity, Genealogy, GenealogyConfig, GenealogyError};

/// The entity replayed scripts work with: a named variant.
#[derive(Debug)]
pub struct Variant {
    pub name: String,
}

impl Entity for Variant {
    type Id = String;
    type Error = Infallible;

    fn from_id(id: &String) -> Result<Self, Infallible> {
        Ok(Variant { name: id.clone() })
    }

    fn id(&self) -> &String {
        &self.name
    }
}

/// Contents of the optional TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub genealogy: GenealogyConfig,
}

pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let settings = toml::from_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(settings)
}

/// Outcome of replaying a script.
pub struct Replay {
    pub genealogy: Genealogy<Variant>,
    /// Lines that failed under `--keep-going`, with their error.
    pub failures: Vec<(usize, GenealogyError<String>)>,
}

/// Apply every directive in order.
///
/// Each failing directive leaves the genealogy untouched, so with
/// `keep_going` the replay records the failure and moves on.
pub fn replay(lines: &[Line], config: GenealogyConfig, keep_going: bool) -> anyhow::Result<Replay> {
    let Some((first, rest)) = lines.split_first() else {
        bail!("script is empty");
    };
    let Directive::Stem(stem) = &first.directive else {
        bail!("line {}: the first directive must be `stem`", first.number);
    };

    let mut genealogy = Genealogy::with_config(stem.clone(), config);
    let mut failures = Vec::new();

    for line in rest {
        let result = match &line.directive {
            Directive::Stem(_) => bail!("line {}: the stem is already declared", line.number),
            Directive::Create { id, parents } if parents.len() == 1 => {
                genealogy.create(id.clone(), &parents[0])
            }
            Directive::Create { id, parents } => genealogy.create_with_parents(id.clone(), parents),
            Directive::Connect { child, parent } => genealogy.connect(child, parent),
            Directive::Remove(id) => genealogy.remove(id).map(|removed| {
                tracing::info!("Removed {}", removed.join(", "));
            }),
        };

        match result {
            Ok(()) => {}
            Err(err) if keep_going => {
                tracing::debug!("Line {} failed: {}", line.number, err);
                failures.push((line.number, err));
            }
            Err(err) => return Err(err).with_context(|| format!("line {}", line.number)),
        }
    }

    tracing::info!("Replayed {} directives, {} entities", lines.len(), genealogy.len());
    Ok(Replay {
        genealogy,
        failures,
    })
}

/// Indented tree from the stem, two spaces per level. An entity with several
/// parents appears under each; a link back to an entity already on the
/// current path is marked instead of followed.
pub fn render_tree(genealogy: &Genealogy<Variant>) -> anyhow::Result<String> {
    let mut out = String::new();
    let mut path: Vec<String> = Vec::new();
    let mut stack = vec![(genealogy.stem()?, 0usize)];

    while let Some((variant, depth)) = stack.pop() {
        path.truncate(depth);
        let indent = "  ".repeat(depth);

        if path.contains(&variant.name) {
            out.push_str(&format!("{indent}{} (cycle)\n", variant.name));
            continue;
        }
        out.push_str(&format!("{indent}{}\n", variant.name));

        let children = genealogy
            .children(&variant.name)?
            .collect::<Result<Vec<_>, _>>()?;
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        path.push(variant.name.clone());
    }

    Ok(out)
}

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    stem: &'a str,
    entities: Vec<EntitySnapshot>,
}

#[derive(Debug, Serialize)]
struct EntitySnapshot {
    id: String,
    parents: Vec<String>,
    children: Vec<String>,
}

/// Pretty JSON listing every entity with its parents and children.
pub fn render_json(genealogy: &Genealogy<Variant>) -> anyhow::Result<String> {
    let entities = genealogy
        .ids()
        .map(|id| {
            Ok(EntitySnapshot {
                id: id.clone(),
                parents: genealogy.get_parents(id)?,
                children: genealogy.get_children(id)?,
            })
        })
        .collect::<Result<Vec<_>, GenealogyError<String>>>()?;

    let snapshot = Snapshot {
        stem: genealogy.stem_id(),
        entities,
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

pub fn run(script_path: &Path, config: GenealogyConfig, json: bool, keep_going: bool) -> anyhow::Result<()> {
    tracing::info!("Replaying script: {}", script_path.display());

    let lines = script::read(script_path)?;
    let Replay {
        genealogy,
        failures,
    } = replay(&lines, config, keep_going)?;

    for (number, err) in &failures {
        eprintln!("line {number}: {err}");
    }

    let output = if json {
        render_json(&genealogy)?
    } else {
        render_tree(&genealogy)?
    };
    print!("{output}");
    if json {
        println!();
    }

    Ok(())
}
