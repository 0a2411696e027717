//! `find-closest-version`, `check-valid-version` and `constraints`.

use feu_core::error::FeuResult;
use feu_resolver::{ConstraintEntry, ConstraintRegistry};

use super::CommandContext;
use crate::VersionQuery;

pub async fn execute_find_closest(query: VersionQuery, ctx: &CommandContext) -> FeuResult<()> {
    let closest = find_closest(&query, &ctx.constraints)?;
    ctx.output.print(&closest);
    Ok(())
}

pub async fn execute_check_valid(query: VersionQuery, ctx: &CommandContext) -> FeuResult<()> {
    let valid = check_valid(&query, &ctx.constraints)?;
    ctx.output.print(if valid { "True" } else { "False" });
    Ok(())
}

pub async fn execute_list_constraints(package: Option<&str>, ctx: &CommandContext) -> FeuResult<()> {
    let lines = constraint_lines(&ctx.constraints, package);
    if lines.is_empty() {
        ctx.output.warn(&format!("No constraints registered for '{}'", package.unwrap_or_default()));
    }
    for line in lines {
        ctx.output.print(&line);
    }
    Ok(())
}

pub fn find_closest(query: &VersionQuery, constraints: &ConstraintRegistry) -> FeuResult<String> {
    constraints.clamp(&query.pkg_name, &query.pkg_version, &query.python_version)
}

pub fn check_valid(query: &VersionQuery, constraints: &ConstraintRegistry) -> FeuResult<bool> {
    constraints.is_valid(&query.pkg_name, &query.pkg_version, &query.python_version)
}

/// One `package python bounds` line per registered pair
pub fn constraint_lines(constraints: &ConstraintRegistry, package: Option<&str>) -> Vec<String> {
    let packages: Vec<&str> = match package {
        Some(name) => vec![name],
        None => constraints.packages().collect(),
    };

    packages
        .into_iter()
        .flat_map(|name| {
            constraints
                .python_versions(name)
                .map(move |(python_version, entry)| format!("{} {} {}", name, python_version, describe(entry)))
        })
        .collect()
}

fn describe(entry: &ConstraintEntry) -> String {
    let bounds: Vec<String> = [
        entry.min.as_ref().map(|min| format!(">={}", min)),
        entry.max.as_ref().map(|max| format!("<={}", max)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if bounds.is_empty() {
        "any".to_string()
    } else {
        bounds.join(",")
    }
}
