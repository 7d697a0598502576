//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use portcullis_abac::{CatalogEntry, PolicyRule, Resource};

/// Creates an empty table with a bold header row.
pub fn styled_table(columns: &[&str]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|col| {
            if super::no_color() {
                Cell::new(col)
            } else {
                Cell::new(col)
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan)
            }
        })
        .collect();
    table.set_header(header_cells);

    table
}

fn decision_cell(allowed: bool, reason: &str) -> Cell {
    let cell = Cell::new(reason);
    match (super::no_color(), allowed) {
        (true, _) => cell,
        (false, true) => cell.fg(Color::Green),
        (false, false) => cell.fg(Color::Red),
    }
}

/// Catalog resources with the decision for each.
pub fn catalog_table(entries: &[CatalogEntry<'_>]) -> Table {
    let mut table = styled_table(&["ID", "Resource", "Level", "Window", "Decision"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.resource.id),
            Cell::new(&entry.resource.name),
            Cell::new(entry.resource.required_access_level),
            Cell::new(&entry.resource.available_window),
            decision_cell(entry.decision.allowed, &entry.decision.reason),
        ]);
    }
    table
}

/// The catalog as configured, without decisions.
pub fn resource_table(resources: &[Resource]) -> Table {
    let mut table = styled_table(&["ID", "Resource", "Description", "Level", "Window"]);
    for resource in resources {
        table.add_row(vec![
            Cell::new(resource.id),
            Cell::new(&resource.name),
            Cell::new(&resource.description),
            Cell::new(resource.required_access_level),
            Cell::new(&resource.available_window),
        ]);
    }
    table
}

/// Policy rules in evaluation order.
pub fn rules_table<'a>(rules: impl IntoIterator<Item = &'a PolicyRule>) -> Table {
    let mut table = styled_table(&["Rule", "Condition", "Scope"]);
    for rule in rules {
        let scope = rule
            .resource
            .map_or_else(|| "all resources".to_string(), |id| format!("resource {id}"));
        table.add_row(vec![
            Cell::new(&rule.name),
            Cell::new(format!("{} {} {}", rule.attribute, rule.operator, rule.value)),
            Cell::new(scope),
        ]);
    }
    table
}
