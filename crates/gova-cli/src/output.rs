//! Text and JSON rendering of command results

use gova_core::AdminController;
use gova_resource::{FieldKind, Label, Properties, ResourceRegistry};
use serde_json::json;
use std::io::{self, Write};

/// Print every registered resource with its fields
///
/// # Errors
/// When writing to `out` fails
pub fn write_resources<W: Write>(out: &mut W, registry: &ResourceRegistry, json: bool) -> io::Result<()> {
    if json {
        let resources: Vec<_> = registry.iter().collect();
        serde_json::to_writer_pretty(&mut *out, &resources)?;
        return writeln!(out);
    }

    for resource in registry {
        writeln!(out, "{}", resource.label())?;
        for field in resource.fields() {
            match field.kind() {
                FieldKind::Select => writeln!(
                    out,
                    "  {} ({}, select: {})",
                    field.name(),
                    field.attribute(),
                    field.options().join("|")
                )?,
                kind => writeln!(
                    out,
                    "  {} ({}, {})",
                    field.name(),
                    field.attribute(),
                    kind
                )?,
            }
        }
    }
    Ok(())
}

/// Print the cached rows of the selected resource
///
/// # Errors
/// When writing to `out` fails
pub fn write_rows<W: Write>(out: &mut W, admin: &AdminController, json: bool) -> io::Result<()> {
    let state = admin.snapshot();
    if json {
        serde_json::to_writer_pretty(&mut *out, state.current_records())?;
        return writeln!(out);
    }

    let rows = admin.rows();
    if rows.is_empty() {
        return writeln!(out, "No {} records", state.current);
    }
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}

/// Confirm a created record
///
/// # Errors
/// When writing to `out` fails
pub fn write_created<W: Write>(out: &mut W, label: &Label, properties: &Properties, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, &json!({ "resource": label, "properties": properties }))?;
        return writeln!(out);
    }
    writeln!(out, "Created {label}")?;
    for (attribute, value) in properties {
        match value.as_str() {
            Some(text) => writeln!(out, "  {attribute} = {text}")?,
            None => writeln!(out, "  {attribute} = {value}")?,
        }
    }
    Ok(())
}
