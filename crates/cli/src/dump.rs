//! `statforge dump`: show a font's STAT as notation alongside its variation axes.

use std::{fs::read, path::Path};

use anyhow::{Context, Result};
use skrifa::{MetadataProvider, string::StringId};
use statforge_font_ops::{FontHandle, NameRegistry, StatTable};
use statforge_font_stat::stat_to_notation;

pub fn dump(path: &Path) -> Result<()> {
    let handle = FontHandle::open(path)?;
    let names = NameRegistry::load(&handle)?;
    match handle.table::<StatTable>()? {
        Some(stat) => println!("STAT: {}", stat_to_notation(&stat, &names)?),
        None => println!("STAT: none"),
    }

    let data = read(path).with_context(|| format!("Failed to read font: {}", path.display()))?;
    let font = skrifa::FontRef::new(&data)
        .with_context(|| format!("Failed to parse font: {}", path.display()))?;

    let axes = font.axes();
    if axes.is_empty() {
        println!("Not a variable font");
        return Ok(());
    }

    println!("Variable font axes:");
    for axis in axes.iter() {
        println!(
            "  {:4}  {:6.0} .. {:6.0} (default: {:6.0})",
            axis.tag(),
            axis.min_value(),
            axis.max_value(),
            axis.default_value(),
        );
    }

    let instances = font.named_instances();
    if !instances.is_empty() {
        println!("Named instances:");
        for instance in instances.iter() {
            let coords: Vec<String> = instance.user_coords().map(|c| format!("{c}")).collect();
            println!("  {:20} {}", string(&font, instance.subfamily_name_id()), coords.join(", "));
        }
    }

    Ok(())
}

fn string(font: &skrifa::FontRef, id: StringId) -> String {
    font.localized_strings(id)
        .english_or_first()
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("<name {id}>"))
}
