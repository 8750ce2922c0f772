//! Character commands.

use anyhow::{Result, bail};
use dapi::{Character, ClassType, Dapi};

/// Multi-line character report
fn report(character: &Character) -> String {
    let mut lines = vec![character.to_string()];
    if let Some(light) = character.light_level() {
        lines.push(format!("Light: {}", light));
    }
    if let Some(played) = character.last_played_display() {
        lines.push(format!("Last played: {}", played));
    }
    if let Some(progress) = character.progress_summary() {
        lines.push(progress);
    }
    if let Some(table) = character.stats_table() {
        lines.push(String::new());
        lines.push(table.to_string());
    }
    lines.join("\n")
}

pub fn list(api: &Dapi, membership_id: Option<&str>) -> Result<()> {
    let characters = Character::fetch_all(api, membership_id)?;
    if characters.is_empty() {
        println!("No characters on this account");
        return Ok(());
    }
    for character in characters.values() {
        match character.light_level() {
            Some(light) => println!("{} light {}", character, light),
            None => println!("{}", character),
        }
    }
    Ok(())
}

pub fn show(
    api: &Dapi,
    id: Option<&str>,
    class: Option<ClassType>,
    membership_id: Option<&str>,
) -> Result<()> {
    let character = match (id, class) {
        (Some(id), _) => Character::fetch(api, membership_id, id)?,
        (None, Some(class)) => Character::fetch_class(api, membership_id, class)?,
        (None, None) => bail!("Pass --id or --class to pick a character"),
    };
    println!("{}", report(&character));
    Ok(())
}
