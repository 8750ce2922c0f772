//! Player search command.

use anyhow::Result;
use dapi::{Dapi, UserLookup};
use serde_json::Value;

/// One line per search result
fn describe(result: &Value) -> String {
    let field = |key: &str| match result.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "?".to_string(),
        Some(other) => other.to_string(),
    };
    format!(
        "{} [membership: {}, type: {}]",
        field("displayName"),
        field("membershipId"),
        field("membershipType")
    )
}

pub fn run(api: &Dapi, username: &str) -> Result<()> {
    match api.lookup_user(username)? {
        UserLookup::NotFound => println!("No player named {:?}", username),
        UserLookup::Ambiguous(results) => {
            println!("{} players match {:?}:", results.len(), username);
            for result in &results {
                println!("  {}", describe(result));
            }
        }
        UserLookup::Found(profile) => println!("{}", describe(&serde_json::to_value(&profile)?)),
    }
    Ok(())
}
