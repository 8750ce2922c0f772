//! Local profile commands.

use std::path::Path;

use anyhow::{Result, bail};
use dapi::{Dapi, Error, UserProfile};

pub fn set_user(api: &mut Dapi, username: &str, path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        bail!(
            "A profile already exists at {}; pass --force to replace it",
            path.display()
        );
    }

    let profile = api.set_username(username)?;
    let name = profile.display_name.clone().unwrap_or_else(|| username.to_string());
    let membership_id = profile.membership_id.clone();

    match api.save_profile(path, force) {
        Ok(()) => {}
        Err(Error::Conflict(existing)) => bail!(
            "A profile already exists at {}; pass --force to replace it",
            existing.display()
        ),
        Err(e) => return Err(e.into()),
    }

    println!("Saved profile for {} (membership {})", name, membership_id);
    println!("  -> {}", path.display());
    Ok(())
}

pub fn whoami(path: &Path) -> Result<()> {
    let Some(profile) = UserProfile::load_from_path(path)? else {
        bail!(
            "No profile at {}; run `dapi set-user <name>` first",
            path.display()
        );
    };

    println!(
        "{}",
        profile.display_name.as_deref().unwrap_or("(unnamed player)")
    );
    println!("  Membership id:   {}", profile.membership_id);
    if let Some(kind) = profile.membership_type {
        println!("  Membership type: {}", kind);
    }
    let ids = profile.character_ids();
    if ids.is_empty() {
        println!("  Characters:      none cached");
    } else {
        println!("  Characters:      {}", ids.join(", "));
    }
    Ok(())
}
