use anyhow::Result;
use dapi::Dapi;

/// Print the raw account summary
pub fn run(api: &Dapi, membership_id: Option<&str>) -> Result<()> {
    match api.account(membership_id)? {
        Some(account) => println!("{}", serde_json::to_string_pretty(&account)?),
        None => println!("Account summary is empty"),
    }
    Ok(())
}
