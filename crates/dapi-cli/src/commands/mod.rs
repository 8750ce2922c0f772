pub mod account;
pub mod character;
pub mod inventory;
pub mod manifest;
pub mod profile;
pub mod search;
