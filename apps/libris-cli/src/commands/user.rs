//! # User Commands
//!
//! Menu entries 4-5.

use std::io::{BufRead, Write};

use libris_core::validation::validate_user;
use libris_core::User;
use libris_db::Database;
use tracing::info;

use crate::console::Console;
use crate::error::CliResult;

/// Prompts for a new user and inserts it.
pub async fn add_user<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let user_id = console.prompt_int("Enter User ID: ", "user_id")?;
    let name = console.prompt("Enter User Name: ")?;
    let contact_info = console.prompt("Enter Contact Info: ")?;

    let user = User::new(user_id, name.trim(), contact_info.trim());
    validate_user(&user)?;

    db.users().insert(&user).await?;
    info!(user_id, "User added");
    console.say("User added.")
}

/// Prompts for an id and deletes that user.
pub async fn delete_user<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let user_id = console.prompt_int("Enter User ID to Delete: ", "user_id")?;

    if db.users().delete(user_id).await? {
        info!(user_id, "User deleted");
        console.say("User deleted.")
    } else {
        console.say(format!("No user with ID {user_id}."))
    }
}
