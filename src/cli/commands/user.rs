//! User management command handlers

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_user_add(config: &Config, username: &str) -> anyhow::Result<()> {
    let username = username.trim();
    if username.is_empty() {
        anyhow::bail!("Username cannot be empty");
    }

    let store = Store::new(&config.general.database_path).await?;
    let user = store.create_user(username).await?;

    println!("✓ Created user: {} (ID: {})", user.username, user.id);
    println!("  API key: {}", user.api_key);
    println!();
    println!("Send it as: Authorization: Bearer <api key>");

    Ok(())
}

pub async fn cmd_user_list(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No users yet.");
        println!();
        println!("Add one with: animedex user add <username>");
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<60}", "");

    for user in users {
        println!(
            "{:>4}  {:<24} created {}",
            user.id.value(),
            user.username,
            user.created_at
        );
    }

    Ok(())
}

pub async fn cmd_user_regenerate_key(config: &Config, username: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let api_key = store.regenerate_user_api_key(username).await?;

    tracing::info!("API key regenerated for user: {username}");
    println!("✓ New API key for {username}: {api_key}");

    Ok(())
}
