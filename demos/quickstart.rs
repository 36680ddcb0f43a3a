//! Minimal end-to-end run against the live API.
//!
//! Usage: CURSOR_API_KEY=... cargo run --example quickstart

use anyhow::{Context, Result};
use cursor_sdk::{CursorClient, RetryPolicy, with_retry};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let api_key = std::env::var("CURSOR_API_KEY").context("CURSOR_API_KEY is not set")?;
    let client = CursorClient::new(api_key)?;
    let policy = RetryPolicy::default();

    let me = with_retry(&policy, "get_v0_me", || client.get_v0_me()).await?;
    println!("authenticated as {}", me["userEmail"]);

    let agents = with_retry(&policy, "get_v0_agents", || client.get_v0_agents()).await?;
    match agents["agents"].as_array() {
        Some(list) if !list.is_empty() => {
            println!("{} background agents:", list.len());
            for agent in list {
                println!("  {} {}", agent["id"], agent["status"]);
            }
        }
        _ => println!("no background agents yet"),
    }

    Ok(())
}
