//! Console report
//!
//! Connects with credentials from the environment and prints, for every
//! school the account may administer, its groups and the size of its roster.
//!
//! ```text
//! SCHOOL_CONSOLE_BASE_URL=https://console.example.org \
//! SCHOOL_CONSOLE_USERNAME=admin SCHOOL_CONSOLE_PASSWORD=secret \
//! RUST_LOG=info cargo run --example console_report [--refresh]
//! ```

use school_console::{ClientConfig, ConsoleClient, Credentials};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let refresh = env::args().any(|arg| arg == "--refresh");
    let credentials = Credentials::new(
        env::var("SCHOOL_CONSOLE_USERNAME")?,
        env::var("SCHOOL_CONSOLE_PASSWORD")?,
    );

    let mut client = ConsoleClient::new(ClientConfig::from_env()?)?;
    let session = client.connect(&credentials).await?;
    println!(
        "Signed in as {} ({} school(s))",
        session.display_name(),
        session.school_count()
    );

    for school in client.list_schools().await? {
        let roster = client.get_roster(&school.id, refresh).await?;
        let groups = client.list_groups(&school.id, None).await?;
        let disabled = roster.iter().filter(|a| a.disabled).count();

        println!("\n{} {}", school.id, school.name);
        println!("  accounts: {} ({} disabled)", roster.len(), disabled);
        println!("  groups:   {}", groups.len());
        for group in groups {
            println!("    - {}", group.group_name);
        }
    }

    Ok(())
}
