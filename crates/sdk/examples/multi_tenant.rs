//! Multi-tenant usage example.
//!
//! One client serves several workspaces; each call carries its own key.
//!
//! Run with: cargo run --example multi_tenant -- KEY_A KEY_B

use instantly_sdk::{Credential, InstantlyClient, InstantlyResult};

#[tokio::main]
async fn main() -> InstantlyResult<()> {
    tracing_subscriber::fmt::init();

    let client = InstantlyClient::builder().build()?;

    for (index, key) in std::env::args().skip(1).enumerate() {
        let Some(credential) = Credential::new(&key) else {
            println!("Workspace {}: empty key, skipped", index);
            continue;
        };

        match client.emails(&credential).unread_count().await {
            Ok(count) => println!("Workspace {}: {} unread", index, count["count"]),
            Err(e) => println!("Workspace {}: {} ({})", index, e, e.code()),
        }
    }

    // All clients built without an explicit tracker share one snapshot.
    println!("Last rate limit seen: {:?}", client.rate_limit());

    Ok(())
}
