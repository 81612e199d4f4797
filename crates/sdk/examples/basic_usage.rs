//! Basic SDK usage example.
//!
//! Lists sender accounts and campaigns, then walks every lead of the first
//! campaign page by page.
//!
//! Run with: INSTANTLY_API_KEY=... cargo run --example basic_usage

use futures_util::TryStreamExt;
use instantly_sdk::{CredentialSources, InstantlyClient, InstantlyResult, ListParams};

#[tokio::main]
async fn main() -> InstantlyResult<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let client = InstantlyClient::builder().build()?;
    let credential = client.credential(CredentialSources::from_env())?;

    // One page of accounts
    println!("Listing accounts...");
    let accounts = client
        .accounts(&credential)
        .list(&ListParams::new().limit(10))
        .await?;
    for account in &accounts.items {
        println!(
            "  {} (status {}, warmup {})",
            account["email"], account["status"], account["warmup_status"]
        );
    }
    if let Some(cursor) = &accounts.next_cursor {
        println!("  ...more available after {}", cursor);
    }

    // Every campaign, fetched lazily
    println!("\nListing campaigns...");
    let campaigns = client
        .campaigns(&credential)
        .paginate(ListParams::new())
        .max_items(50)
        .collect()
        .await?;
    println!("Found {} campaigns", campaigns.items.len());

    if let Some(campaign_id) = campaigns.items.first().and_then(|c| c["id"].as_str()) {
        println!("\nLeads in campaign {}:", campaign_id);
        let mut leads = std::pin::pin!(client
            .leads(&credential)
            .paginate(ListParams::new().filter("campaign", campaign_id))
            .into_stream());
        let mut count = 0usize;
        while let Some(lead) = leads.try_next().await? {
            count += 1;
            if count <= 5 {
                println!("  {}", lead["email"]);
            }
        }
        println!("  {} leads total", count);
    }

    let rate_limit = client.rate_limit();
    println!(
        "\nRate limit: {:?} of {:?} remaining",
        rate_limit.remaining, rate_limit.limit
    );

    Ok(())
}
