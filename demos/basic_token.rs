//! Basic token ledger usage example

use std::collections::HashMap;

use token_ledger::utils::{format_units, AmountScale, MemoryStorage};
use token_ledger::{AccountId, TokenCommand, TokenConfig, TokenLedger, TokenService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("🪙 Token Ledger - Basic Example\n");

    // 1. Deploy the token
    let owner: AccountId = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse()?;
    let alice: AccountId = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse()?;
    let bob: AccountId = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC".parse()?;

    let config = TokenConfig::new("Test Coin", "TST", 2, 100, owner.clone());
    let ledger = TokenLedger::from_config(&config)?;
    let decimals = ledger.decimals();
    let mut service = TokenService::create(ledger, MemoryStorage::new()).await?;

    println!(
        "📊 Deployed {} with supply {}\n",
        config.symbol,
        format_units(service.ledger().total_supply()?, decimals)
    );

    // 2. Run a few tasks the way the command line would
    let scale = AmountScale::Display(decimals);
    let tasks: Vec<(&AccountId, &str, Vec<(&str, String)>)> = vec![
        (&owner, "transfer", vec![("to", alice.to_string()), ("value", "25".into())]),
        (&alice, "approve", vec![("spender", bob.to_string()), ("amount", "10".into())]),
        (
            &bob,
            "transfer-from",
            vec![
                ("from", alice.to_string()),
                ("to", bob.to_string()),
                ("value", "7.5".into()),
            ],
        ),
        (&bob, "mint", vec![("to", bob.to_string()), ("amount", "1000".into())]),
        (&owner, "burn", vec![("from", owner.to_string()), ("amount", "5".into())]),
    ];

    for (caller, task, pairs) in tasks {
        let params: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let command = TokenCommand::from_task(task, &params, scale)?;

        match service.execute(caller, command).await {
            Ok(_) => println!("  ✓ {} by {}", task, caller),
            Err(e) => println!("  ✗ {} by {}: {}", task, caller, e),
        }
    }
    println!();

    // 3. Report balances
    println!("💰 Balances:");
    for account in [&owner, &alice, &bob] {
        println!(
            "  {}: {}",
            account,
            format_units(service.ledger().balance_of(account)?, decimals)
        );
    }
    println!(
        "  allowance alice → bob: {}",
        format_units(service.ledger().allowance(&alice, &bob)?, decimals)
    );

    let report = service.ledger().validate_integrity()?;
    println!(
        "\n🔍 Integrity: {} (supply {})",
        if report.is_valid { "ok" } else { "BROKEN" },
        format_units(report.total_supply, decimals)
    );
    println!("📜 Events recorded: {}", service.history(None).await?.len());

    Ok(())
}
