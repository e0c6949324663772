//! Integration tests for token-ledger

use std::collections::HashMap;

use token_ledger::{
    utils::{format_units, AmountScale, MemoryStorage},
    AccountId, Amount, BalanceOperation, LedgerError, TokenCommand, TokenConfig, TokenLedger,
    TokenService, TokenStorage,
};

const NAME: &str = "Test Coin";
const SYMBOL: &str = "Test Coin";
const DECIMALS: u8 = 2;
const SUPPLY: Amount = 100;
const SCALED_SUPPLY: Amount = 10_000;

fn owner() -> AccountId {
    AccountId::new("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
}

fn addr(n: u8) -> AccountId {
    AccountId::new(format!("0x{:040x}", u32::from(n) + 1))
}

fn deploy() -> TokenLedger {
    TokenLedger::new(owner(), NAME, SYMBOL, DECIMALS, SUPPLY).unwrap()
}

fn assert_supply_matches_balances(ledger: &TokenLedger) {
    let report = ledger.validate_integrity();
    assert!(report.is_valid, "integrity issues: {:?}", report.issues);
    assert_eq!(report.sum_of_balances, Some(ledger.total_supply()));
}

#[test]
fn test_expected_info() {
    let ledger = deploy();

    assert_eq!(ledger.name(), NAME);
    assert_eq!(ledger.symbol(), SYMBOL);
    assert_eq!(ledger.decimals(), DECIMALS);
    assert_eq!(ledger.total_supply(), SCALED_SUPPLY);
    assert_eq!(ledger.balance_of(&owner()), SCALED_SUPPLY);
}

#[test]
fn test_transfer_tokens() {
    let mut ledger = deploy();

    ledger.transfer(&owner(), &addr(1), 100).unwrap();

    assert_eq!(ledger.balance_of(&owner()), SCALED_SUPPLY - 100);
    assert_eq!(ledger.balance_of(&addr(1)), 100);
    assert_supply_matches_balances(&ledger);
}

#[test]
fn test_transfer_more_than_balance_fails() {
    let mut ledger = deploy();

    let err = ledger
        .transfer(&owner(), &addr(1), SCALED_SUPPLY + 1)
        .unwrap_err();

    assert_eq!(err, LedgerError::InsufficientBalance(BalanceOperation::Transfer));
    assert!(err
        .to_string()
        .contains("Account doesn't have enough money to transfer"));
    assert_eq!(ledger.balance_of(&owner()), SCALED_SUPPLY);
    assert_eq!(ledger.balance_of(&addr(1)), 0);
}

#[test]
fn test_approve_overwrites() {
    let mut ledger = deploy();

    ledger.approve(&owner(), &addr(1), 10).unwrap();
    assert_eq!(ledger.allowance(&owner(), &addr(1)), 10);

    ledger.approve(&owner(), &addr(1), 10).unwrap();
    assert_eq!(ledger.allowance(&owner(), &addr(1)), 10);

    ledger.approve(&owner(), &addr(1), 3).unwrap();
    assert_eq!(ledger.allowance(&owner(), &addr(1)), 3);

    ledger.approve(&owner(), &addr(1), 0).unwrap();
    assert_eq!(ledger.allowance(&owner(), &addr(1)), 0);
}

#[test]
fn test_transfer_from_consumes_allowance() {
    let mut ledger = deploy();
    let spender = addr(1);

    ledger.approve(&owner(), &spender, 10).unwrap();
    assert_eq!(ledger.allowance(&owner(), &spender), 10);

    ledger
        .transfer_from(&spender, &owner(), &spender, 10)
        .unwrap();

    assert_eq!(ledger.allowance(&owner(), &spender), 0);
    assert_eq!(ledger.balance_of(&owner()), SCALED_SUPPLY - 10);
    assert_eq!(ledger.balance_of(&spender), 10);

    let err = ledger
        .transfer_from(&spender, &owner(), &spender, 1)
        .unwrap_err();
    assert_eq!(err, LedgerError::AllowanceExceeded);
    assert!(err.to_string().contains("Money transfer limit exceeded"));
    assert_supply_matches_balances(&ledger);
}

#[test]
fn test_transfer_from_to_third_account() {
    let mut ledger = deploy();
    let (spender, recipient) = (addr(1), addr(2));

    ledger.approve(&owner(), &spender, 500).unwrap();
    ledger
        .transfer_from(&spender, &owner(), &recipient, 200)
        .unwrap();

    assert_eq!(ledger.allowance(&owner(), &spender), 300);
    assert_eq!(ledger.balance_of(&recipient), 200);
    assert_eq!(ledger.balance_of(&spender), 0);
}

#[test]
fn test_transfer_from_more_than_balance_fails_without_consuming_allowance() {
    let mut ledger = deploy();
    let spender = addr(1);

    // a large allowance so the balance check is the one that trips
    ledger
        .approve(&owner(), &spender, SCALED_SUPPLY * 2)
        .unwrap();

    let err = ledger
        .transfer_from(&spender, &owner(), &spender, SCALED_SUPPLY + 1)
        .unwrap_err();

    assert!(err
        .to_string()
        .contains("Account doesn't have enough money to transfer"));
    assert_eq!(ledger.allowance(&owner(), &spender), SCALED_SUPPLY * 2);
    assert_eq!(ledger.balance_of(&owner()), SCALED_SUPPLY);
}

#[test]
fn test_transfer_from_beyond_allowance_reports_limit_first() {
    let mut ledger = deploy();
    let spender = addr(1);

    ledger.approve(&owner(), &spender, 10).unwrap();

    // exceeds both the allowance and the balance
    let err = ledger
        .transfer_from(&spender, &owner(), &spender, SCALED_SUPPLY + 1)
        .unwrap_err();
    assert_eq!(err, LedgerError::AllowanceExceeded);
}

#[test]
fn test_burn_without_balance_fails() {
    let mut ledger = deploy();

    let err = ledger.burn(&owner(), &addr(1), 10).unwrap_err();

    assert!(err
        .to_string()
        .contains("Account doesn't have enough money to burn"));
    assert_eq!(ledger.total_supply(), SCALED_SUPPLY);
}

#[test]
fn test_non_owner_cannot_burn_or_mint() {
    let mut ledger = deploy();
    let stranger = addr(1);

    let burn = ledger.burn(&stranger, &stranger, 10).unwrap_err();
    let mint = ledger.mint(&stranger, &stranger, 10).unwrap_err();

    for err in [burn, mint] {
        assert_eq!(err, LedgerError::NotOwner);
        assert!(err
            .to_string()
            .contains("only the owner of the contract can perform this operation"));
    }
    assert_eq!(ledger.total_supply(), SCALED_SUPPLY);
    assert_eq!(ledger.balance_of(&stranger), 0);
}

#[test]
fn test_burn_tokens() {
    let mut ledger = deploy();

    ledger.burn(&owner(), &owner(), 10).unwrap();

    assert_eq!(ledger.balance_of(&owner()), SCALED_SUPPLY - 10);
    assert_eq!(ledger.total_supply(), SCALED_SUPPLY - 10);
    assert_supply_matches_balances(&ledger);
}

#[test]
fn test_mint_tokens() {
    let mut ledger = deploy();

    ledger.mint(&owner(), &owner(), 10).unwrap();

    assert_eq!(ledger.balance_of(&owner()), SCALED_SUPPLY + 10);
    assert_eq!(ledger.total_supply(), SCALED_SUPPLY + 10);
    assert_supply_matches_balances(&ledger);
}

#[test]
fn test_supply_invariant_across_mixed_operations() {
    let mut ledger = deploy();
    let accounts: Vec<AccountId> = (1..=5).map(addr).collect();

    for (i, account) in accounts.iter().enumerate() {
        let amount = (i as Amount + 1) * 37;
        ledger.transfer(&owner(), account, amount).unwrap();
        ledger.approve(account, &owner(), amount).unwrap();
        assert_supply_matches_balances(&ledger);
    }

    for (i, account) in accounts.iter().enumerate() {
        let next = &accounts[(i + 1) % accounts.len()];
        let _ = ledger.transfer_from(&owner(), account, next, 20);
        let _ = ledger.transfer(account, next, 1_000);
        let _ = ledger.burn(&owner(), account, 5);
        let _ = ledger.mint(account, account, 5);
        ledger.mint(&owner(), next, 3).unwrap();
        assert_supply_matches_balances(&ledger);
    }
}

#[test]
fn test_config_deploy() {
    let config: TokenConfig = serde_json::from_str(
        r#"{
            "name": "Test Coin",
            "symbol": "Test Coin",
            "decimals": 2,
            "initial_supply": 100,
            "owner": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        }"#,
    )
    .unwrap();

    let ledger = TokenLedger::from_config(&config).unwrap();
    assert_eq!(ledger.owner(), &owner());
    assert_eq!(ledger.total_supply(), SCALED_SUPPLY);
    assert_eq!(format_units(ledger.total_supply(), ledger.decimals()), "100.00");

    let defaulted: TokenConfig = serde_json::from_str(
        r#"{"name": "Wei", "symbol": "W", "initial_supply": 1, "owner": "deployer"}"#,
    )
    .unwrap();
    assert_eq!(defaulted.decimals, 18);

    let mut invalid = config;
    invalid.symbol = String::new();
    assert!(matches!(
        TokenLedger::from_config(&invalid),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn test_snapshot_json_roundtrip_restores_state() {
    let mut ledger = deploy();
    ledger.transfer(&owner(), &addr(1), 1_234).unwrap();
    ledger.approve(&addr(1), &addr(2), 77).unwrap();

    let json = serde_json::to_string(&ledger.snapshot()).unwrap();
    let restored = TokenLedger::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();

    assert_eq!(restored.balance_of(&addr(1)), 1_234);
    assert_eq!(restored.allowance(&addr(1), &addr(2)), 77);
    assert_eq!(restored.holders(), ledger.holders());
}

#[tokio::test]
async fn test_task_workflow_through_service() {
    let storage = MemoryStorage::new();
    let mut service = TokenService::create(deploy(), storage.clone()).await.unwrap();
    let spender = addr(1);
    let scale = AmountScale::Display(DECIMALS);

    let task = |name: &str, pairs: &[(&str, String)]| {
        let params: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        TokenCommand::from_task(name, &params, scale).unwrap()
    };

    service
        .execute(
            &owner(),
            task("approve", &[("spender", spender.to_string()), ("amount", "1.5".into())]),
        )
        .await
        .unwrap();
    service
        .execute(
            &spender,
            task(
                "transfer-from",
                &[
                    ("from", owner().to_string()),
                    ("to", addr(2).to_string()),
                    ("value", "1.5".into()),
                ],
            ),
        )
        .await
        .unwrap();

    let err = service
        .execute(
            &spender,
            task(
                "transfer-from",
                &[
                    ("from", owner().to_string()),
                    ("to", addr(2).to_string()),
                    ("value", "0.01".into()),
                ],
            ),
        )
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::AllowanceExceeded);

    let ledger = service.ledger();
    assert_eq!(ledger.balance_of(&addr(2)).unwrap(), 150);
    assert_eq!(ledger.allowance(&owner(), &spender).unwrap(), 0);

    // genesis mint, approval, delegated transfer
    assert_eq!(storage.get_events().await.unwrap().len(), 3);
    assert_eq!(service.history(Some(&spender)).await.unwrap().len(), 1);

    let restored = TokenService::restore(storage).await.unwrap().unwrap();
    assert_eq!(
        restored.ledger().balance_of(&owner()).unwrap(),
        SCALED_SUPPLY - 150
    );
}
