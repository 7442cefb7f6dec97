//! End-to-end ledger scenarios: admit signed transfers, mine, check
//! balances, then tamper with the stored chain and watch validation fail.

use tinyledger::{Blockchain, BlockchainError, Transaction, Wallet};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn full_ledger_lifecycle() {
    init_logging();

    let mut ledger = Blockchain::with_params(2, 500.0);
    let alice = Wallet::new();
    let bob = Wallet::new();

    // Alice pays Bob 20
    let mut tx = Transaction::new(alice.address().clone(), bob.address().clone(), 20.0);
    tx.sign(&alice).unwrap();
    ledger.add_transaction(tx).unwrap();

    ledger.mine_pending_transactions(alice.address());

    assert_eq!(ledger.balance_of(alice.address()), 480.0);
    assert_eq!(ledger.balance_of(bob.address()), 20.0);

    // Mining again with an empty pool still credits the reward
    ledger.mine_pending_transactions(alice.address());

    assert_eq!(ledger.balance_of(alice.address()), 980.0);
    assert_eq!(ledger.balance_of(bob.address()), 20.0);
    assert!(ledger.is_valid());

    // Overwrite the stored transfer amount, bypassing the admission gate
    ledger.debug_tamper_transaction_amount(1, 0, 95.0);
    assert!(!ledger.is_valid());
}

#[test]
fn chain_links_and_hashes_hold_after_mining() {
    init_logging();

    let mut ledger = Blockchain::with_params(1, 100.0);
    let miner = Wallet::new();

    for _ in 0..3 {
        ledger.mine_pending_transactions(miner.address());
    }

    let blocks = ledger.blocks();
    assert_eq!(blocks.len(), 4);

    for i in 1..blocks.len() {
        assert_eq!(blocks[i].previous_hash(), blocks[i - 1].hash());
        assert_eq!(blocks[i].hash(), blocks[i].calculate_hash());
        assert!(blocks[i].hash().starts_with('0'));
    }

    assert!(ledger.is_valid());
}

#[test]
fn rejected_transactions_never_reach_a_block() {
    init_logging();

    let mut ledger = Blockchain::with_params(1, 100.0);
    let alice = Wallet::new();
    let bob = Wallet::new();

    // Unsigned, zero-amount, and senderless transfers are all turned away
    let unsigned = Transaction::new(alice.address().clone(), bob.address().clone(), 10.0);
    assert!(ledger.add_transaction(unsigned).is_err());

    let mut zero = Transaction::new(alice.address().clone(), bob.address().clone(), 0.0);
    zero.sign(&alice).unwrap();
    assert!(matches!(
        ledger.add_transaction(zero),
        Err(BlockchainError::InvalidAmount(_))
    ));

    let mint = Transaction::reward(bob.address().clone(), 10.0);
    assert!(matches!(
        ledger.add_transaction(mint),
        Err(BlockchainError::MissingAddress)
    ));

    let block = ledger.mine_pending_transactions(alice.address());

    // Only the mining reward made it in
    assert_eq!(block.transactions().len(), 1);
    assert!(block.transactions()[0].is_reward());
    assert_eq!(ledger.balance_of(bob.address()), 0.0);
}
