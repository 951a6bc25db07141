//! # Ledger Rules Through Blocks
//!
//! Asset creation, minting and transfers observed after acceptance,
//! including the failure paths that still land in a block.

#[cfg(test)]
mod tests {
    use crate::harness::{only_result, Cluster, FUNDS};
    use shared_types::{Action, ErrorKind, MAX_METADATA_SIZE, NATIVE_ASSET};

    // =============================================================================
    // ASSET LIFECYCLE
    // =============================================================================

    #[test]
    fn test_mint_by_other_key_fails_wrong_owner() {
        let mut cluster = Cluster::new(1, 3);
        let (a, b, c) = (
            cluster.accounts[0].address(),
            cluster.accounts[1].address(),
            cluster.accounts[2].address(),
        );

        let create = cluster.sign(
            &cluster.accounts[0],
            Action::CreateAsset {
                metadata: b"1".to_vec(),
            },
        );
        let asset = cluster.submit(0, &create);
        assert!(only_result(&cluster.expect_block(0)).success);

        let mint = cluster.sign(
            &cluster.accounts[0],
            Action::MintAsset {
                to: b,
                asset,
                value: 15,
            },
        );
        cluster.submit(0, &mint);
        assert!(only_result(&cluster.expect_block(0)).success);

        let stolen_mint = cluster.sign(
            &cluster.accounts[2],
            Action::MintAsset {
                to: c,
                asset,
                value: 5,
            },
        );
        cluster.submit(0, &stolen_mint);
        let block = cluster.expect_block(0);
        let result = only_result(&block);
        assert!(!result.success);
        assert!(result.output_str().contains("wrong owner"));

        let node = cluster.node(0);
        let record = node.asset(&asset).unwrap().unwrap();
        assert_eq!(record.supply, 15);
        assert_eq!(record.owner, a);
        assert_eq!(record.metadata, b"1".to_vec());
        assert_eq!(node.balance(&b, &asset).unwrap(), 15);
        assert_eq!(node.balance(&c, &asset).unwrap(), 0);
        cluster.assert_supply_invariant();
    }

    #[test]
    fn test_mint_overflow_leaves_state_unchanged() {
        let mut cluster = Cluster::new(1, 2);
        let b = cluster.accounts[1].address();

        let create = cluster.sign(&cluster.accounts[0], Action::CreateAsset { metadata: vec![] });
        let asset = cluster.submit(0, &create);
        cluster.expect_block(0);

        let fill = cluster.sign(
            &cluster.accounts[0],
            Action::MintAsset {
                to: b,
                asset,
                value: u64::MAX,
            },
        );
        cluster.submit(0, &fill);
        assert!(only_result(&cluster.expect_block(0)).success);

        let overflow = cluster.sign(
            &cluster.accounts[0],
            Action::MintAsset {
                to: b,
                asset,
                value: 1,
            },
        );
        cluster.submit(0, &overflow);
        let block = cluster.expect_block(0);
        let result = only_result(&block);
        assert!(!result.success);
        assert_eq!(result.output_str(), "supply overflow");
        assert_eq!(result.units, cluster.node(0).rules().units(overflow.action()));

        let node = cluster.node(0);
        assert_eq!(node.asset(&asset).unwrap().unwrap().supply, u64::MAX);
        assert_eq!(node.balance(&b, &asset).unwrap(), u64::MAX);
        cluster.assert_supply_invariant();
    }

    #[test]
    fn test_metadata_limits() {
        let mut cluster = Cluster::new(1, 1);
        let key = &cluster.accounts[0];

        let oversized = cluster.sign(
            key,
            Action::CreateAsset {
                metadata: vec![b'x'; 2 * MAX_METADATA_SIZE],
            },
        );
        let err = cluster
            .node(0)
            .submit_tx(&oversized.to_bytes().unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(cluster.node(0).mempool_len(), 0);

        let empty = cluster.sign(key, Action::CreateAsset { metadata: vec![] });
        let asset = cluster.submit(0, &empty);
        assert!(only_result(&cluster.expect_block(0)).success);

        let record = cluster.node(0).asset(&asset).unwrap().unwrap();
        assert!(record.metadata.is_empty());
        assert_eq!(record.supply, 0);
    }

    // =============================================================================
    // TRANSFERS
    // =============================================================================

    #[test]
    fn test_insufficient_transfer_included_with_fee() {
        let mut cluster = Cluster::new(1, 2);
        let (a, b) = (cluster.accounts[0].address(), cluster.accounts[1].address());
        let mut fees = 0;

        let create = cluster.sign(&cluster.accounts[0], Action::CreateAsset { metadata: vec![] });
        let asset = cluster.submit(0, &create);
        fees += only_result(&cluster.expect_block(0)).units;

        let mint = cluster.sign(
            &cluster.accounts[0],
            Action::MintAsset {
                to: a,
                asset,
                value: 10,
            },
        );
        cluster.submit(0, &mint);
        fees += only_result(&cluster.expect_block(0)).units;

        let transfer = cluster.sign(
            &cluster.accounts[0],
            Action::Transfer {
                to: b,
                asset,
                value: 11,
            },
        );
        let tx_id = cluster.submit(0, &transfer);
        let block = cluster.expect_block(0);
        let result = only_result(&block);
        assert_eq!(block.txs[0].id(), tx_id);
        assert!(!result.success);
        assert_eq!(result.output_str(), "insufficient balance");
        assert_eq!(result.units, cluster.node(0).rules().units(transfer.action()));
        fees += result.units;

        let node = cluster.node(0);
        assert_eq!(node.balance(&a, &asset).unwrap(), 10);
        assert_eq!(node.balance(&b, &asset).unwrap(), 0);
        assert_eq!(cluster.native_balance(0, &a), FUNDS - fees);
        assert_eq!(cluster.native_balance(0, &b), FUNDS);

        let receipt = node.receipt(&tx_id).unwrap().unwrap();
        assert!(!receipt.success);
        assert_eq!(receipt.units, result.units);
        assert_eq!(receipt.timestamp, block.timestamp);
        cluster.assert_supply_invariant();
    }

    #[test]
    fn test_native_transfer_and_burned_fees() {
        let mut cluster = Cluster::new(1, 2);
        let (a, b) = (cluster.accounts[0].address(), cluster.accounts[1].address());

        let transfer = cluster.sign(
            &cluster.accounts[0],
            Action::Transfer {
                to: b,
                asset: NATIVE_ASSET,
                value: 100_000,
            },
        );
        cluster.submit(0, &transfer);
        let block = cluster.expect_block(0);
        let fee = only_result(&block).units;

        assert_eq!(cluster.native_balance(0, &a), FUNDS - 100_000 - fee);
        assert_eq!(cluster.native_balance(0, &b), FUNDS + 100_000);
        let native = cluster.node(0).asset(&NATIVE_ASSET).unwrap().unwrap();
        assert_eq!(native.supply, 2 * FUNDS - fee);
        cluster.assert_supply_invariant();
    }

    #[test]
    fn test_invariant_holds_across_mixed_block() {
        let mut cluster = Cluster::new(1, 3);
        let (b, c) = (cluster.accounts[1].address(), cluster.accounts[2].address());

        let create = cluster.sign(&cluster.accounts[0], Action::CreateAsset { metadata: b"m".to_vec() });
        let asset = create.id();
        let txs = vec![
            create,
            cluster.sign(
                &cluster.accounts[0],
                Action::MintAsset {
                    to: b,
                    asset,
                    value: 40,
                },
            ),
            cluster.sign(
                &cluster.accounts[1],
                Action::Transfer {
                    to: c,
                    asset,
                    value: 15,
                },
            ),
            cluster.sign(
                &cluster.accounts[2],
                Action::Transfer {
                    to: b,
                    asset: NATIVE_ASSET,
                    value: 7,
                },
            ),
        ];
        for tx in &txs {
            cluster.submit(0, tx);
        }

        let block = cluster.expect_block(0);
        assert_eq!(block.results.len(), txs.len());
        assert!(block.results.iter().all(|r| r.success));

        let node = cluster.node(0);
        assert_eq!(node.balance(&b, &asset).unwrap(), 25);
        assert_eq!(node.balance(&c, &asset).unwrap(), 15);
        assert_eq!(node.asset(&asset).unwrap().unwrap().supply, 40);
        cluster.assert_supply_invariant();
    }
}
