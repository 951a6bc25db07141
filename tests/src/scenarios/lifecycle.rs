//! # Block Lifecycle Across Nodes
//!
//! Blocks built on one node are imported, re-executed and accepted on
//! another; conflicting and out-of-order decisions are refused.

#[cfg(test)]
mod tests {
    use crate::harness::{account, Cluster};
    use shared_types::{Action, BlockStatus, ErrorKind, NATIVE_ASSET};

    /// Queues `count` distinct native transfers; `first` keeps batches
    /// queued in the same second apart.
    fn queue_transfers(cluster: &Cluster, node: usize, first: u64, count: u64) {
        for i in first..first + count {
            let tx = cluster.sign(
                &cluster.accounts[(i as usize) % cluster.accounts.len()],
                Action::Transfer {
                    to: account(100 + i as u8).address(),
                    asset: NATIVE_ASSET,
                    value: 1_000 + i,
                },
            );
            cluster.submit(node, &tx);
        }
    }

    #[test]
    fn test_fresh_verifier_reproduces_results() {
        let mut cluster = Cluster::new(2, 3);
        queue_transfers(&cluster, 0, 0, 5);
        let overdraft = cluster.sign(
            &cluster.accounts[0],
            Action::Transfer {
                to: account(150).address(),
                asset: [0x42; 32],
                value: 1,
            },
        );
        cluster.submit(0, &overdraft);

        let block = cluster.expect_block(0);
        assert_eq!(block.txs.len(), 6);
        assert_eq!(block.results.len(), 6);
        assert!(!block.results[5].success);

        // Verifying an accepted block again is a no-op.
        let id = block.id().unwrap();
        cluster.node(0).verify(&id).unwrap();

        let imported = cluster.import(1, &block);
        assert_eq!(imported, id);
        assert_eq!(cluster.node(1).get_block(&id).unwrap().results, block.results);
        assert_eq!(cluster.node(1).last_accepted(), cluster.node(0).last_accepted());

        for i in 0..5u8 {
            let address = account(100 + i).address();
            assert_eq!(cluster.native_balance(0, &address), cluster.native_balance(1, &address));
        }
        for key in &cluster.accounts {
            assert_eq!(
                cluster.native_balance(0, &key.address()),
                cluster.native_balance(1, &key.address())
            );
        }
        cluster.assert_supply_invariant();
    }

    #[test]
    fn test_tampered_results_fail_verification() {
        let cluster = Cluster::new(2, 1);
        queue_transfers(&cluster, 0, 0, 1);
        let mut block = cluster.node(0).build_block().unwrap();
        block.results[0].units += 1;

        let node = cluster.node(1);
        let id = node.parse_block(&block.to_bytes().unwrap()).unwrap();
        assert!(node.verify(&id).is_err());
        assert!(node.accept(&id).is_err());
        assert_eq!(node.last_accepted(), cluster.node(0).last_accepted());
    }

    #[test]
    fn test_reject_returns_transactions() {
        let cluster = Cluster::new(1, 1);
        queue_transfers(&cluster, 0, 0, 2);
        let node = cluster.node(0);

        let block = node.build_block().unwrap();
        let id = block.id().unwrap();
        assert_eq!(node.block_status(&id).unwrap(), BlockStatus::Processing);

        node.reject(&id).unwrap();
        assert_eq!(node.block_status(&id).unwrap(), BlockStatus::Rejected);
        assert_eq!(node.mempool_len(), 2);
        assert!(node.accept(&id).is_err());

        let rebuilt = node.build_block().unwrap();
        assert_eq!(rebuilt.txs.len(), 2);
        let rebuilt_id = rebuilt.id().unwrap();
        node.accept(&rebuilt_id).unwrap();
        assert_eq!(node.accepted_height(), 1);
    }

    #[test]
    fn test_chain_of_processing_blocks_accepts_in_order() {
        let cluster = Cluster::new(2, 2);
        let node = cluster.node(0);

        queue_transfers(&cluster, 0, 0, 1);
        let first = node.build_block().unwrap();
        let first_id = first.id().unwrap();
        node.set_preference(first_id).unwrap();

        queue_transfers(&cluster, 0, 1, 2);
        let second = node.build_block().unwrap();
        let second_id = second.id().unwrap();
        assert_eq!(second.parent, first_id);
        assert_eq!(second.height, 2);

        let err = node.accept(&second_id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsensusSequence);

        node.accept(&first_id).unwrap();
        node.accept(&second_id).unwrap();
        assert_eq!(node.accepted_height(), 2);

        // The peer imports both, parent first.
        cluster.import(1, &first);
        cluster.import(1, &second);
        assert_eq!(cluster.node(1).last_accepted(), second_id);
        cluster.assert_supply_invariant();
    }

    #[test]
    fn test_competing_blocks_resolve_to_one() {
        let mut cluster = Cluster::new(2, 1);
        queue_transfers(&cluster, 0, 0, 1);
        cluster.node(0).trigger_gossip().unwrap();
        assert_eq!(cluster.deliver(1), 1);

        let own = cluster.node(1).build_block().unwrap();
        let own_id = own.id().unwrap();

        let winner = cluster.expect_block(0);
        let winner_id = cluster.import(1, &winner);
        assert_ne!(winner_id, own_id);

        let node = cluster.node(1);
        node.reject(&own_id).unwrap();
        assert_eq!(node.block_status(&own_id).unwrap(), BlockStatus::Rejected);
        assert_eq!(node.mempool_len(), 0);
        assert_eq!(node.last_accepted(), winner_id);
        cluster.assert_supply_invariant();
    }
}
