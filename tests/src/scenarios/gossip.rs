//! # Gossip Between Nodes
//!
//! A transaction submitted to one node reaches a peer through manual
//! gossip, is admitted there exactly once, and is built into the peer's
//! block.

#[cfg(test)]
mod tests {
    use crate::harness::{account, only_result, Cluster, FUNDS};
    use shared_types::{Action, ErrorKind, NodeId, NATIVE_ASSET};

    #[test]
    fn test_transfer_gossiped_and_built_by_peer() {
        let mut cluster = Cluster::new(2, 1);
        let sender = cluster.accounts[0].address();
        let recipient = account(200).address();

        let transfer = cluster.sign(
            &cluster.accounts[0],
            Action::Transfer {
                to: recipient,
                asset: NATIVE_ASSET,
                value: 100_000,
            },
        );
        let bytes = transfer.to_bytes().unwrap();
        cluster.node(0).submit_tx(&bytes).unwrap();
        assert_eq!(cluster.node(0).mempool_len(), 1);

        // Duplicate submission.
        let err = cluster.node(0).submit_tx(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);

        assert_eq!(cluster.node(0).trigger_gossip().unwrap(), 1);

        // A timestamp of zero is far outside the validity window.
        let stale = cluster.sign_at(
            &cluster.accounts[0],
            Action::Transfer {
                to: recipient,
                asset: NATIVE_ASSET,
                value: 110,
            },
            0,
        );
        assert!(cluster.node(0).submit_tx(&stale.to_bytes().unwrap()).is_err());

        // Gossip must not clear the duplicate check.
        let err = cluster.node(0).submit_tx(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);
        assert_eq!(cluster.node(0).mempool_len(), 1);

        assert_eq!(cluster.deliver(1), 1);
        assert_eq!(cluster.node(1).mempool_len(), 1);

        let block = cluster.expect_block(1);
        let result = only_result(&block);
        assert!(result.success);
        assert!(result.output.is_empty());
        let fee = cluster.node(1).rules().units(transfer.action());
        assert_eq!(result.units, fee);

        assert_eq!(cluster.native_balance(1, &sender), FUNDS - 100_000 - fee);
        assert_eq!(cluster.native_balance(1, &recipient), 100_000);
        cluster.assert_supply_invariant();
    }

    #[test]
    fn test_regossip_is_not_readmitted() {
        let mut cluster = Cluster::new(2, 1);
        let create = cluster.sign(&cluster.accounts[0], Action::CreateAsset { metadata: vec![] });
        cluster.submit(0, &create);

        cluster.node(0).trigger_gossip().unwrap();
        assert_eq!(cluster.deliver(1), 1);

        cluster.node(0).trigger_gossip().unwrap();
        assert_eq!(cluster.deliver(1), 0);
        assert_eq!(cluster.node(1).mempool_len(), 1);
    }

    #[test]
    fn test_gossip_reaches_every_peer() {
        let mut cluster = Cluster::new(3, 2);
        for key in &cluster.accounts {
            let tx = cluster.sign(key, Action::CreateAsset { metadata: vec![1] });
            cluster.submit(0, &tx);
        }

        assert_eq!(cluster.node(0).trigger_gossip().unwrap(), 2);
        assert_eq!(cluster.deliver(0), 0);
        assert_eq!(cluster.deliver(1), 2);
        assert_eq!(cluster.deliver(2), 2);
    }

    #[test]
    fn test_empty_mempool_sends_nothing() {
        let mut cluster = Cluster::new(2, 1);
        assert_eq!(cluster.node(0).trigger_gossip().unwrap(), 0);
        assert_eq!(cluster.deliver(1), 0);
    }

    #[test]
    fn test_malformed_gossip_dropped() {
        let cluster = Cluster::new(1, 1);
        let peer = NodeId::from_label("stranger");
        assert_eq!(cluster.node(0).handle_app_gossip(peer, &[0xff; 16]), 0);
        assert_eq!(cluster.node(0).mempool_len(), 0);
    }

    #[test]
    fn test_foreign_chain_transactions_dropped() {
        let mut cluster = Cluster::new(2, 1);
        let foreign = cluster.accounts[0]
            .sign_transaction(
                shared_types::Base {
                    chain_id: [0xAB; 32],
                    timestamp: shared_types::unix_now(),
                    unit_price: 1,
                },
                Action::CreateAsset { metadata: vec![] },
            )
            .unwrap();
        let message = shared_types::codec::encode(&vec![foreign.to_bytes().unwrap()]).unwrap();

        let from = cluster.node(0).node_id();
        assert_eq!(cluster.node(1).handle_app_gossip(from, &message), 0);
        assert_eq!(cluster.deliver(1), 0);
        assert_eq!(cluster.node(1).mempool_len(), 0);
    }

    #[test]
    fn test_accepted_block_clears_peer_mempool() {
        let mut cluster = Cluster::new(2, 1);
        let create = cluster.sign(&cluster.accounts[0], Action::CreateAsset { metadata: vec![] });
        let tx_id = cluster.submit(0, &create);
        cluster.node(0).trigger_gossip().unwrap();
        cluster.deliver(1);

        let block = cluster.expect_block(1);
        cluster.import(0, &block);

        assert_eq!(cluster.node(0).mempool_len(), 0);
        assert!(cluster.node(0).receipt(&tx_id).unwrap().unwrap().success);
        // Committed history keeps it out for good.
        let err = cluster.node(0).submit_tx(&create.to_bytes().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);
    }
}
