//! # Asset Ledger Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | `executor` | Executing one transfer over a layered view |
//! | `mempool` | Admission and block-sized pops |
//! | `block` | Build, import and verify of a full block on two nodes |

use std::sync::Arc;

use al_01_ledger_state::{KeyValueStore, MemoryStore, StateView};
use al_02_action_executor::execute_transaction;
use al_03_mempool::{Mempool, MempoolApi, MempoolConfig, NoCommittedHistory};
use al_tests::harness::{account, Cluster};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use shared_types::{unix_now, Action, Asset, Base, Rules, Transaction, NATIVE_ASSET};

fn transfers(count: usize, rules: &Rules) -> Vec<Transaction> {
    let key = account(1);
    (0..count)
        .map(|i| {
            key.sign_transaction(
                Base {
                    chain_id: rules.chain_id,
                    timestamp: unix_now(),
                    unit_price: 1,
                },
                Action::Transfer {
                    to: [2u8; 32],
                    asset: NATIVE_ASSET,
                    value: i as u64 + 1,
                },
            )
            .expect("signing")
        })
        .collect()
}

fn bench_executor(c: &mut Criterion) {
    let rules = Rules::default();
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let tx = transfers(1, &rules).remove(0);

    let mut group = c.benchmark_group("executor");
    group.throughput(Throughput::Elements(1));
    group.bench_function("transfer", |b| {
        b.iter_batched(
            || {
                let mut view = StateView::new(Arc::clone(&store));
                view.put_balance(&tx.sender(), &NATIVE_ASSET, 1_000_000);
                view.put_asset(
                    &NATIVE_ASSET,
                    &Asset {
                        metadata: b"AL".to_vec(),
                        supply: 1_000_000,
                        owner: [0u8; 32],
                    },
                )
                .expect("native asset");
                view
            },
            |mut view| black_box(execute_transaction(&tx, &rules, &mut view)),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_mempool(c: &mut Criterion) {
    let rules = Rules::default();
    let txs = transfers(500, &rules);
    let config = MempoolConfig {
        max_per_sender: 1_000,
        ..MempoolConfig::default()
    };

    let mut group = c.benchmark_group("mempool");
    group.throughput(Throughput::Elements(txs.len() as u64));
    group.bench_function("submit_then_pop_500", |b| {
        b.iter_batched(
            || Mempool::new(config.clone(), rules.clone(), Arc::new(NoCommittedHistory)),
            |pool| {
                for tx in &txs {
                    let _ = pool.submit(tx.clone());
                }
                black_box(pool.pop_n(rules.max_block_txs, rules.max_block_units, 1))
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("block");
    group.sample_size(20);
    group.bench_function("build_import_100", |b| {
        b.iter_batched(
            || {
                let cluster = Cluster::new(2, 4);
                for i in 0..100u64 {
                    let tx = cluster.sign(
                        &cluster.accounts[(i % 4) as usize],
                        Action::Transfer {
                            to: [9u8; 32],
                            asset: NATIVE_ASSET,
                            value: i + 1,
                        },
                    );
                    cluster.submit(0, &tx);
                }
                cluster
            },
            |cluster| {
                let block = cluster.node(0).build_block().expect("build");
                black_box(cluster.import(1, &block))
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_executor, bench_mempool, bench_block);
criterion_main!(benches);
