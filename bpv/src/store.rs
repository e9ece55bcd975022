//! Epoch-based publication of BPV tables.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::table::BpvTable;

/// Holds the table currently used for signing.
///
/// Readers take an `Arc` snapshot and keep using it for as long as they hold
/// it. Re-keying publishes a whole new table under a new epoch; a table is
/// never modified after it has been published, so a reader can not observe
/// secrets and publics from different generations.
pub struct TableStore {
    current: RwLock<Published>,
}

struct Published {
    epoch: u64,
    table: Arc<BpvTable>,
}

impl TableStore {
    /// Creates a store whose first epoch is `0`.
    pub fn new(table: BpvTable) -> Self {
        TableStore {
            current: RwLock::new(Published {
                epoch: 0,
                table: Arc::new(table),
            }),
        }
    }

    /// The table of the current epoch.
    pub fn current(&self) -> Arc<BpvTable> {
        self.snapshot().1
    }

    /// The current epoch together with its table.
    pub fn snapshot(&self) -> (u64, Arc<BpvTable>) {
        // The lock only guards a pointer swap, so a poisoned lock still holds
        // a consistent value.
        let published = self.current.read().unwrap_or_else(PoisonError::into_inner);
        (published.epoch, Arc::clone(&published.table))
    }

    pub fn epoch(&self) -> u64 {
        self.snapshot().0
    }

    /// Atomically replaces the table and returns the new epoch.
    ///
    /// Snapshots taken before the call keep the previous table alive until
    /// they are dropped.
    pub fn publish(&self, table: BpvTable) -> u64 {
        let table = Arc::new(table);
        let mut published = self.current.write().unwrap_or_else(PoisonError::into_inner);
        published.epoch += 1;
        published.table = table;
        debug!(epoch = published.epoch, "published bpv table");
        published.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BpvParams;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::thread;

    fn table(seed: u64) -> BpvTable {
        let params = BpvParams::new(16, 4).expect("valid");
        BpvTable::generate(params, &mut StdRng::seed_from_u64(seed)).expect("generate")
    }

    #[test]
    fn test_publish_bumps_epoch() {
        let store = TableStore::new(table(1));
        assert_eq!(store.epoch(), 0);

        let old = store.current();
        assert_eq!(store.publish(table(2)), 1);
        assert_eq!(store.epoch(), 1);

        // The old snapshot still holds the previous generation.
        assert_ne!(old.publics(), store.current().publics());
    }

    #[test]
    fn test_snapshots_are_consistent_across_threads() {
        let store = Arc::new(TableStore::new(table(1)));
        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for seed in 2..6 {
                    store.publish(table(seed));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let (_, snapshot) = store.snapshot();
                        for i in 0..snapshot.len() {
                            let (secret, public) = snapshot.entry(i);
                            assert_eq!(curve::Point::mul_generator(secret), *public);
                        }
                    }
                })
            })
            .collect();

        writer.join().expect("writer");
        for reader in readers {
            reader.join().expect("reader");
        }
        assert_eq!(store.epoch(), 4);
    }
}
