use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::Rng;

/// Page view id source.
///
/// Ids look like `<unix_nanos>_<seq>`. The wall-clock half keeps them roughly
/// time-sortable; the sequence is a process-wide counter, so two ids minted
/// in the same nanosecond still differ. The counter starts at a random offset
/// so a restart with a clock that went backwards does not replay old ids.
#[derive(Debug)]
pub struct IdGenerator {
    seq: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        let start = rand::thread_rng().gen_range(0..u64::from(u32::MAX));
        Self::starting_at(start)
    }

    pub fn starting_at(start: u64) -> Self {
        Self {
            seq: AtomicU64::new(start),
        }
    }

    pub fn next_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let nanos = Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_else(|| Utc::now().timestamp_micros() * 1_000);
        format!("{nanos}_{seq}")
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn ids_have_time_and_sequence_parts() {
        let ids = IdGenerator::starting_at(7);
        let id = ids.next_id();
        let (nanos, seq) = id.split_once('_').expect("separator");
        assert!(nanos.parse::<i64>().expect("nanos") > 0);
        assert_eq!(seq, "7");
        assert!(ids.next_id().ends_with("_8"));
    }

    #[test]
    fn burst_of_ids_is_unique() {
        let ids = IdGenerator::new();
        let seen: HashSet<String> = (0..10_000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let ids = Arc::new(IdGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..1_000).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("thread") {
                assert!(seen.insert(id), "duplicate id");
            }
        }
        assert_eq!(seen.len(), 8_000);
    }
}
