//! Synthetic listener count.
//!
//! There is no audience data source behind this number: it is a uniform
//! draw over a small range, redrawn on the same cadence as the track
//! poller, and exists purely as decoration for the header.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::{ListenersConfig, MIN_INTERVAL};

pub struct ListenerCountEstimator {
    range: RangeInclusive<u32>,
    rng: StdRng,
}

impl ListenerCountEstimator {
    pub fn new(range: RangeInclusive<u32>) -> Self {
        Self::with_rng(range, StdRng::from_entropy())
    }

    pub fn with_rng(range: RangeInclusive<u32>, rng: StdRng) -> Self {
        // A reversed range would make gen_range panic.
        let (lo, hi) = (*range.start(), *range.end());
        let range = if lo <= hi { lo..=hi } else { hi..=lo };
        Self { range, rng }
    }

    pub fn from_config(config: &ListenersConfig) -> Self {
        Self::new(config.min..=config.max)
    }

    pub fn next(&mut self) -> u32 {
        self.rng.gen_range(self.range.clone())
    }
}

impl Default for ListenerCountEstimator {
    fn default() -> Self {
        Self::new(30..=40)
    }
}

/// Redraws the estimate every `interval` (at least one second), first draw
/// at start.  The task is aborted when the ticker is dropped.
pub struct ListenerTicker {
    rx: watch::Receiver<u32>,
    task: JoinHandle<()>,
}

impl ListenerTicker {
    pub fn spawn(mut estimator: ListenerCountEstimator, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(estimator.next());
        let interval = interval.max(MIN_INTERVAL);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately and was drawn above.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(estimator.next()).is_err() {
                    break;
                }
            }
        });
        Self { rx, task }
    }

    pub fn current(&self) -> u32 {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.rx.clone()
    }
}

impl Drop for ListenerTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_draws_stay_in_range_and_cover_it() {
        let mut estimator = ListenerCountEstimator::with_rng(30..=40, StdRng::seed_from_u64(7));
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let n = estimator.next();
            assert!((30..=40).contains(&n), "{} out of range", n);
            seen.insert(n);
        }
        assert_eq!(seen.len(), 11);
    }

    #[test]
    fn test_reversed_range_is_normalised() {
        let mut estimator = ListenerCountEstimator::with_rng(40..=30, StdRng::seed_from_u64(1));
        assert!((30..=40).contains(&estimator.next()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_redraws_on_interval() {
        let estimator = ListenerCountEstimator::with_rng(30..=40, StdRng::seed_from_u64(3));
        let ticker = ListenerTicker::spawn(estimator, Duration::from_secs(30));
        let mut rx = ticker.subscribe();
        assert!((30..=40).contains(&ticker.current()));

        for _ in 0..3 {
            tokio::time::timeout(Duration::from_secs(31), rx.changed())
                .await
                .expect("no redraw within one interval")
                .unwrap();
            assert!((30..=40).contains(&*rx.borrow()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let estimator = ListenerCountEstimator::with_rng(30..=40, StdRng::seed_from_u64(5));
        let ticker = ListenerTicker::spawn(estimator, Duration::ZERO);
        let mut rx = ticker.subscribe();

        // still alive and ticking once a second
        for _ in 0..2 {
            tokio::time::timeout(Duration::from_millis(1100), rx.changed())
                .await
                .expect("ticker task died")
                .unwrap();
        }
    }
}
