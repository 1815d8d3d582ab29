//! # Enforcement Sweeper
//!
//! Periodic loop applying schedule decisions to currently-connected
//! participants. Each tick captures `now` and a store snapshot once, so all
//! decisions within a tick agree on the time and the schedules. Disconnect
//! actions run concurrently, each with a bounded deadline; one hung or
//! failed call never stalls the rest of the tick.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Single configurable engine (interval, tolerance, deadline)
//! - 1.0.0: Initial creation with fixed 2s polling

use crate::features::enforcement::evaluator::{evaluate, MatchDecision};
use crate::features::enforcement::gateway::{CommunityId, ParticipantId, PresenceGateway};
use crate::features::schedule::ScheduleStore;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, MissedTickBehavior};

/// Periodic presence-enforcement driver.
///
/// Reads schedules, never writes them. Command handlers mutate the store
/// concurrently; the per-tick snapshot keeps the two from interleaving
/// inside a tick.
pub struct EnforcementSweeper<G> {
    store: Arc<ScheduleStore>,
    gateway: G,
    interval: Duration,
    tolerance_minutes: u32,
    disconnect_timeout: Duration,
    /// UTC minute stamp of each user's last successful disconnect.
    recent_disconnects: DashMap<ParticipantId, i64>,
}

impl<G: PresenceGateway> EnforcementSweeper<G> {
    pub fn new(
        store: Arc<ScheduleStore>,
        gateway: G,
        interval: Duration,
        tolerance_minutes: u32,
        disconnect_timeout: Duration,
    ) -> Self {
        EnforcementSweeper {
            store,
            gateway,
            interval,
            tolerance_minutes,
            disconnect_timeout,
            recent_disconnects: DashMap::new(),
        }
    }

    /// Run the sweep until the process shuts down.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        // A tick that overruns delays the next one instead of bursting, so
        // no participant is ever processed by two ticks at once.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Enforcement sweep started (interval: {:?}, tolerance: {} min)",
            self.interval, self.tolerance_minutes
        );

        loop {
            ticker.tick().await;
            self.sweep(Utc::now()).await;
        }
    }

    /// One enforcement tick at the given instant.
    pub async fn sweep(&self, now_utc: DateTime<Utc>) {
        let records = self.store.snapshot().await;
        if records.is_empty() {
            return;
        }

        let minute_stamp = now_utc.timestamp() / 60;
        let mut seen: HashSet<ParticipantId> = HashSet::new();
        let mut actions = Vec::new();

        for community in self.gateway.communities() {
            for participant in self.gateway.connected_participants(community) {
                if !seen.insert(participant) {
                    continue;
                }

                let record = match records.get(&participant.to_string()) {
                    Some(record) => record,
                    None => continue,
                };

                let decision = evaluate(now_utc, record, self.tolerance_minutes);
                if !decision.any() {
                    continue;
                }

                if self.disconnected_this_minute(participant, minute_stamp) {
                    debug!("Skipping {participant}: already disconnected this minute");
                    continue;
                }

                actions.push(self.disconnect_one(community, participant, minute_stamp, decision));
            }
        }

        // Per-participant actions progress concurrently; each carries its
        // own deadline, so one hung call cannot stall the tick.
        join_all(actions).await;

        self.prune_stale_stamps(minute_stamp);
    }

    fn disconnected_this_minute(&self, participant: ParticipantId, minute_stamp: i64) -> bool {
        self.recent_disconnects
            .get(&participant)
            .map(|stamp| *stamp == minute_stamp)
            .unwrap_or(false)
    }

    async fn disconnect_one(
        &self,
        community: CommunityId,
        participant: ParticipantId,
        minute_stamp: i64,
        decision: MatchDecision,
    ) {
        let attempt = self.gateway.disconnect(community, participant);
        match timeout(self.disconnect_timeout, attempt).await {
            Ok(Ok(())) => {
                self.recent_disconnects.insert(participant, minute_stamp);
                info!(
                    "Disconnected {participant} in {community} (exact: {}, window: {})",
                    decision.exact_hit, decision.window_hit
                );
            }
            Ok(Err(e)) => {
                warn!("Failed to disconnect {participant} in {community}: {e}");
            }
            Err(_) => {
                warn!(
                    "Disconnect of {participant} in {community} timed out after {:?}",
                    self.disconnect_timeout
                );
            }
        }
    }

    /// Drop stamps older than the previous minute; they can never suppress
    /// another disconnect.
    fn prune_stale_stamps(&self, minute_stamp: i64) {
        self.recent_disconnects
            .retain(|_, stamp| minute_stamp - *stamp <= 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::schedule::ScheduleStore;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Gateway with a fixed participant list that records every disconnect
    /// attempt and can be told to fail for specific participants.
    struct MockGateway {
        participants: Vec<ParticipantId>,
        fail_for: HashSet<ParticipantId>,
        disconnects: Mutex<Vec<ParticipantId>>,
    }

    impl MockGateway {
        fn new(participants: Vec<ParticipantId>) -> Self {
            MockGateway {
                participants,
                fail_for: HashSet::new(),
                disconnects: Mutex::new(Vec::new()),
            }
        }

        fn failing_for(mut self, participant: ParticipantId) -> Self {
            self.fail_for.insert(participant);
            self
        }
    }

    #[async_trait]
    impl PresenceGateway for Arc<MockGateway> {
        fn communities(&self) -> Vec<CommunityId> {
            vec![1]
        }

        fn connected_participants(&self, _community: CommunityId) -> Vec<ParticipantId> {
            self.participants.clone()
        }

        async fn disconnect(
            &self,
            _community: CommunityId,
            participant: ParticipantId,
        ) -> anyhow::Result<()> {
            self.disconnects.lock().unwrap().push(participant);
            if self.fail_for.contains(&participant) {
                return Err(anyhow!("member already left"));
            }
            Ok(())
        }
    }

    fn utc(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, second)
            .unwrap()
    }

    async fn store_with_window(user_id: &str, window: &str) -> (tempfile::TempDir, Arc<ScheduleStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ScheduleStore::load(dir.path().join("settings.json")).unwrap());
        store
            .set_window(user_id, window.parse().unwrap())
            .await
            .unwrap();
        (dir, store)
    }

    fn sweeper_over(
        store: Arc<ScheduleStore>,
        gateway: Arc<MockGateway>,
    ) -> EnforcementSweeper<Arc<MockGateway>> {
        EnforcementSweeper::new(
            store,
            gateway,
            Duration::from_secs(2),
            1,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_matching_participant_is_disconnected() {
        let (_dir, store) = store_with_window("7", "09:00-17:00").await;
        let gateway = Arc::new(MockGateway::new(vec![7]));
        let sweeper = sweeper_over(store, gateway.clone());

        sweeper.sweep(utc(12, 0, 0)).await;

        assert_eq!(*gateway.disconnects.lock().unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_participant_without_record_is_skipped() {
        let (_dir, store) = store_with_window("7", "09:00-17:00").await;
        let gateway = Arc::new(MockGateway::new(vec![8, 9]));
        let sweeper = sweeper_over(store, gateway.clone());

        sweeper.sweep(utc(12, 0, 0)).await;

        assert!(gateway.disconnects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_matching_time_is_ignored() {
        let (_dir, store) = store_with_window("7", "09:00-17:00").await;
        let gateway = Arc::new(MockGateway::new(vec![7]));
        let sweeper = sweeper_over(store, gateway.clone());

        sweeper.sweep(utc(18, 0, 0)).await;

        assert!(gateway.disconnects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_minute_ticks_disconnect_once() {
        let (_dir, store) = store_with_window("7", "09:00-17:00").await;
        let gateway = Arc::new(MockGateway::new(vec![7]));
        let sweeper = sweeper_over(store, gateway.clone());

        // Two ticks land inside the same UTC minute.
        sweeper.sweep(utc(12, 0, 1)).await;
        sweeper.sweep(utc(12, 0, 3)).await;

        assert_eq!(*gateway.disconnects.lock().unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_next_minute_disconnects_again() {
        let (_dir, store) = store_with_window("7", "09:00-17:00").await;
        let gateway = Arc::new(MockGateway::new(vec![7]));
        let sweeper = sweeper_over(store, gateway.clone());

        sweeper.sweep(utc(12, 0, 58)).await;
        sweeper.sweep(utc(12, 1, 0)).await;

        assert_eq!(*gateway.disconnects.lock().unwrap(), vec![7, 7]);
    }

    #[tokio::test]
    async fn test_failed_disconnect_does_not_block_others() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ScheduleStore::load(dir.path().join("settings.json")).unwrap());
        store.set_window("7", "09:00-17:00".parse().unwrap()).await.unwrap();
        store.set_window("8", "09:00-17:00".parse().unwrap()).await.unwrap();

        let gateway = Arc::new(MockGateway::new(vec![7, 8]).failing_for(7));
        let sweeper = sweeper_over(store, gateway.clone());

        sweeper.sweep(utc(12, 0, 0)).await;

        let mut attempts = gateway.disconnects.lock().unwrap().clone();
        attempts.sort_unstable();
        assert_eq!(attempts, vec![7, 8]);
    }

    #[tokio::test]
    async fn test_failed_disconnect_is_retried_within_the_minute() {
        let (_dir, store) = store_with_window("7", "09:00-17:00").await;
        let gateway = Arc::new(MockGateway::new(vec![7]).failing_for(7));
        let sweeper = sweeper_over(store, gateway.clone());

        // Only successful disconnects are deduplicated.
        sweeper.sweep(utc(12, 0, 1)).await;
        sweeper.sweep(utc(12, 0, 3)).await;

        assert_eq!(*gateway.disconnects.lock().unwrap(), vec![7, 7]);
    }

    #[tokio::test]
    async fn test_exact_moment_fires_through_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ScheduleStore::load(dir.path().join("settings.json")).unwrap());
        store
            .set_exact_moment("7", "07:00".parse().unwrap())
            .await
            .unwrap();

        let gateway = Arc::new(MockGateway::new(vec![7]));
        let sweeper = sweeper_over(store, gateway.clone());

        sweeper.sweep(utc(7, 0, 0)).await;

        assert_eq!(*gateway.disconnects.lock().unwrap(), vec![7]);
    }
}
