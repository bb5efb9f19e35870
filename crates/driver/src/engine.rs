//! RecordStreamEngine - live / startup / archive traversals over one drain
//! primitive
//!
//! Traversals are sequential and stateful: one cursor and one previous
//! packet, threaded strictly in row order. Packets are pushed onto a bounded
//! channel; a dropped receiver is cooperative cancellation, checked at the
//! top of every loop iteration so shutdown never waits longer than one
//! backoff interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use contracts::{ContractError, Cursor, DriverConfig, Packet, Reading, RowStore};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::merge::merge;
use crate::reader::IncrementalReader;
use crate::role_map::SensorRoleMap;

/// Context window re-merged before a resume point so carry-forward fields
/// are rebuilt, in seconds.
const CATCHUP_CONTEXT_SECS: i64 = 300;

/// Outcome of one drain pass.
enum Drain {
    /// Rows consumed (possibly zero)
    Consumed(usize),
    /// Receiver dropped; traversal should stop
    Cancelled,
}

/// Drives the three traversal modes atop the incremental reader and the
/// packet merge, owning the live cursor and emission policy.
pub struct RecordStreamEngine<S> {
    reader: IncrementalReader<S>,
    roles: SensorRoleMap,
    hardware_name: String,
    archive_interval: Duration,
    poll_backoff: Duration,
    cursor: Option<Cursor>,
    last_packet: Option<Packet>,
}

impl<S: RowStore + Send + Sync + 'static> RecordStreamEngine<S> {
    /// Build an engine over a row store; fails fast on a malformed role
    /// configuration.
    pub fn new(store: Arc<S>, config: &DriverConfig) -> Result<Self, ContractError> {
        let roles = SensorRoleMap::from_config(config)?;
        Ok(Self {
            reader: IncrementalReader::new(store),
            roles,
            hardware_name: config.hardware_name.clone(),
            archive_interval: Duration::from_secs(config.archive_interval_secs),
            poll_backoff: Duration::from_secs(config.poll_backoff_secs),
            cursor: None,
            last_packet: None,
        })
    }

    /// Static identity string reported to the host engine.
    pub fn hardware_name(&self) -> &str {
        &self.hardware_name
    }

    /// Fixed reporting cadence reported to the host engine.
    pub fn archive_interval(&self) -> Duration {
        self.archive_interval
    }

    /// Position of the last consumed reading, for host-side resume
    /// diagnostics.
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// Live tailing: drain forever, sleeping one backoff interval between
    /// empty polls. Terminates only on storage error (fatal; the host may
    /// rebuild with a resumed cursor) or when the receiver is dropped.
    #[instrument(name = "engine_loop_packets", skip(self, tx))]
    pub async fn run_loop_packets(
        &mut self,
        tx: &mpsc::Sender<Packet>,
    ) -> Result<(), ContractError> {
        info!(cursor_id = self.cursor.map(|c| c.id), "live traversal started");
        loop {
            if tx.is_closed() {
                debug!("receiver dropped, stopping live traversal");
                return Ok(());
            }
            match self.drain(tx, "live").await? {
                Drain::Cancelled => return Ok(()),
                Drain::Consumed(0) => {
                    metrics::counter!("station_idle_polls_total").increment(1);
                    tokio::time::sleep(self.poll_backoff).await;
                }
                Drain::Consumed(_) => {}
            }
        }
    }

    /// Startup catch-up: re-merge a context window before `last_emitted_ts`,
    /// suppress packets the host has already seen, then keep draining with
    /// live semantics until one poll comes back empty, so rows inserted
    /// during a slow catch-up are not lost at the boundary.
    #[instrument(name = "engine_startup_records", skip(self, tx))]
    pub async fn run_startup_records(
        &mut self,
        last_emitted_ts: Option<i64>,
        tx: &mpsc::Sender<Packet>,
    ) -> Result<(), ContractError> {
        let floor = last_emitted_ts.unwrap_or(0);
        let anchor = catchup_anchor(last_emitted_ts);
        info!(floor, %anchor, "startup catch-up started");

        let rows = self.reader.since(anchor).await?;
        if rows.is_empty() {
            // Nothing newer than the anchor. Entering the drain loop here
            // would poll with no cursor and replay the whole table below the
            // suppression floor.
            info!("no backlog rows, catch-up complete");
            return Ok(());
        }
        for reading in rows {
            if tx.is_closed() {
                return Ok(());
            }
            let packet = self.consume(&reading);
            if packet.date_time > floor {
                if tx.send(packet).await.is_err() {
                    return Ok(());
                }
                metrics::counter!("station_packets_emitted_total", "mode" => "startup")
                    .increment(1);
            } else {
                // merged for state continuity only
                metrics::counter!("station_packets_suppressed_total").increment(1);
            }
        }

        // Rows kept arriving while the backlog was processed; drain until a
        // poll comes back empty, then hand over to plain live mode.
        loop {
            if tx.is_closed() {
                return Ok(());
            }
            match self.drain(tx, "startup").await? {
                Drain::Cancelled | Drain::Consumed(0) => {
                    info!(cursor_id = self.cursor.map(|c| c.id), "catch-up complete");
                    return Ok(());
                }
                Drain::Consumed(_) => {}
            }
        }
    }

    /// Archive replay: one bounded `since` query with local merge state,
    /// emitting packets newer than `since_ts`, then termination. Never
    /// touches the live cursor.
    #[instrument(name = "engine_archive_records", skip(self, tx))]
    pub async fn run_archive_records(
        &self,
        since_ts: Option<i64>,
        tx: &mpsc::Sender<Packet>,
    ) -> Result<(), ContractError> {
        let floor = since_ts.unwrap_or(0);
        let anchor = catchup_anchor(since_ts);
        info!(floor, %anchor, "archive replay started");

        let rows = self.reader.since(anchor).await?;
        let mut previous: Option<Packet> = None;
        for reading in rows {
            if tx.is_closed() {
                return Ok(());
            }
            let packet = merge(previous.as_ref(), &reading, &self.roles);
            previous = Some(packet.clone());
            if packet.date_time > floor {
                if tx.send(packet).await.is_err() {
                    return Ok(());
                }
                metrics::counter!("station_packets_emitted_total", "mode" => "archive")
                    .increment(1);
            }
        }
        Ok(())
    }

    /// Spawn live tailing onto its own task, returning the packet stream.
    pub fn spawn_loop_packets(
        mut self,
        capacity: usize,
    ) -> (mpsc::Receiver<Packet>, JoinHandle<Result<(), ContractError>>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(async move { self.run_loop_packets(&tx).await });
        (rx, handle)
    }

    /// Spawn startup catch-up onto its own task.
    pub fn spawn_startup_records(
        mut self,
        last_emitted_ts: Option<i64>,
        capacity: usize,
    ) -> (mpsc::Receiver<Packet>, JoinHandle<Result<(), ContractError>>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle =
            tokio::spawn(async move { self.run_startup_records(last_emitted_ts, &tx).await });
        (rx, handle)
    }

    /// Spawn archive replay onto its own task.
    pub fn spawn_archive_records(
        self,
        since_ts: Option<i64>,
        capacity: usize,
    ) -> (mpsc::Receiver<Packet>, JoinHandle<Result<(), ContractError>>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(async move { self.run_archive_records(since_ts, &tx).await });
        (rx, handle)
    }

    /// One poll: fetch rows after the cursor, merge each in order, advance
    /// the cursor, emit every packet.
    async fn drain(
        &mut self,
        tx: &mpsc::Sender<Packet>,
        mode: &'static str,
    ) -> Result<Drain, ContractError> {
        let rows = self.reader.after(self.cursor.as_ref()).await?;
        let count = rows.len();
        for reading in rows {
            let packet = self.consume(&reading);
            if tx.send(packet).await.is_err() {
                return Ok(Drain::Cancelled);
            }
            metrics::counter!("station_packets_emitted_total", "mode" => mode).increment(1);
        }
        Ok(Drain::Consumed(count))
    }

    /// Merge one reading into the traversal state.
    fn consume(&mut self, reading: &Reading) -> Packet {
        let packet = merge(self.last_packet.as_ref(), reading, &self.roles);
        self.cursor = Some(Cursor::from(reading));
        self.last_packet = Some(packet.clone());
        packet
    }
}

/// Anchor instant for time-based backfill: `CATCHUP_CONTEXT_SECS` before the
/// resume point, or the epoch origin when starting from nothing.
fn catchup_anchor(last_ts: Option<i64>) -> DateTime<Utc> {
    match last_ts {
        Some(ts) => DateTime::from_timestamp(ts - CATCHUP_CONTEXT_SECS, 0)
            .unwrap_or(DateTime::UNIX_EPOCH),
        None => DateTime::UNIX_EPOCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryRowStore;

    fn config() -> DriverConfig {
        DriverConfig {
            indoor_sensor_id: Some("00002".into()),
            outdoor_sensor_id: Some("00001".into()),
            ..Default::default()
        }
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn outdoor(id: u64, secs: i64, temp: f64) -> Reading {
        let mut reading = Reading::new(id, "00001", ts(secs));
        reading.temperature_c = Some(temp);
        reading
    }

    fn engine(store: &Arc<MemoryRowStore>) -> RecordStreamEngine<MemoryRowStore> {
        RecordStreamEngine::new(Arc::clone(store), &config()).unwrap()
    }

    #[test]
    fn test_identity_surface() {
        let store = Arc::new(MemoryRowStore::new());
        let engine = engine(&store);
        assert_eq!(engine.hardware_name(), "generic 5-in-1 station");
        assert_eq!(engine.archive_interval(), Duration::from_secs(60));
        assert!(engine.cursor().is_none());
    }

    #[tokio::test]
    async fn test_live_emits_preloaded_and_inserted_rows() {
        let store = Arc::new(MemoryRowStore::new());
        store.insert_all([outdoor(1, 100, 1.0), outdoor(2, 110, 2.0)]);

        let (mut rx, handle) = engine(&store).spawn_loop_packets(16);
        assert_eq!(rx.recv().await.unwrap().date_time, 100);
        assert_eq!(rx.recv().await.unwrap().date_time, 110);

        store.insert(outdoor(3, 120, 3.0));
        let late = rx.recv().await.unwrap();
        assert_eq!(late.date_time, 120);
        assert_eq!(late.out_temp, Some(3.0));

        drop(rx);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_live_datetime_strictly_increasing() {
        let store = Arc::new(MemoryRowStore::new());
        // same-timestamp rows from different sensors
        store.insert_all([
            outdoor(1, 100, 1.0),
            Reading::new(2, "00002", ts(100)),
            Reading::new(3, "feed", ts(100)),
            outdoor(4, 101, 2.0),
        ]);

        let (mut rx, handle) = engine(&store).spawn_loop_packets(16);
        let mut stamps = Vec::new();
        for _ in 0..4 {
            stamps.push(rx.recv().await.unwrap().date_time);
        }
        assert_eq!(stamps, [100, 101, 102, 103]);

        drop(rx);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_live_cancellation_within_one_backoff() {
        let store = Arc::new(MemoryRowStore::new());
        let (rx, handle) = engine(&store).spawn_loop_packets(4);
        drop(rx);

        let joined = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("live traversal did not stop after receiver drop");
        joined.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_startup_suppresses_already_seen_packets() {
        let store = Arc::new(MemoryRowStore::new());
        for (idx, secs) in (700..=1200).step_by(100).enumerate() {
            store.insert(outdoor(idx as u64 + 1, secs, secs as f64));
        }

        let (mut rx, handle) = engine(&store).spawn_startup_records(Some(1000), 16);
        let mut stamps = Vec::new();
        while let Some(packet) = rx.recv().await {
            stamps.push(packet.date_time);
        }
        handle.await.unwrap().unwrap();
        assert_eq!(stamps, [1100, 1200]);
    }

    #[tokio::test]
    async fn test_startup_with_stale_backlog_emits_nothing() {
        // every stored row predates the catch-up anchor; the traversal must
        // terminate without ever polling below the suppression floor
        let store = Arc::new(MemoryRowStore::new());
        store.insert_all([
            outdoor(1, 100, 1.0),
            outdoor(2, 200, 2.0),
            outdoor(3, 300, 3.0),
        ]);

        let (mut rx, handle) = engine(&store).spawn_startup_records(Some(5000), 16);
        assert!(rx.recv().await.is_none());
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_startup_without_resume_point_replays_everything() {
        let store = Arc::new(MemoryRowStore::new());
        store.insert_all([outdoor(1, 100, 1.0), outdoor(2, 200, 2.0)]);

        let (mut rx, handle) = engine(&store).spawn_startup_records(None, 16);
        let mut stamps = Vec::new();
        while let Some(packet) = rx.recv().await {
            stamps.push(packet.date_time);
        }
        handle.await.unwrap().unwrap();
        assert_eq!(stamps, [100, 200]);
    }

    #[tokio::test]
    async fn test_startup_rebuilds_carry_forward_context() {
        let store = Arc::new(MemoryRowStore::new());
        // temperature set before the resume point, humidity-only row after
        store.insert(outdoor(1, 900, 21.5));
        let mut humid = Reading::new(2, "00001", ts(1100));
        humid.humidity = Some(60.0);
        store.insert(humid);

        let (mut rx, handle) = engine(&store).spawn_startup_records(Some(1000), 16);
        let packet = rx.recv().await.unwrap();
        assert_eq!(packet.date_time, 1100);
        // carried forward from the suppressed context row
        assert_eq!(packet.out_temp, Some(21.5));
        assert_eq!(packet.out_humidity, Some(60.0));
        assert!(rx.recv().await.is_none());
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_archive_single_query_and_termination() {
        let store = Arc::new(MemoryRowStore::new());
        store.insert_all([outdoor(1, 100, 1.0), outdoor(2, 200, 2.0)]);

        let (mut rx, handle) = engine(&store).spawn_archive_records(Some(100), 16);
        let mut stamps = Vec::new();
        while let Some(packet) = rx.recv().await {
            stamps.push(packet.date_time);
        }
        handle.await.unwrap().unwrap();
        assert_eq!(stamps, [200]);
        // exactly one storage query, regardless of rows inserted afterwards
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn test_archive_does_not_move_live_cursor() {
        let store = Arc::new(MemoryRowStore::new());
        store.insert(outdoor(1, 100, 1.0));

        let engine = engine(&store);
        let (tx, mut rx) = mpsc::channel(4);
        engine.run_archive_records(None, &tx).await.unwrap();
        drop(tx);
        assert_eq!(rx.recv().await.unwrap().date_time, 100);
        assert!(engine.cursor().is_none());
    }

    #[tokio::test]
    async fn test_storage_rows_shared_across_traversals() {
        // live and archive hold independent state against one store
        let store = Arc::new(MemoryRowStore::new());
        store.insert_all([outdoor(1, 100, 1.0), outdoor(2, 200, 2.0)]);

        let (mut live_rx, live_handle) = engine(&store).spawn_loop_packets(16);
        let (mut arch_rx, arch_handle) = engine(&store).spawn_archive_records(None, 16);

        assert_eq!(live_rx.recv().await.unwrap().date_time, 100);
        assert_eq!(arch_rx.recv().await.unwrap().date_time, 100);
        assert_eq!(live_rx.recv().await.unwrap().date_time, 200);
        assert_eq!(arch_rx.recv().await.unwrap().date_time, 200);

        assert!(arch_rx.recv().await.is_none());
        arch_handle.await.unwrap().unwrap();
        drop(live_rx);
        live_handle.await.unwrap().unwrap();
    }
}
