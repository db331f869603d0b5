/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! the periodic tasks of the application. Each feed gets its own tokio task and interval, the render task
//! runs at a faster cadence and only reads the [`FeedStore`]. Fetch tasks never wait for each other, and
//! the render task never waits for I/O.
//!
//! All tasks observe the same [`CancellationToken`]. Shutdown cancels it, gives the tasks a bounded time
//! to end and then blanks the display. The display sits behind an async mutex that the render task holds
//! while it submits a frame, which guarantees we never blank in the middle of a frame

use std::{sync::Arc, time::Duration};
use serde::{Serialize, Deserialize};
use tokio::{sync::Mutex, task::JoinSet, time::{self, MissedTickBehavior}};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use luma_common::datetime::{deserialize_duration, hours, local_now, millis, scale_duration, secs, serialize_duration};

use crate::{
    display::{TextDisplay, blank, submit},
    errors::{LumaAdsbError, Result, config_error},
    feed::{FeedConnector, FeedKind, fetch_feeder_health},
    render::{DisplayLines, RenderInput, Renderer},
    store::{FeedStore, FeedUpdate},
};

/// the display collaborator shared between render task and shutdown
pub type SharedDisplay = Arc<Mutex<Box<dyn TextDisplay>>>;

pub fn shared_display<D> (display: D)->SharedDisplay where D: TextDisplay + 'static {
    Arc::new( Mutex::new( Box::new(display)))
}

/// faster display updates than this have been observed to corrupt the panel
pub const MIN_RENDER_INTERVAL: Duration = Duration::from_millis(100);

pub const FEED_KINDS: [FeedKind; 5] = [
    FeedKind::Aircraft, FeedKind::Stats, FeedKind::FeederHealth, FeedKind::UpdateAvailable, FeedKind::CpuTemp
];

/* #region Schedule ***********************************************************************************************/

/// task intervals. Fetch timeouts are derived as `timeout_ratio * interval` so that a slow source can never
/// overlap with its own next attempt
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct Schedule {
    #[serde(serialize_with="serialize_duration",deserialize_with="deserialize_duration")]
    pub aircraft_interval: Duration,

    #[serde(serialize_with="serialize_duration",deserialize_with="deserialize_duration")]
    pub stats_interval: Duration,

    #[serde(serialize_with="serialize_duration",deserialize_with="deserialize_duration")]
    pub feeder_interval: Duration,

    #[serde(serialize_with="serialize_duration",deserialize_with="deserialize_duration")]
    pub update_interval: Duration,

    #[serde(serialize_with="serialize_duration",deserialize_with="deserialize_duration")]
    pub cpu_temp_interval: Duration,

    #[serde(serialize_with="serialize_duration",deserialize_with="deserialize_duration")]
    pub render_interval: Duration,

    pub timeout_ratio: f64,

    #[serde(serialize_with="serialize_duration",deserialize_with="deserialize_duration")]
    pub shutdown_grace: Duration,
}

impl Default for Schedule {
    fn default()->Self {
        Schedule {
            aircraft_interval: secs(1),
            stats_interval: secs(1),
            feeder_interval: secs(30),
            update_interval: hours(1),
            cpu_temp_interval: secs(10),
            render_interval: millis(500),
            timeout_ratio: 0.5,
            shutdown_grace: secs(2),
        }
    }
}

impl Schedule {
    pub fn interval (&self, kind: FeedKind)->Duration {
        match kind {
            FeedKind::Aircraft => self.aircraft_interval,
            FeedKind::Stats => self.stats_interval,
            FeedKind::FeederHealth => self.feeder_interval,
            FeedKind::UpdateAvailable => self.update_interval,
            FeedKind::CpuTemp => self.cpu_temp_interval,
        }
    }

    pub fn timeout (&self, kind: FeedKind)->Duration {
        scale_duration( self.interval(kind), self.timeout_ratio)
    }

    pub fn validate (&self)->Result<()> {
        if !(self.timeout_ratio > 0.0 && self.timeout_ratio < 1.0) {
            return Err( config_error!("timeout_ratio has to be in (0,1), got {}", self.timeout_ratio))
        }

        if self.render_interval < MIN_RENDER_INTERVAL {
            return Err( config_error!("render interval {:?} below minimum of {:?}", self.render_interval, MIN_RENDER_INTERVAL))
        }

        for kind in FEED_KINDS {
            let interval = self.interval(kind);
            let timeout = self.timeout(kind);
            if timeout.is_zero() || timeout >= interval {
                return Err( config_error!("invalid {kind} timeout {:?} for interval {:?}", timeout, interval))
            }
        }

        // the displayed high frequency feeds have to be slower than the render cycle
        for kind in [FeedKind::Aircraft, FeedKind::Stats] {
            let interval = self.interval(kind);
            if self.render_interval >= interval {
                return Err( config_error!("render interval {:?} not faster than {kind} interval {:?}", self.render_interval, interval))
            }
        }

        Ok(())
    }
}

/* #endregion Schedule */

/// one fetch of the given feed, bounded by `timeout` regardless of what the connector does
pub async fn fetch_feed (connector: &dyn FeedConnector, kind: FeedKind, timeout: Duration)->Result<FeedUpdate> {
    let fetch = async {
        let update = match kind {
            FeedKind::Aircraft => FeedUpdate::Aircraft( connector.fetch_aircraft( timeout).await?),
            FeedKind::Stats => FeedUpdate::Stats( connector.fetch_stats( timeout).await?),
            FeedKind::FeederHealth => FeedUpdate::FeederHealth( fetch_feeder_health( connector, timeout).await?),
            FeedKind::UpdateAvailable => FeedUpdate::UpdateAvailable( connector.fetch_update_available( timeout).await?),
            FeedKind::CpuTemp => FeedUpdate::CpuTemp( connector.fetch_cpu_temp( timeout).await?),
        };
        Ok::<FeedUpdate,LumaAdsbError>(update)
    };

    match time::timeout( timeout, fetch).await {
        Ok(res) => res,
        Err(_) => Err( LumaAdsbError::TimeoutError(timeout))
    }
}

/// fetch and store. Failures are logged and leave the stored value alone
pub async fn update_feed (connector: &dyn FeedConnector, store: &FeedStore, kind: FeedKind, timeout: Duration)->bool {
    match fetch_feed( connector, kind, timeout).await {
        Ok(update) => {
            store.set( update);
            true
        }
        Err(e) => {
            warn!("{kind} fetch failed: {e}");
            false
        }
    }
}

/// compute and show one frame. Returns what the frame was computed from and its lines
pub async fn render_frame (renderer: &Renderer, store: &FeedStore, display: &SharedDisplay)->(RenderInput,DisplayLines) {
    let (input,lines) = renderer.render( &store.read(), local_now());

    let mut display = display.lock().await;
    if let Err(e) = submit( &mut **display, &lines, &renderer.geometry) {
        warn!("display update failed: {e}");
    }

    (input,lines)
}

/// single fetch of all feeds followed by one frame
pub async fn run_once (connector: Arc<dyn FeedConnector>, store: &FeedStore, schedule: &Schedule, renderer: &Renderer, display: &SharedDisplay)->DisplayLines {
    let updates = FEED_KINDS.map( |kind| update_feed( connector.as_ref(), store, kind, schedule.timeout(kind)));
    futures::future::join_all( updates).await;

    render_frame( renderer, store, display).await.1
}

pub struct Scheduler {
    tasks: JoinSet<()>,
    cancel: CancellationToken,
    display: SharedDisplay,
}

impl Scheduler {
    /// start all feed tasks and the render task. The schedule has to be valid
    pub fn spawn (connector: Arc<dyn FeedConnector>, store: FeedStore, schedule: &Schedule, renderer: Renderer, display: SharedDisplay)->Result<Scheduler> {
        schedule.validate()?;

        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();

        for kind in FEED_KINDS {
            let interval = schedule.interval(kind);
            let timeout = schedule.timeout(kind);
            debug!("spawning {kind} task with interval {interval:?} and timeout {timeout:?}");
            tasks.spawn( run_feed( connector.clone(), store.clone(), kind, interval, timeout, cancel.clone()));
        }

        debug!("spawning render task with interval {:?}", schedule.render_interval);
        tasks.spawn( run_render( renderer, store, display.clone(), schedule.render_interval, cancel.clone()));

        Ok( Scheduler { tasks, cancel, display } )
    }

    pub fn cancel_token (&self)->CancellationToken { self.cancel.clone() }

    pub fn is_cancelled (&self)->bool { self.cancel.is_cancelled() }

    /// stop all tasks (waiting at most `grace` for them), then clear and power off the display. Best effort,
    /// errors are only logged
    pub async fn shutdown (mut self, grace: Duration) {
        info!("shutting down");
        self.cancel.cancel();

        let tasks = &mut self.tasks;
        let join = async move {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    warn!("task terminated abnormally: {e}");
                }
            }
        };
        if time::timeout( grace, join).await.is_err() {
            warn!("tasks did not terminate within {grace:?}, aborting");
            self.tasks.abort_all();
        }

        match time::timeout( grace, self.display.lock()).await {
            Ok(mut display) => {
                if let Err(e) = blank( &mut **display) {
                    warn!("failed to blank display: {e}");
                }
            }
            Err(_) => warn!("display still busy after {grace:?}, not blanked")
        }
    }
}

async fn run_feed (connector: Arc<dyn FeedConnector>, store: FeedStore, kind: FeedKind, interval: Duration, timeout: Duration, cancel: CancellationToken) {
    let mut ticker = time::interval( interval);
    ticker.set_missed_tick_behavior( MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // we don't wait for a fetch that is still in flight when we get cancelled, there is nothing to store anymore
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = update_feed( connector.as_ref(), &store, kind, timeout) => {}
        }
    }

    debug!("{kind} task terminated");
}

async fn run_render (renderer: Renderer, store: FeedStore, display: SharedDisplay, interval: Duration, cancel: CancellationToken) {
    let mut ticker = time::interval( interval);
    ticker.set_missed_tick_behavior( MissedTickBehavior::Skip);
    let mut was_close = false;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let (input,_) = render_frame( &renderer, &store, &display).await;
        let is_close = input.report.close;
        if is_close != was_close {
            match &input.report.closest {
                Some(prox) if is_close => {
                    let ac = &prox.aircraft;
                    info!("proximity alert: {prox}, hex {}, alt {}, source {}", ac.hex, ac.altitude, ac.source().unwrap_or("unknown"));
                }
                _ => info!("proximity alert cleared")
            }
            was_close = is_close;
        }
    }

    debug!("render task terminated");
}
