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

use std::{collections::{BTreeMap, HashMap}, fmt, time::Duration};
use serde::Deserialize;
use async_trait::async_trait;
use futures::future::join_all;
use tokio::time;
use tracing::{debug, warn};
use luma_common::datetime::scale_duration;

use crate::{Aircraft, errors::{LumaAdsbError, Result, parse_error}};

/// the feeders the receiver UI knows about. Their enabled flags show up as `<name>--is_enabled` in the
/// receiver settings and their status is at `/api/status/<name>`
pub const FEEDER_NAMES: [&str; 14] = [
    "adsbfi", "adsbhub", "adsblol", "adsbx", "alive", "avdelphi", "flightaware",
    "flightradar", "opensky", "planefinder", "planespotters", "planewatch", "radarbox", "tat"
];

/// the five independently refreshed feeds we aggregate
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum FeedKind {
    Aircraft,
    Stats,
    FeederHealth,
    UpdateAvailable,
    CpuTemp,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedKind::Aircraft => "aircraft",
            FeedKind::Stats => "stats",
            FeedKind::FeederHealth => "feeder-health",
            FeedKind::UpdateAvailable => "update-check",
            FeedKind::CpuTemp => "cpu-temp",
        };
        write!(f, "{name}")
    }
}

/* #region feed payloads ******************************************************************************************/

/// receiver statistics as reported by `/api/stage2_stats` (first element of the returned list)
#[derive(Debug,Clone,Copy,PartialEq,Default,Deserialize)]
pub struct Stage2Stats {
    #[serde(default)] pub pps: f64,     // packets per second
    #[serde(default)] pub mps: f64,     // messages per second
    #[serde(default)] pub uptime: u64,  // seconds
    #[serde(default)] pub planes: u64,  // currently tracked aircraft
    #[serde(default)] pub tplanes: u64, // cumulative number of tracked aircraft
}

/// `/api/status/<feeder>` returns `{"0": {"beast": "good", "mlat": "disabled"}}`
#[derive(Debug,Clone,PartialEq,Default,Deserialize)]
pub struct FeederStatus {
    #[serde(default)] pub beast: String,
    #[serde(default)] pub mlat: String,
}

#[derive(Debug,Clone,Default,Deserialize)]
pub struct FeederStatusWrapper {
    #[serde(default, rename="0")]
    pub status: FeederStatus,
}

/// `/api/status/im` - we only care about `show_update`
#[derive(Debug,Clone,Default,Deserialize)]
pub struct UpdateInfo {
    #[serde(default)] pub show_update: String,
    #[serde(default)] pub latest_tag: String,
}

impl UpdateInfo {
    pub fn is_update_available (&self)->bool { self.show_update.trim() == "1" }
}

/// `/api/get_temperatures.json` - note the cpu temperature is a string
#[derive(Debug,Clone,Default,Deserialize)]
pub struct CpuTempData {
    #[serde(default)] pub age: i64,
    #[serde(default)] pub cpu: String,
}

impl CpuTempData {
    pub fn cpu_celsius (&self)->Result<i32> {
        let s = self.cpu.trim();
        s.parse::<i32>()
            .or_else( |_| s.parse::<f64>().map( |t| t.round() as i32))
            .map_err( |_| parse_error!("invalid cpu temperature '{}'", self.cpu))
    }
}

/// the enabled flags of all known feeders, extracted from the receiver settings (`/api/micro_settings`)
#[derive(Debug,Clone,PartialEq,Default)]
pub struct FeederConfig {
    pub enabled: BTreeMap<String,bool>,
}

impl FeederConfig {
    pub fn from_settings (settings: &HashMap<String,serde_json::Value>)->Self {
        let enabled = FEEDER_NAMES.iter().map( |name| {
            let key = format!("{name}--is_enabled");
            let is_enabled = settings.get(&key).and_then( |v| v.as_bool()).unwrap_or(false);
            (name.to_string(), is_enabled)
        }).collect();
        FeederConfig{ enabled }
    }

    pub fn enabled_feeders (&self)->impl Iterator<Item=&str> {
        self.enabled.iter().filter( |(_,en)| **en).map( |(name,_)| name.as_str())
    }
}

/* #endregion feed payloads */

/* #region feeder health ******************************************************************************************/

/// status of a single feeder. `uplink` and `mlat` are None if we could not retrieve the status
#[derive(Debug,Clone,PartialEq,Default)]
pub struct FeederInfo {
    pub enabled: bool,
    pub uplink: Option<String>,
    pub mlat: Option<String>,
}

impl FeederInfo {
    pub fn disabled ()->Self { FeederInfo{ enabled: false, uplink: None, mlat: None } }

    pub fn with_status (status: FeederStatus)->Self {
        FeederInfo{ enabled: true, uplink: Some(status.beast), mlat: Some(status.mlat) }
    }
}

#[derive(Debug,Clone,PartialEq,Default)]
pub struct FeederHealth {
    pub feeders: BTreeMap<String,FeederInfo>,
}

impl FeederHealth {
    pub fn new ()->Self { FeederHealth::default() }

    pub fn insert (&mut self, name: impl ToString, info: FeederInfo) {
        self.feeders.insert( name.to_string(), info);
    }

    /// (good,bad) link counts over enabled feeders. Each feeder has an uplink (beast) and a mlat link - a link is
    /// good if it says "good", it is bad if it says anything else than its neutral value ("unknown" for uplinks,
    /// "disabled" for mlat). Feeders without retrieved status do not count
    pub fn counts (&self)->(usize,usize) {
        let mut good = 0;
        let mut bad = 0;

        for info in self.feeders.values().filter( |info| info.enabled) {
            for (status,neutral) in [(&info.uplink,"unknown"), (&info.mlat,"disabled")] {
                if let Some(status) = status {
                    match classify_link( status, neutral) {
                        LinkHealth::Good => good += 1,
                        LinkHealth::Bad => bad += 1,
                        LinkHealth::Neutral => {}
                    }
                }
            }
        }

        (good,bad)
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum LinkHealth { Good, Bad, Neutral }

pub fn classify_link (status: &str, neutral: &str)->LinkHealth {
    let status = status.trim();
    if status.eq_ignore_ascii_case("good") {
        LinkHealth::Good
    } else if status.is_empty() || status.eq_ignore_ascii_case(neutral) {
        LinkHealth::Neutral
    } else {
        LinkHealth::Bad
    }
}

/* #endregion feeder health */

/// the seam to the data sources. Each method has to complete (or fail) within the provided timeout - callers
/// additionally enforce the timeout, so implementations can't stall the scheduler
#[async_trait]
pub trait FeedConnector: Send + Sync + 'static {
    async fn fetch_aircraft (&self, timeout: Duration)->Result<Vec<Aircraft>>;

    /// fails with `NoStatsError` if the source returns an empty list
    async fn fetch_stats (&self, timeout: Duration)->Result<Stage2Stats>;

    async fn fetch_feeder_config (&self, timeout: Duration)->Result<FeederConfig>;

    async fn fetch_feeder_status (&self, timeout: Duration, feeder: &str)->Result<FeederStatus>;

    async fn fetch_update_available (&self, timeout: Duration)->Result<bool>;

    async fn fetch_cpu_temp (&self, timeout: Duration)->Result<i32>;
}

/// get the feeder config and then (concurrently) the status of each enabled feeder. A failed or stalled status request
/// only drops the respective feeder from the health counts, only a failed config request fails the whole feed.
/// Config and status requests each get half of `timeout`, so that the whole feed completes within `timeout`
pub async fn fetch_feeder_health<C> (connector: &C, timeout: Duration)->Result<FeederHealth> where C: FeedConnector + ?Sized {
    let budget = scale_duration( timeout, 0.5);

    let config = bounded( budget, connector.fetch_feeder_config( budget)).await?;

    let enabled: Vec<&str> = config.enabled_feeders().collect();
    let results = join_all( enabled.iter().map( |name| bounded( budget, connector.fetch_feeder_status( budget, name)))).await;

    let mut health = FeederHealth::new();
    for (name,is_enabled) in &config.enabled {
        if !is_enabled {
            health.insert( name, FeederInfo::disabled());
        }
    }

    for (name,res) in enabled.iter().zip( results.into_iter()) {
        match res {
            Ok(status) => {
                debug!("feeder {name}: beast={}, mlat={}", status.beast, status.mlat);
                health.insert( name, FeederInfo::with_status( status));
            }
            Err(e) => {
                warn!("failed to get status of feeder {name}: {e}");
                health.insert( name, FeederInfo{ enabled: true, uplink: None, mlat: None });
            }
        }
    }

    Ok(health)
}

async fn bounded<T,F> (timeout: Duration, fut: F)->Result<T> where F: Future<Output=Result<T>> {
    match time::timeout( timeout, fut).await {
        Ok(res) => res,
        Err(_) => Err( LumaAdsbError::TimeoutError(timeout))
    }
}
