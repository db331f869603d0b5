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

use std::{collections::HashMap, time::Duration};
use async_trait::async_trait;
use reqwest::Client;
use tracing::trace;
use luma_common::net::{get_json, http_url};

use crate::{
    Aircraft, AircraftData,
    errors::{LumaAdsbError, Result},
    feed::{CpuTempData, FeedConnector, FeederConfig, FeederStatus, FeederStatusWrapper, Stage2Stats, UpdateInfo}
};

/// the port of the readsb web server that serves `aircraft.json`. The receiver admin UI (stats, settings,
/// feeder status) is served on the default http port
pub const AIRCRAFT_PORT: u16 = 8080;

/// connector for an ultrafeeder style receiver reachable at `host`
#[derive(Debug,Clone)]
pub struct HttpFeedConnector {
    client: Client,
    host: String,
}

impl HttpFeedConnector {
    pub fn new (host: impl ToString)->Self {
        HttpFeedConnector { client: Client::new(), host: host.to_string() }
    }

    pub fn with_client (client: Client, host: impl ToString)->Self {
        HttpFeedConnector { client, host: host.to_string() }
    }

    pub fn host (&self)->&str { &self.host }

    pub fn aircraft_url (&self)->String { http_url( &self.host, Some(AIRCRAFT_PORT), "data/aircraft.json") }
    pub fn stats_url (&self)->String { http_url( &self.host, None, "api/stage2_stats") }
    pub fn settings_url (&self)->String { http_url( &self.host, None, "api/micro_settings") }
    pub fn feeder_status_url (&self, feeder: &str)->String { http_url( &self.host, None, &format!("api/status/{feeder}")) }
    pub fn update_url (&self)->String { http_url( &self.host, None, "api/status/im") }
    pub fn temperature_url (&self)->String { http_url( &self.host, None, "api/get_temperatures.json") }
}

#[async_trait]
impl FeedConnector for HttpFeedConnector {
    async fn fetch_aircraft (&self, timeout: Duration)->Result<Vec<Aircraft>> {
        let url = self.aircraft_url();
        trace!("GET {url}");
        let data: AircraftData = get_json( &self.client, &url, timeout).await?;
        Ok(data.aircraft)
    }

    async fn fetch_stats (&self, timeout: Duration)->Result<Stage2Stats> {
        let url = self.stats_url();
        trace!("GET {url}");
        let stats: Vec<Stage2Stats> = get_json( &self.client, &url, timeout).await?;
        stats.into_iter().next().ok_or( LumaAdsbError::NoStatsError)
    }

    async fn fetch_feeder_config (&self, timeout: Duration)->Result<FeederConfig> {
        let url = self.settings_url();
        trace!("GET {url}");
        let settings: HashMap<String,serde_json::Value> = get_json( &self.client, &url, timeout).await?;
        Ok( FeederConfig::from_settings( &settings))
    }

    async fn fetch_feeder_status (&self, timeout: Duration, feeder: &str)->Result<FeederStatus> {
        let url = self.feeder_status_url( feeder);
        trace!("GET {url}");
        let wrapper: FeederStatusWrapper = get_json( &self.client, &url, timeout).await?;
        Ok(wrapper.status)
    }

    async fn fetch_update_available (&self, timeout: Duration)->Result<bool> {
        let url = self.update_url();
        trace!("GET {url}");
        let info: UpdateInfo = get_json( &self.client, &url, timeout).await?;
        Ok( info.is_update_available())
    }

    async fn fetch_cpu_temp (&self, timeout: Duration)->Result<i32> {
        let url = self.temperature_url();
        trace!("GET {url}");
        let temps: CpuTempData = get_json( &self.client, &url, timeout).await?;
        temps.cpu_celsius()
    }
}
