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
#![allow(unused)]

use std::{collections::HashMap, sync::{Mutex, atomic::{AtomicUsize, Ordering}}, time::Duration};
use async_trait::async_trait;
use luma_adsb::{
    Aircraft, Altitude,
    errors::{LumaAdsbError, Result},
    feed::{FeedConnector, FeedKind, FeederConfig, FeederStatus, Stage2Stats},
};

/// a scripted connector. Feeders map to their enabled flag and status, a None status makes the status request fail.
/// Each feed can be slowed down, for `FeedKind::FeederHealth` that delays the config request while individual
/// feeder status requests have their own delays
#[derive(Default)]
pub struct MockConnector {
    pub aircraft: Mutex<Vec<Aircraft>>,
    pub delays: Mutex<HashMap<FeedKind,Duration>>,
    pub feeder_delays: Mutex<HashMap<String,Duration>>,
    pub aircraft_calls: AtomicUsize,
    pub feeder_status_calls: AtomicUsize,
    pub stats: Mutex<Option<Stage2Stats>>,
    pub feeders: Mutex<HashMap<String,(bool,Option<FeederStatus>)>>,
    pub update_available: Mutex<bool>,
    pub cpu_temp: Mutex<Option<i32>>,
}

impl MockConnector {
    pub fn new ()->Self { MockConnector::default() }

    pub fn with_aircraft (self, aircraft: Vec<Aircraft>)->Self {
        *self.aircraft.lock().unwrap() = aircraft;
        self
    }

    pub fn with_feeder (self, name: &str, enabled: bool, status: Option<(&str,&str)>)->Self {
        let status = status.map( |(beast,mlat)| FeederStatus{ beast: beast.to_string(), mlat: mlat.to_string() });
        self.feeders.lock().unwrap().insert( name.to_string(), (enabled, status));
        self
    }

    pub fn with_cpu_temp (self, temp: i32)->Self {
        *self.cpu_temp.lock().unwrap() = Some(temp);
        self
    }

    pub fn with_stats (self, stats: Stage2Stats)->Self {
        *self.stats.lock().unwrap() = Some(stats);
        self
    }

    pub fn set_aircraft (&self, aircraft: Vec<Aircraft>) {
        *self.aircraft.lock().unwrap() = aircraft;
    }

    pub fn with_delay (self, kind: FeedKind, delay: Duration)->Self {
        self.set_delay( kind, Some(delay));
        self
    }

    pub fn with_feeder_delay (self, name: &str, delay: Duration)->Self {
        self.feeder_delays.lock().unwrap().insert( name.to_string(), delay);
        self
    }

    pub fn set_delay (&self, kind: FeedKind, delay: Option<Duration>) {
        let mut delays = self.delays.lock().unwrap();
        match delay {
            Some(delay) => { delays.insert( kind, delay); }
            None => { delays.remove( &kind); }
        }
    }

    pub fn set_aircraft_delay (&self, delay: Option<Duration>) {
        self.set_delay( FeedKind::Aircraft, delay);
    }

    async fn delay (&self, kind: FeedKind) {
        let delay = self.delays.lock().unwrap().get( &kind).copied();
        if let Some(delay) = delay {
            tokio::time::sleep( delay).await;
        }
    }
}

#[async_trait]
impl FeedConnector for MockConnector {
    async fn fetch_aircraft (&self, _timeout: Duration)->Result<Vec<Aircraft>> {
        self.aircraft_calls.fetch_add( 1, Ordering::SeqCst);
        self.delay( FeedKind::Aircraft).await;
        Ok( self.aircraft.lock().unwrap().clone())
    }

    async fn fetch_stats (&self, _timeout: Duration)->Result<Stage2Stats> {
        self.delay( FeedKind::Stats).await;
        let stats = *self.stats.lock().unwrap();
        stats.ok_or( LumaAdsbError::NoStatsError)
    }

    async fn fetch_feeder_config (&self, _timeout: Duration)->Result<FeederConfig> {
        self.delay( FeedKind::FeederHealth).await;
        let enabled = self.feeders.lock().unwrap().iter().map( |(k,(en,_))| (k.clone(),*en)).collect();
        Ok( FeederConfig{ enabled })
    }

    async fn fetch_feeder_status (&self, _timeout: Duration, feeder: &str)->Result<FeederStatus> {
        self.feeder_status_calls.fetch_add( 1, Ordering::SeqCst);
        let delay = self.feeder_delays.lock().unwrap().get( feeder).copied();
        if let Some(delay) = delay {
            tokio::time::sleep( delay).await;
        }
        let status = self.feeders.lock().unwrap().get(feeder).and_then( |(_,s)| s.clone());
        status.ok_or( LumaAdsbError::ParseError( format!("no status for {feeder}")))
    }

    async fn fetch_update_available (&self, _timeout: Duration)->Result<bool> {
        self.delay( FeedKind::UpdateAvailable).await;
        Ok( *self.update_available.lock().unwrap())
    }

    async fn fetch_cpu_temp (&self, _timeout: Duration)->Result<i32> {
        self.delay( FeedKind::CpuTemp).await;
        let temp = *self.cpu_temp.lock().unwrap();
        temp.ok_or( LumaAdsbError::ParseError( "no cpu temp".to_string()))
    }
}

pub fn aircraft_at (hex: &str, lat: f64, lon: f64, alt_ft: f64)->Aircraft {
    Aircraft::new( hex, lat, lon, Altitude::from_feet( alt_ft))
}
