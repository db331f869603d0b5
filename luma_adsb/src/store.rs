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

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use chrono::{DateTime, Utc};
use tracing::debug;
use luma_common::datetime::utc_now;

use crate::{Aircraft, feed::{FeedKind, FeederHealth, Stage2Stats}};

/// the latest successfully fetched value of each feed. Fields are independently stale, a failed fetch
/// never touches its field. Aircraft lists and feeder health are Arc-shared so that snapshots are cheap to clone
#[derive(Debug,Clone,Default)]
pub struct FeedSnapshot {
    pub aircraft: Arc<Vec<Aircraft>>,
    pub stats: Option<Stage2Stats>,
    pub feeder_health: Arc<FeederHealth>,
    pub update_available: bool,
    pub cpu_temp: Option<i32>,

    pub last_update: LastUpdate,
}

impl FeedSnapshot {
    /// number of tracked aircraft. If we don't have an aircraft list yet we fall back to the receiver stats
    pub fn total_aircraft (&self)->usize {
        if self.aircraft.is_empty() {
            self.stats.map( |s| s.planes as usize).unwrap_or(0)
        } else {
            self.aircraft.len()
        }
    }
}

/// diagnostic timestamps, not shown on the display
#[derive(Debug,Clone,Copy,PartialEq,Default)]
pub struct LastUpdate {
    pub aircraft: Option<DateTime<Utc>>,
    pub stats: Option<DateTime<Utc>>,
    pub feeder_health: Option<DateTime<Utc>>,
    pub update_available: Option<DateTime<Utc>>,
    pub cpu_temp: Option<DateTime<Utc>>,
}

impl LastUpdate {
    pub fn get (&self, kind: FeedKind)->Option<DateTime<Utc>> {
        match kind {
            FeedKind::Aircraft => self.aircraft,
            FeedKind::Stats => self.stats,
            FeedKind::FeederHealth => self.feeder_health,
            FeedKind::UpdateAvailable => self.update_available,
            FeedKind::CpuTemp => self.cpu_temp,
        }
    }

    fn set (&mut self, kind: FeedKind, date: DateTime<Utc>) {
        let field = match kind {
            FeedKind::Aircraft => &mut self.aircraft,
            FeedKind::Stats => &mut self.stats,
            FeedKind::FeederHealth => &mut self.feeder_health,
            FeedKind::UpdateAvailable => &mut self.update_available,
            FeedKind::CpuTemp => &mut self.cpu_temp,
        };
        *field = Some(date);
    }
}

/// a whole-field replacement as produced by one successful fetch
#[derive(Debug,Clone)]
pub enum FeedUpdate {
    Aircraft(Vec<Aircraft>),
    Stats(Stage2Stats),
    FeederHealth(FeederHealth),
    UpdateAvailable(bool),
    CpuTemp(i32),
}

impl FeedUpdate {
    pub fn kind (&self)->FeedKind {
        match self {
            FeedUpdate::Aircraft(_) => FeedKind::Aircraft,
            FeedUpdate::Stats(_) => FeedKind::Stats,
            FeedUpdate::FeederHealth(_) => FeedKind::FeederHealth,
            FeedUpdate::UpdateAvailable(_) => FeedKind::UpdateAvailable,
            FeedUpdate::CpuTemp(_) => FeedKind::CpuTemp,
        }
    }
}

/// cloneable handle for the single snapshot of the process. Writers replace one field under the write lock,
/// readers get a consistent clone
#[derive(Debug,Clone,Default)]
pub struct FeedStore {
    snapshot: Arc<RwLock<FeedSnapshot>>,
}

impl FeedStore {
    pub fn new ()->Self { FeedStore::default() }

    pub fn set (&self, update: FeedUpdate) {
        self.set_at( update, utc_now())
    }

    pub fn set_at (&self, update: FeedUpdate, date: DateTime<Utc>) {
        let kind = update.kind();
        let msg = match &update {
            FeedUpdate::Aircraft(list) => format!("{} aircraft", list.len()),
            FeedUpdate::Stats(stats) => format!("{stats:?}"),
            FeedUpdate::FeederHealth(health) => format!("{} feeders", health.feeders.len()),
            FeedUpdate::UpdateAvailable(is_available) => is_available.to_string(),
            FeedUpdate::CpuTemp(temp) => format!("{temp}C"),
        };

        { // keep the write lock as short as possible
            let mut snap = self.write();
            match update {
                FeedUpdate::Aircraft(list) => snap.aircraft = Arc::new(list),
                FeedUpdate::Stats(stats) => snap.stats = Some(stats),
                FeedUpdate::FeederHealth(health) => snap.feeder_health = Arc::new(health),
                FeedUpdate::UpdateAvailable(is_available) => snap.update_available = is_available,
                FeedUpdate::CpuTemp(temp) => snap.cpu_temp = Some(temp),
            }
            snap.last_update.set( kind, date);
        }

        debug!("stored {kind}: {msg}");
    }

    pub fn read (&self)->FeedSnapshot {
        self.read_lock().clone()
    }

    pub fn last_update (&self, kind: FeedKind)->Option<DateTime<Utc>> {
        self.read_lock().last_update.get(kind)
    }

    // we only ever assign complete values while holding the lock, hence a poisoned lock still holds a consistent snapshot

    fn read_lock (&self)->RwLockReadGuard<'_,FeedSnapshot> {
        self.snapshot.read().unwrap_or_else( |poisoned| poisoned.into_inner())
    }

    fn write (&self)->RwLockWriteGuard<'_,FeedSnapshot> {
        self.snapshot.write().unwrap_or_else( |poisoned| poisoned.into_inner())
    }
}
