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

use std::time::Duration;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serializer, Deserializer};
use parse_duration::parse;

// simple Duration ctors so that we don't need the experimental minute/hour ctors
#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }
#[inline] pub fn hours (n: u64)->Duration { Duration::from_secs(n * 3600) }

/// this should be used wherever we might have to use sim clock instead of wall clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

#[inline]
pub fn local_now()->DateTime<Local> {
    Local::now()
}

/// wall clock time of day as shown on small displays ("15:04:05")
pub fn format_clock<Tz> (dt: &DateTime<Tz>)->String where Tz: TimeZone, Tz::Offset: std::fmt::Display {
    dt.format("%H:%M:%S").to_string()
}

/// scale a duration by a factor in (0,1], rounding down to full milliseconds
pub fn scale_duration (d: Duration, factor: f64)->Duration {
    let ms = (d.as_millis() as f64 * factor).floor();
    if ms <= 0.0 { Duration::ZERO } else { Duration::from_millis(ms as u64) }
}

//--- support for serde

/// parse human readable durations such as "500ms", "30s" or "1h"
pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    let dfm = format!("{:?}", dur);
    s.serialize_str(&dfm)
}
