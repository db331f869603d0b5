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

//! configuration comes from two places: the observer position and alert thresholds are set through
//! `ADSBFEED_..` environment variables (as they are for the receiver containers), the task schedule and
//! display geometry through an optional RON file.
//!
//! Environment variables are passed in as an iterator so that we can test without touching the process env.

use std::{collections::HashMap, fs, path::Path, str::FromStr};
use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};
use uom::si::f64::Length;
use luma_common::{geo::{DistanceMethod, GeoPoint3}, uom::{LengthUnit, feet}};

use crate::{
    errors::{LumaAdsbError, Result, config_error},
    proximity::{AlertConfig, AlertThresholds, ThresholdOverride},
    render::{DisplayGeometry, Renderer},
    scheduler::Schedule,
};

pub const ENV_PREFIX: &str = "ADSBFEED_";

pub const HOST: &str = "ADSBFEED_HOST";
pub const LAT: &str = "ADSBFEED_LAT";
pub const LON: &str = "ADSBFEED_LON";
pub const ALT: &str = "ADSBFEED_ALT";
pub const MIN_ALT: &str = "ADSBFEED_MIN_ALT";
pub const MAX_ALT: &str = "ADSBFEED_MAX_ALT";
pub const MAX_DIST: &str = "ADSBFEED_MAX_DIST";
pub const DIST_UNIT: &str = "ADSBFEED_DIST_UNIT";
pub const DIST_METHOD: &str = "ADSBFEED_DIST_METHOD";

const CAT_PREFIX: &str = "ADSBFEED_CAT_";

/// the part of the config that lives in the (optional) RON file
#[derive(Debug,Clone,PartialEq,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub schedule: Schedule,
    pub display: DisplayGeometry,
}

impl FileConfig {
    /// a missing file is not an error, it just means defaults
    pub fn load<P: AsRef<Path>> (path: P)->Result<FileConfig> {
        let path = path.as_ref();
        if !path.is_file() {
            info!("no config file {:?}, using defaults", path);
            return Ok( FileConfig::default())
        }

        let s = fs::read_to_string( path)?;
        Self::from_ron( &s)
    }

    pub fn from_ron (s: &str)->Result<FileConfig> {
        Ok( ron::from_str( s)?)
    }
}

#[derive(Debug,Clone,PartialEq)]
pub struct LumaConfig {
    pub host: String,
    pub observer: GeoPoint3,
    pub alert: AlertConfig,
    pub distance_unit: LengthUnit,
    pub distance_method: DistanceMethod,
    pub schedule: Schedule,
    pub display: DisplayGeometry,
}

impl LumaConfig {
    pub fn from_env (file_config: FileConfig)->Result<LumaConfig> {
        Self::from_vars( std::env::vars(), file_config)
    }

    /// build the config from `ADSBFEED_..` variables. All problems are collected so that users
    /// see every missing or malformed variable at once
    pub fn from_vars<I,K,V> (vars: I, file_config: FileConfig)->Result<LumaConfig>
        where I: IntoIterator<Item=(K,V)>, K: AsRef<str>, V: AsRef<str>
    {
        let vars: HashMap<String,String> = vars.into_iter()
            .filter( |(k,_)| k.as_ref().starts_with( ENV_PREFIX))
            .map( |(k,v)| (k.as_ref().to_string(), v.as_ref().trim().to_string()))
            .collect();

        let mut errors: Vec<String> = Vec::new();

        let host = required( &vars, HOST, &mut errors, |s| Ok(s.to_string()));
        let lat = required( &vars, LAT, &mut errors, parse_f64);
        let lon = required( &vars, LON, &mut errors, parse_f64);
        let alt = optional( &vars, ALT, &mut errors, parse_f64).unwrap_or(0.0);

        let distance_unit = optional( &vars, DIST_UNIT, &mut errors, LengthUnit::from_str).unwrap_or_default();
        let distance_method = optional( &vars, DIST_METHOD, &mut errors, DistanceMethod::from_str).unwrap_or_default();

        let defaults = AlertThresholds::default();
        let default = AlertThresholds {
            min_altitude: optional( &vars, MIN_ALT, &mut errors, parse_f64).map(feet).unwrap_or( defaults.min_altitude),
            max_altitude: optional( &vars, MAX_ALT, &mut errors, parse_f64).map(feet).unwrap_or( defaults.max_altitude),
            max_distance: optional( &vars, MAX_DIST, &mut errors, parse_f64).map( |d| distance_unit.length(d)).unwrap_or( defaults.max_distance),
        };
        if default.min_altitude > default.max_altitude {
            errors.push( format!("{MIN_ALT} above {MAX_ALT}"));
        }

        let mut alert = AlertConfig::new( default);
        for (cat,ovr) in category_overrides( &vars, distance_unit, &mut errors) {
            debug!("alert override for category {cat}: {ovr:?}");
            alert = alert.with_override( &cat, ovr);
        }

        if let Err(e) = file_config.schedule.validate() {
            errors.push( e.to_string());
        }
        let display = file_config.display;
        if display.columns() == 0 || display.rows() == 0 {
            errors.push( format!("display geometry {display:?} has no text grid"));
        }

        if !errors.is_empty() {
            return Err( LumaAdsbError::ConfigError( errors.join("; ")))
        }

        // all required values are set if we don't have errors
        match (host, lat, lon) {
            (Some(host), Some(lat), Some(lon)) => {
                Ok( LumaConfig {
                    host,
                    observer: GeoPoint3::from_lat_lon_degrees_alt( lat, lon, feet(alt)),
                    alert,
                    distance_unit,
                    distance_method,
                    schedule: file_config.schedule,
                    display,
                })
            }
            _ => Err( config_error!("incomplete config"))
        }
    }

    pub fn renderer (&self)->Renderer {
        Renderer::new( self.observer, self.alert.clone(), self.distance_method, self.display, self.distance_unit)
    }
}

/// `ADSBFEED_CAT_<CODE>_{MIN_ALT,MAX_ALT,MAX_DIST}`. Other `ADSBFEED_CAT_` variables are ignored (with a warning),
/// malformed values of the known ones are errors
fn category_overrides (vars: &HashMap<String,String>, unit: LengthUnit, errors: &mut Vec<String>)->HashMap<String,ThresholdOverride> {
    let mut overrides: HashMap<String,ThresholdOverride> = HashMap::new();

    for (key,value) in vars {
        let Some(rest) = key.strip_prefix( CAT_PREFIX) else { continue };

        let (cat, field) = if let Some(cat) = rest.strip_suffix("_MIN_ALT") {
            (cat, OverrideField::MinAlt)
        } else if let Some(cat) = rest.strip_suffix("_MAX_ALT") {
            (cat, OverrideField::MaxAlt)
        } else if let Some(cat) = rest.strip_suffix("_MAX_DIST") {
            (cat, OverrideField::MaxDist)
        } else {
            warn!("ignoring unknown category variable {key}");
            continue
        };

        if cat.is_empty() {
            warn!("ignoring {key} without category code");
            continue
        }

        let v = match parse_f64( value) {
            Ok(v) => v,
            Err(e) => { errors.push( format!("{key}: {e}")); continue }
        };

        let ovr = overrides.entry( cat.to_uppercase()).or_default();
        let len: Length = match field {
            OverrideField::MaxDist => unit.length(v),
            _ => feet(v)
        };
        match field {
            OverrideField::MinAlt => ovr.min_altitude = Some(len),
            OverrideField::MaxAlt => ovr.max_altitude = Some(len),
            OverrideField::MaxDist => ovr.max_distance = Some(len),
        }
    }

    overrides.retain( |_,ovr| !ovr.is_empty());
    overrides
}

#[derive(Debug,Clone,Copy)]
enum OverrideField { MinAlt, MaxAlt, MaxDist }

fn required<T,F> (vars: &HashMap<String,String>, key: &str, errors: &mut Vec<String>, parse: F)->Option<T>
    where F: Fn(&str)->std::result::Result<T,String>
{
    match vars.get(key).filter( |v| !v.is_empty()) {
        Some(v) => parse_var( key, v, errors, parse),
        None => {
            errors.push( format!("{key} not set"));
            None
        }
    }
}

fn optional<T,F> (vars: &HashMap<String,String>, key: &str, errors: &mut Vec<String>, parse: F)->Option<T>
    where F: Fn(&str)->std::result::Result<T,String>
{
    vars.get(key)
        .filter( |v| !v.is_empty())
        .and_then( |v| parse_var( key, v, errors, parse))
}

fn parse_var<T,F> (key: &str, value: &str, errors: &mut Vec<String>, parse: F)->Option<T>
    where F: Fn(&str)->std::result::Result<T,String>
{
    match parse(value) {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push( format!("{key}: {e}"));
            None
        }
    }
}

fn parse_f64 (s: &str)->std::result::Result<f64,String> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err( format!("not a number '{s}'"))
    }
}
