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

//! luma_adsb polls a local ADS-B receiver (readsb/ultrafeeder style HTTP API) and shows the closest aircraft,
//! proximity alert and feeder/system health on a small text display

use std::fmt;
use serde::{Deserialize, Deserializer, de::IgnoredAny};
use uom::si::{f64::Length, length::foot};
use luma_common::{geo::GeoPoint, uom::feet};

pub mod errors;
pub mod config;
pub mod feed;
pub mod http_feed;
pub mod store;
pub mod proximity;
pub mod render;
pub mod display;
pub mod scheduler;

/// placeholder label for aircraft without (or with blank) call sign
pub const NO_CALLSIGN: &str = "none";

/* #region Altitude ***********************************************************************************************/

/// barometric altitude as reported by the receiver. The source either sends a number (feet), the string
/// "ground" or nothing at all, hence we need a variant instead of a plain number
#[derive(Debug,Clone,Copy,PartialEq,Default)]
pub enum Altitude {
    Numeric(Length),
    Ground,
    #[default]
    Unknown,
}

impl Altitude {
    pub fn from_feet (ft: f64)->Self { Altitude::Numeric( feet(ft)) }

    /// the altitude we use for geometry - ground is 0, unknown has none
    pub fn effective (&self)->Option<Length> {
        match self {
            Altitude::Numeric(alt) => Some(*alt),
            Altitude::Ground => Some(feet(0.0)),
            Altitude::Unknown => None
        }
    }

    pub fn feet (&self)->Option<f64> { self.effective().map(|alt| alt.get::<foot>()) }

    pub fn is_numeric (&self)->bool { matches!( self, Altitude::Numeric(_)) }
}

impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Altitude::Numeric(alt) => write!( f, "{:.0}ft", alt.get::<foot>()),
            Altitude::Ground => write!( f, "ground"),
            Altitude::Unknown => write!( f, "unknown")
        }
    }
}

impl<'de> Deserialize<'de> for Altitude {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: Deserializer<'de> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAltitude {
            Number(f64),
            Text(String),
            Other(IgnoredAny)
        }

        let alt = match Option::<RawAltitude>::deserialize( deserializer)? {
            Some(RawAltitude::Number(ft)) => Altitude::from_feet(ft),
            Some(RawAltitude::Text(s)) if s.trim().eq_ignore_ascii_case("ground") => Altitude::Ground,
            _ => Altitude::Unknown
        };
        Ok(alt)
    }
}

/* #endregion Altitude */

/* #region Aircraft ***********************************************************************************************/

/// the `lastPosition` object readsb reports once live positions time out
#[derive(Debug,Clone,Copy,PartialEq,Default,Deserialize)]
pub struct LastPosition {
    #[serde(default, deserialize_with="de_f64_or_zero")]
    pub lat: f64,
    #[serde(default, deserialize_with="de_f64_or_zero")]
    pub lon: f64,
}

/// the data model for a tracked aircraft, as reported in `aircraft.json`. Lists of these are replaced
/// wholesale on each fetch, we never update individual aircraft
#[derive(Debug,Clone,PartialEq,Deserialize)]
pub struct Aircraft {
    pub hex: String,

    #[serde(default, rename="flight")]
    pub callsign: Option<String>,

    #[serde(default, rename="type")]
    pub kind: Option<String>, // the message source type (adsb_icao, mlat, tisb_..)

    #[serde(default, deserialize_with="de_f64_or_zero")]
    pub lat: f64,

    #[serde(default, deserialize_with="de_f64_or_zero")]
    pub lon: f64,

    #[serde(default, rename="alt_baro")]
    pub altitude: Altitude,

    #[serde(default, rename="lastPosition")]
    pub last_position: Option<LastPosition>,

    #[serde(default)]
    pub category: Option<String>,
}

impl Aircraft {
    pub fn new (hex: impl ToString, lat: f64, lon: f64, altitude: Altitude)->Self {
        Aircraft {
            hex: hex.to_string(),
            callsign: None,
            kind: None,
            lat,
            lon,
            altitude,
            last_position: None,
            category: None,
        }
    }

    pub fn with_callsign (mut self, callsign: impl ToString)->Self { self.callsign = Some(callsign.to_string()); self }
    pub fn with_category (mut self, category: impl ToString)->Self { self.category = Some(category.to_string()); self }
    pub fn with_last_position (mut self, lat: f64, lon: f64)->Self { self.last_position = Some( LastPosition{lat,lon}); self }

    /// the live position if it is set, otherwise the last known position (if that is set)
    pub fn position (&self)->Option<GeoPoint> {
        let live = GeoPoint::from_lat_lon_degrees( self.lat, self.lon);
        if live.is_set() {
            return Some(live)
        }

        self.last_position
            .map( |lp| GeoPoint::from_lat_lon_degrees( lp.lat, lp.lon))
            .filter( |p| p.is_set())
    }

    pub fn has_position (&self)->bool { self.position().is_some() }

    /// trimmed call sign, or [`NO_CALLSIGN`] if there is none
    pub fn label (&self)->&str {
        match self.callsign.as_deref().map(str::trim) {
            Some(cs) if !cs.is_empty() => cs,
            _ => NO_CALLSIGN
        }
    }

    /// how the receiver got the position (adsb_icao, mlat, tisb_icao..), if it tells us
    pub fn source (&self)->Option<&str> {
        self.kind.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// the emitter category code (e.g. "A3"), if the receiver knows it
    pub fn category_code (&self)->Option<&str> {
        self.category.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Aircraft( hex: {}, cs: \"{}\"", self.hex, self.label())?;
        if let Some(p) = self.position() { write!( f, ", pos: {}", p)?; }
        write!( f, ", alt: {}", self.altitude)?;
        if let Some(cat) = self.category_code() { write!( f, ", cat: {}", cat)?; }
        if let Some(src) = self.source() { write!( f, ", src: {}", src)?; }
        write!( f, ")")
    }
}

/// the top level object of `aircraft.json`
#[derive(Debug,Clone,Default,Deserialize)]
pub struct AircraftData {
    #[serde(default)]
    pub aircraft: Vec<Aircraft>,
}

/* #endregion Aircraft */


/// tolerate explicit `null` values for numeric fields that use zero as "not set"
pub fn de_f64_or_zero <'a,D>(deserializer: D) -> Result<f64,D::Error> where D: Deserializer<'a> {
    Ok( Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0) )
}
