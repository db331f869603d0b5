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

//! the proximity and alert engine: which aircraft is closest to the observer, and is it close enough
//! (within the category dependent altitude band and distance) to raise the alert marker

use std::{collections::HashMap, fmt};
use uom::si::{f64::Length, length::meter};
use luma_common::{abs, geo::{DistanceMethod, GeoPoint3, slant_range}, uom::{feet, meters, miles}};

use crate::{Aircraft, Altitude};

/* #region thresholds *********************************************************************************************/

/// the altitude band (inclusive) and distance (exclusive) within which the closest aircraft is flagged
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct AlertThresholds {
    pub min_altitude: Length,
    pub max_altitude: Length,
    pub max_distance: Length,
}

impl Default for AlertThresholds {
    fn default()->Self {
        AlertThresholds {
            min_altitude: feet(0.0),
            max_altitude: feet(10000.0),
            max_distance: miles(3.0),
        }
    }
}

impl AlertThresholds {
    pub fn new (min_altitude: Length, max_altitude: Length, max_distance: Length)->Self {
        AlertThresholds { min_altitude, max_altitude, max_distance }
    }

    pub fn includes_altitude (&self, alt: Length)->bool {
        alt >= self.min_altitude && alt <= self.max_altitude
    }

    pub fn includes_distance (&self, dist: Length)->bool {
        dist < self.max_distance
    }
}

/// per category replacement values. A value of None or zero means "not configured", i.e. keep the default
#[derive(Debug,Clone,Copy,PartialEq,Default)]
pub struct ThresholdOverride {
    pub min_altitude: Option<Length>,
    pub max_altitude: Option<Length>,
    pub max_distance: Option<Length>,
}

impl ThresholdOverride {
    pub fn is_empty (&self)->bool {
        set_value(self.min_altitude).is_none() && set_value(self.max_altitude).is_none() && set_value(self.max_distance).is_none()
    }

    pub fn apply (&self, base: &AlertThresholds)->AlertThresholds {
        AlertThresholds {
            min_altitude: set_value(self.min_altitude).unwrap_or(base.min_altitude),
            max_altitude: set_value(self.max_altitude).unwrap_or(base.max_altitude),
            max_distance: set_value(self.max_distance).unwrap_or(base.max_distance),
        }
    }
}

fn set_value (v: Option<Length>)->Option<Length> {
    v.filter( |len| len.get::<meter>() != 0.0)
}

/// default thresholds plus overrides keyed by (upper case) emitter category code
#[derive(Debug,Clone,PartialEq,Default)]
pub struct AlertConfig {
    pub default: AlertThresholds,
    pub categories: HashMap<String,ThresholdOverride>,
}

impl AlertConfig {
    pub fn new (default: AlertThresholds)->Self {
        AlertConfig { default, categories: HashMap::new() }
    }

    pub fn with_override (mut self, category: &str, ovr: ThresholdOverride)->Self {
        self.categories.insert( category.trim().to_uppercase(), ovr);
        self
    }

    /// category override -> default
    pub fn resolve (&self, category: Option<&str>)->AlertThresholds {
        category
            .map( |cat| cat.trim().to_uppercase())
            .and_then( |cat| self.categories.get(&cat))
            .map( |ovr| ovr.apply( &self.default))
            .unwrap_or( self.default)
    }
}

/* #endregion thresholds */

/* #region closest aircraft ***************************************************************************************/

#[derive(Debug,Clone,PartialEq)]
pub struct Proximity {
    pub aircraft: Aircraft,
    pub surface_distance: Length,
    pub distance: Length, // slant range if the aircraft has a known altitude, surface distance otherwise
}

impl fmt::Display for Proximity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} at {:.0}m", self.aircraft.label(), self.distance.get::<meter>())
    }
}

/// observer distance of a single aircraft as (surface, effective) pair, None if the aircraft has no usable position
pub fn distance_to (aircraft: &Aircraft, observer: &GeoPoint3, method: DistanceMethod)->Option<(Length,Length)> {
    let pos = aircraft.position()?;
    let surface = observer.point.distance_to( &pos, method);

    let distance = match aircraft.altitude.effective() {
        Some(alt) => slant_range( surface, meters( abs( observer.alt.get::<meter>() - alt.get::<meter>()))),
        None => surface
    };

    Some( (surface,distance) )
}

/// single pass over all positioned aircraft. Ties keep the first encountered aircraft, non-finite distances are skipped
pub fn find_closest (aircraft: &[Aircraft], observer: &GeoPoint3, method: DistanceMethod)->Option<Proximity> {
    let mut closest: Option<(&Aircraft,Length,Length)> = None;

    for ac in aircraft {
        if let Some((surface,distance)) = distance_to( ac, observer, method) {
            if !distance.get::<meter>().is_finite() {
                continue
            }
            match closest {
                Some((_,_,d_min)) if distance >= d_min => {}
                _ => closest = Some( (ac,surface,distance) )
            }
        }
    }

    closest.map( |(ac,surface_distance,distance)| Proximity { aircraft: ac.clone(), surface_distance, distance })
}

/// only aircraft with a numeric altitude inside the altitude band and closer than the max distance are flagged
pub fn is_close (aircraft: &Aircraft, distance: Length, thresholds: &AlertThresholds)->bool {
    match aircraft.altitude {
        Altitude::Numeric(alt) => thresholds.includes_altitude(alt) && thresholds.includes_distance(distance),
        Altitude::Ground | Altitude::Unknown => false
    }
}

/// the result of one proximity evaluation. `distance` is zero if there is no positioned aircraft
#[derive(Debug,Clone,PartialEq)]
pub struct ProximityReport {
    pub closest: Option<Proximity>,
    pub distance: Length,
    pub close: bool,
    pub positioned: usize,
}

impl ProximityReport {
    pub fn none ()->Self {
        ProximityReport { closest: None, distance: meters(0.0), close: false, positioned: 0 }
    }
}

pub fn evaluate (aircraft: &[Aircraft], observer: &GeoPoint3, alert: &AlertConfig, method: DistanceMethod)->ProximityReport {
    let positioned = aircraft.iter().filter( |ac| ac.has_position()).count();

    match find_closest( aircraft, observer, method) {
        Some(prox) => {
            let thresholds = alert.resolve( prox.aircraft.category_code());
            let close = is_close( &prox.aircraft, prox.distance, &thresholds);
            ProximityReport { distance: prox.distance, closest: Some(prox), close, positioned }
        }
        None => ProximityReport { positioned, ..ProximityReport::none() }
    }
}

/* #endregion closest aircraft */
