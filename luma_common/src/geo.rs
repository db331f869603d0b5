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

//! this module provides distance computations on the WGS84 ellipsoid surface.
//! We use the [geo](https://docs.rs/geo/latest/geo/index.html) crate for the actual algorithms and
//! [uom](https://docs.rs/uom/latest/uom/) lengths for results so that callers never have to guess units.

use std::{fmt, str::FromStr};
use serde::{Serialize,Deserialize};
use geo::{Distance, Geodesic, Haversine, Point};
use uom::si::{f64::Length, length::meter};

use crate::{pow2, sqrt};

/* #region GeoPoint ***********************************************************************************************/

/// a wrapper for geo::Point that uses geodetic degrees stored as f64 (x = longitude, y = latitude)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct GeoPoint(Point);

impl GeoPoint {
    pub fn from_lat_lon_degrees (lat: f64, lon: f64) -> Self {
        GeoPoint( Point::new( lon, lat))
    }

    #[inline] pub fn longitude_degrees (&self)->f64 { self.0.x() }
    #[inline] pub fn latitude_degrees (&self)->f64 { self.0.y() }

    /// zero is our "not set" sentinel for both ordinates. A point at 0/0 (or with either ordinate at 0) is
    /// not a position we can meaningfully report, it is a missing value. So is anything outside of lat +-90 / lon +-180
    pub fn is_set (&self)->bool {
        let (lon,lat) = (self.0.x(), self.0.y());
        lon != 0.0 && lat != 0.0 && lat.abs() <= 90.0 && lon.abs() <= 180.0
    }

    /// ellipsoidal (Karney) distance - accurate to the nanometer on WGS84
    pub fn geodesic_distance_to (&self, other: &GeoPoint)->Length {
        Length::new::<meter>( Geodesic.distance( self.0, other.0))
    }

    /// spherical distance using mean earth radius - error up to 0.5% but cheaper
    pub fn haversine_distance_to (&self, other: &GeoPoint)->Length {
        Length::new::<meter>( Haversine.distance( self.0, other.0))
    }

    pub fn distance_to (&self, other: &GeoPoint, method: DistanceMethod)->Length {
        match method {
            DistanceMethod::Geodesic => self.geodesic_distance_to(other),
            DistanceMethod::Haversine => self.haversine_distance_to(other),
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.0.x(),self.0.y())
    }
}

/* #endregion GeoPoint */

/* #region GeoPoint3 **********************************************************************************************/

/// a GeoPoint with altitude (above MSL)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct GeoPoint3 {
    pub point: GeoPoint,
    pub alt: Length,
}

impl GeoPoint3 {
    pub fn from_lat_lon_degrees_alt (lat: f64, lon: f64, alt: Length)->Self {
        GeoPoint3{ point: GeoPoint::from_lat_lon_degrees(lat,lon), alt }
    }

    #[inline] pub fn latitude_degrees (&self)->f64 { self.point.latitude_degrees() }
    #[inline] pub fn longitude_degrees (&self)->f64 { self.point.longitude_degrees() }
    #[inline] pub fn altitude (&self)->Length { self.alt }
}

impl fmt::Display for GeoPoint3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{:.0}m]", self.point.longitude_degrees(), self.point.latitude_degrees(), self.alt.get::<meter>())
    }
}

/* #endregion GeoPoint3 */

/// which surface distance algorithm to use
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
#[serde(rename_all="lowercase")]
pub enum DistanceMethod {
    #[default]
    Geodesic,
    Haversine,
}

impl FromStr for DistanceMethod {
    type Err = String;

    fn from_str (s: &str)->Result<Self,Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "geodesic" | "vincenty" | "karney" => Ok(DistanceMethod::Geodesic),
            "haversine" | "spherical" => Ok(DistanceMethod::Haversine),
            other => Err( format!("unknown distance method '{other}'"))
        }
    }
}

/// straight line distance from surface distance and vertical separation. Note this treats the surface distance
/// as a flat leg, which is well within our accuracy needs for line-of-sight ranges
pub fn slant_range (surface: Length, vertical: Length)->Length {
    let h = surface.get::<meter>();
    let v = vertical.get::<meter>();
    Length::new::<meter>( sqrt( pow2(h) + pow2(v)))
}
