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

use uom::si::length::{meter, kilometer, mile, foot};
use luma_common::geo::*;
use luma_common::uom::*;

// run with "cargo test test_basic_distances -- --nocapture"

#[test]
fn test_basic_distances() {
    let p1 = GeoPoint::from_lat_lon_degrees( 40.0, -75.0);
    let p2 = GeoPoint::from_lat_lon_degrees( 40.0, -74.0);

    let d_geo = p1.geodesic_distance_to( &p2);
    let d_hav = p1.haversine_distance_to( &p2);
    println!("geodesic: {:.1}m, haversine: {:.1}m", d_geo.get::<meter>(), d_hav.get::<meter>());

    // one degree of longitude at 40N is about 85km
    assert!( d_geo.get::<kilometer>() > 84.0 && d_geo.get::<kilometer>() < 87.0);

    // haversine is within 0.5% of the ellipsoidal distance
    let rel = (d_geo.get::<meter>() - d_hav.get::<meter>()).abs() / d_geo.get::<meter>();
    assert!( rel < 0.005);

    assert_eq!( p1.distance_to( &p2, DistanceMethod::Geodesic), d_geo);
    assert_eq!( p1.distance_to( &p2, DistanceMethod::Haversine), d_hav);
}

#[test]
fn test_coincident_points() {
    let p = GeoPoint::from_lat_lon_degrees( 40.0, -75.0);
    assert!( p.geodesic_distance_to( &p).get::<meter>().abs() < 1e-9);
    assert!( p.haversine_distance_to( &p).get::<meter>().abs() < 1e-6);
}

#[test]
fn test_unset_positions() {
    assert!( GeoPoint::from_lat_lon_degrees( 40.0, -75.0).is_set());
    assert!( !GeoPoint::from_lat_lon_degrees( 0.0, 0.0).is_set());
    assert!( !GeoPoint::from_lat_lon_degrees( 40.0, 0.0).is_set());
    assert!( !GeoPoint::from_lat_lon_degrees( 0.0, -75.0).is_set());
    assert!( !GeoPoint::from_lat_lon_degrees( f64::NAN, -75.0).is_set());
    assert!( !GeoPoint::from_lat_lon_degrees( 95.0, -75.0).is_set());
    assert!( !GeoPoint::from_lat_lon_degrees( 40.0, -181.0).is_set());
    assert!( GeoPoint::from_lat_lon_degrees( -90.0, 180.0).is_set());
}

#[test]
fn test_slant_range() {
    let surface = meters(3000.0);
    assert_eq!( slant_range( surface, meters(0.0)), surface);
    assert!( (slant_range( surface, meters(4000.0)).get::<meter>() - 5000.0).abs() < 1e-9);

    // monotonic in vertical separation
    let mut last = slant_range( surface, meters(0.0));
    for v in [10.0, 100.0, 1000.0, 10000.0] {
        let d = slant_range( surface, feet(v));
        assert!( d >= last);
        last = d;
    }
}

#[test]
fn test_distance_method_parsing() {
    assert_eq!( "geodesic".parse::<DistanceMethod>(), Ok(DistanceMethod::Geodesic));
    assert_eq!( " Haversine ".parse::<DistanceMethod>(), Ok(DistanceMethod::Haversine));
    assert!( "euclid".parse::<DistanceMethod>().is_err());
    assert_eq!( DistanceMethod::default(), DistanceMethod::Geodesic);
}

#[test]
fn test_length_units() {
    assert_eq!( "mi".parse::<LengthUnit>(), Ok(LengthUnit::Miles));
    assert_eq!( "NM".parse::<LengthUnit>(), Ok(LengthUnit::NauticalMiles));
    assert_eq!( "km".parse::<LengthUnit>(), Ok(LengthUnit::Kilometers));
    assert!( "furlong".parse::<LengthUnit>().is_err());

    let unit = LengthUnit::NauticalMiles;
    assert!( (unit.length(1.0).get::<meter>() - 1852.0).abs() < 1e-6);
    assert!( (unit.value( meters(1852.0)) - 1.0).abs() < 1e-9);
    assert_eq!( unit.to_string(), "nm");

    assert!( (LengthUnit::Miles.value( miles(3.0)) - 3.0).abs() < 1e-9);
    assert!( (feet(5280.0).get::<mile>() - 1.0).abs() < 1e-9);
}
