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

mod common;

use std::{collections::HashMap, time::Duration};
use luma_adsb::{Aircraft, AircraftData, Altitude, NO_CALLSIGN, feed::*, errors::LumaAdsbError, scheduler::fetch_feed, store::FeedUpdate};
use common::MockConnector;

const AIRCRAFT_JSON: &str = r#"{
  "now": 1717243200.1,
  "messages": 123456,
  "aircraft": [
    { "hex": "a1b2c3", "type": "adsb_icao", "flight": "UAL123  ", "alt_baro": 3500, "lat": 40.01, "lon": -75.02, "category": "A3" },
    { "hex": "a4d5e6", "type": "adsb_icao", "flight": "N123AB", "alt_baro": "ground", "lat": 40.0, "lon": -75.0, "category": "A1" },
    { "hex": "abcdef", "type": "mode_s", "alt_baro": null },
    { "hex": "c0ffee", "flight": "   ", "lat": 0.0, "lon": 0.0, "lastPosition": { "lat": 40.2, "lon": -75.1, "nic": 8, "rc": 186, "seen_pos": 31.2 } },
    { "hex": "deadbe", "alt_baro": 12000.5, "lat": null, "lon": null }
  ]
}"#;

#[test]
fn test_parse_aircraft() {
    let data: AircraftData = serde_json::from_str( AIRCRAFT_JSON).unwrap();
    let aircraft = &data.aircraft;
    for ac in aircraft { println!("{ac}"); }
    assert_eq!( aircraft.len(), 5);

    let ac = &aircraft[0];
    assert_eq!( ac.hex, "a1b2c3");
    assert_eq!( ac.label(), "UAL123");
    assert!( (ac.altitude.feet().unwrap() - 3500.0).abs() < 1e-6);
    assert_eq!( ac.category_code(), Some("A3"));
    assert_eq!( ac.source(), Some("adsb_icao"));
    assert!( ac.to_string().contains("src: adsb_icao"));
    assert!( ac.has_position());

    assert_eq!( aircraft[1].altitude, Altitude::Ground);
    assert_eq!( aircraft[1].altitude.feet(), Some(0.0));

    let ac = &aircraft[2];
    assert_eq!( ac.altitude, Altitude::Unknown);
    assert_eq!( ac.label(), NO_CALLSIGN);
    assert!( !ac.has_position());

    // blank call sign, live position unset but last position available
    let ac = &aircraft[3];
    assert_eq!( ac.label(), NO_CALLSIGN);
    let pos = ac.position().unwrap();
    assert_eq!( pos.latitude_degrees(), 40.2);
    assert_eq!( pos.longitude_degrees(), -75.1);

    let ac = &aircraft[4];
    assert!( ac.altitude.is_numeric());
    assert!( !ac.has_position());
}

#[test]
fn test_altitude_variants() {
    let alt: Altitude = serde_json::from_str( "\"GROUND\"").unwrap();
    assert_eq!( alt, Altitude::Ground);

    let alt: Altitude = serde_json::from_str( "\"n/a\"").unwrap();
    assert_eq!( alt, Altitude::Unknown);

    let alt: Altitude = serde_json::from_str( "[1,2]").unwrap();
    assert_eq!( alt, Altitude::Unknown);

    let alt: Altitude = serde_json::from_str( "-150").unwrap();
    assert!( (alt.feet().unwrap() + 150.0).abs() < 1e-6);
}

#[test]
fn test_parse_stats() {
    let json = r#"[{ "pps": 812.5, "mps": 640.1, "uptime": 86400, "planes": 42, "tplanes": 1234 }]"#;
    let stats: Vec<Stage2Stats> = serde_json::from_str( json).unwrap();
    assert_eq!( stats[0].planes, 42);
    assert_eq!( stats[0].tplanes, 1234);
    assert_eq!( stats[0].uptime, 86400);

    let empty: Vec<Stage2Stats> = serde_json::from_str( "[]").unwrap();
    assert!( empty.is_empty());
}

#[test]
fn test_parse_feeder_status() {
    let json = r#"{ "0": { "beast": "good", "mlat": "disabled" } }"#;
    let w: FeederStatusWrapper = serde_json::from_str( json).unwrap();
    assert_eq!( w.status.beast, "good");
    assert_eq!( w.status.mlat, "disabled");

    let w: FeederStatusWrapper = serde_json::from_str( "{}").unwrap();
    assert_eq!( w.status, FeederStatus::default());
}

#[test]
fn test_parse_update_and_temp() {
    let info: UpdateInfo = serde_json::from_str( r#"{ "advice": "", "latest_tag": "v2.3.1", "show_update": "1" }"#).unwrap();
    assert!( info.is_update_available());
    let info: UpdateInfo = serde_json::from_str( r#"{ "show_update": "0" }"#).unwrap();
    assert!( !info.is_update_available());

    let t: CpuTempData = serde_json::from_str( r#"{ "age": 3, "cpu": "47" }"#).unwrap();
    assert_eq!( t.cpu_celsius().unwrap(), 47);
    let t: CpuTempData = serde_json::from_str( r#"{ "age": 3, "cpu": "47.6" }"#).unwrap();
    assert_eq!( t.cpu_celsius().unwrap(), 48);
    let t: CpuTempData = serde_json::from_str( r#"{ "age": 3, "cpu": "hot" }"#).unwrap();
    assert!( matches!( t.cpu_celsius(), Err(LumaAdsbError::ParseError(_))));
}

#[test]
fn test_feeder_config_from_settings() {
    let json = r#"{ "site_name": "home", "adsblol--is_enabled": true, "flightaware--is_enabled": true,
                    "opensky--is_enabled": false, "uat978--is_enabled": true }"#;
    let settings: HashMap<String,serde_json::Value> = serde_json::from_str( json).unwrap();
    let config = FeederConfig::from_settings( &settings);

    assert_eq!( config.enabled.len(), FEEDER_NAMES.len());
    let enabled: Vec<&str> = config.enabled_feeders().collect();
    assert_eq!( enabled, vec!["adsblol", "flightaware"]); // uat978 is not a feeder
}

#[test]
fn test_feeder_counts() {
    let mut health = FeederHealth::new();
    health.insert( "adsblol", FeederInfo::with_status( FeederStatus{ beast: "good".into(), mlat: "good".into() }));
    health.insert( "flightaware", FeederInfo::with_status( FeederStatus{ beast: "good".into(), mlat: "disabled".into() }));
    health.insert( "opensky", FeederInfo::with_status( FeederStatus{ beast: "unknown".into(), mlat: "bad".into() }));
    health.insert( "radarbox", FeederInfo::with_status( FeederStatus{ beast: "warning".into(), mlat: "".into() }));
    health.insert( "tat", FeederInfo{ enabled: false, uplink: Some("bad".into()), mlat: Some("bad".into()) });
    health.insert( "adsbx", FeederInfo{ enabled: true, uplink: None, mlat: None });

    assert_eq!( health.counts(), (3,2));
    assert_eq!( FeederHealth::new().counts(), (0,0));
}

#[test]
fn test_classify_link() {
    assert_eq!( classify_link( "good", "unknown"), LinkHealth::Good);
    assert_eq!( classify_link( "unknown", "unknown"), LinkHealth::Neutral);
    assert_eq!( classify_link( "disabled", "disabled"), LinkHealth::Neutral);
    assert_eq!( classify_link( "disabled", "unknown"), LinkHealth::Bad);
    assert_eq!( classify_link( "bad", "disabled"), LinkHealth::Bad);
}

// one feeder status request fails, it must not be counted (neither good nor bad)
#[tokio::test]
async fn test_feeder_health_with_failed_status() {
    let connector = MockConnector::new()
        .with_feeder( "adsblol", true, Some(("good","good")))
        .with_feeder( "flightaware", true, Some(("good","disabled")))
        .with_feeder( "opensky", true, Some(("bad","disabled")))
        .with_feeder( "radarbox", true, None)
        .with_feeder( "tat", false, Some(("bad","bad")));

    let health = fetch_feeder_health( &connector, Duration::from_millis(500)).await.unwrap();
    println!("{health:#?}");

    assert_eq!( health.feeders.len(), 5);
    assert_eq!( health.feeders["radarbox"], FeederInfo{ enabled: true, uplink: None, mlat: None });
    assert!( !health.feeders["tat"].enabled);
    assert_eq!( health.counts(), (3,1));
}

// a feeder that stalls for the whole feed timeout only drops out of the counts, the other feeders still count
#[tokio::test(start_paused = true)]
async fn test_feeder_health_with_stalled_status() {
    let timeout = Duration::from_secs(15);
    let connector = MockConnector::new()
        .with_delay( FeedKind::FeederHealth, timeout / 4)
        .with_feeder( "adsblol", true, Some(("good","good")))
        .with_feeder( "flightaware", true, Some(("good","good")))
        .with_feeder( "opensky", true, Some(("good","good")))
        .with_feeder( "radarbox", true, None)
        .with_feeder_delay( "radarbox", timeout);

    let update = fetch_feed( &connector, FeedKind::FeederHealth, timeout).await.unwrap();
    let FeedUpdate::FeederHealth(health) = update else { panic!("wrong update kind") };
    println!("{health:#?}");

    assert_eq!( health.feeders["radarbox"], FeederInfo{ enabled: true, uplink: None, mlat: None });
    assert_eq!( health.counts(), (6,0));
}

// the feeder config comes back too late, there is nothing we can count
#[tokio::test(start_paused = true)]
async fn test_feeder_health_with_stalled_config() {
    let connector = MockConnector::new()
        .with_delay( FeedKind::FeederHealth, Duration::from_secs(10))
        .with_feeder( "adsblol", true, Some(("good","good")));

    let res = fetch_feeder_health( &connector, Duration::from_secs(15)).await;
    assert!( matches!( res, Err(LumaAdsbError::TimeoutError(_))));
    assert_eq!( connector.feeder_status_calls.load( std::sync::atomic::Ordering::SeqCst), 0);
}
