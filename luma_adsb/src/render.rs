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

//! turns a feed snapshot into the fixed width text lines of a small monospaced display. This module does not
//! know anything about pixels beyond the grid geometry, drawing is up to the [`crate::display::TextDisplay`]

use std::fmt;
use chrono::{DateTime, Local};
use serde::{Serialize, Deserialize};
use luma_common::{datetime::format_clock, geo::{DistanceMethod, GeoPoint3}, uom::LengthUnit};

use crate::{Altitude, store::FeedSnapshot, proximity::{AlertConfig, ProximityReport, evaluate}};

/// the text grid of the display, in pixels. Defaults to a 128x64 SSD1306 panel with a 7x13 face
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
#[serde(default)]
pub struct DisplayGeometry {
    pub width_px: u32,
    pub height_px: u32,
    pub glyph_width: u32,
    pub glyph_height: u32,
    pub top_baseline: u32, // y of the first baseline
}

impl Default for DisplayGeometry {
    fn default()->Self {
        DisplayGeometry { width_px: 128, height_px: 64, glyph_width: 7, glyph_height: 13, top_baseline: 15 }
    }
}

impl DisplayGeometry {
    pub fn columns (&self)->usize {
        self.width_px.checked_div( self.glyph_width).unwrap_or(0) as usize
    }

    /// number of baselines that fit on the panel
    pub fn rows (&self)->usize {
        if self.glyph_height == 0 || self.top_baseline > self.height_px {
            0
        } else {
            ((self.height_px - self.top_baseline) / self.glyph_height + 1) as usize
        }
    }

    pub fn line_y (&self, index: usize)->u32 {
        self.top_baseline + (index as u32) * self.glyph_height
    }
}

/// the lines of one display frame. Never more than `rows`, never wider than `columns`. Lines only get clipped
/// if the grid is narrower than what the [`LineFormatter`] fields need
#[derive(Debug,Clone,PartialEq,Eq,Default)]
pub struct DisplayLines {
    lines: Vec<String>,
}

impl DisplayLines {
    /// take candidate lines until we either have `rows` of them or hit the first empty one
    pub fn new<I> (candidates: I, rows: usize, columns: usize)->Self where I: IntoIterator<Item=String> {
        let lines = candidates.into_iter()
            .take_while( |line| !line.is_empty())
            .take( rows)
            .map( |line| clip( line, columns))
            .collect();
        DisplayLines { lines }
    }

    pub fn lines (&self)->&[String] { &self.lines }
    pub fn len (&self)->usize { self.lines.len() }
    pub fn is_empty (&self)->bool { self.lines.is_empty() }
    pub fn get (&self, idx: usize)->Option<&str> { self.lines.get(idx).map(String::as_str) }
    pub fn iter (&self)->impl Iterator<Item=&str> { self.lines.iter().map(String::as_str) }
}

impl fmt::Display for DisplayLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!( f, "{line}")?;
        }
        Ok(())
    }
}

fn clip (line: String, columns: usize)->String {
    if line.chars().count() > columns {
        line.chars().take(columns).collect()
    } else {
        line
    }
}

/// everything the formatter needs for one frame, resolved from the store before we format
#[derive(Debug,Clone,PartialEq)]
pub struct RenderInput {
    pub now: DateTime<Local>,
    pub total: usize,
    pub report: ProximityReport,
    pub feeder_counts: (usize,usize),
    pub update_available: bool,
    pub cpu_temp: Option<i32>,
}

pub fn render_input (snapshot: &FeedSnapshot, observer: &GeoPoint3, alert: &AlertConfig, method: DistanceMethod, now: DateTime<Local>)->RenderInput {
    RenderInput {
        now,
        total: snapshot.total_aircraft(),
        report: evaluate( &snapshot.aircraft, observer, alert, method),
        feeder_counts: snapshot.feeder_health.counts(),
        update_available: snapshot.update_available,
        cpu_temp: snapshot.cpu_temp,
    }
}

/// the formatting context, created once at startup from the display geometry and the distance unit
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct LineFormatter {
    pub columns: usize,
    pub rows: usize,
    pub unit: LengthUnit,
}

impl LineFormatter {
    pub fn new (geometry: &DisplayGeometry, unit: LengthUnit)->Self {
        LineFormatter { columns: geometry.columns(), rows: geometry.rows(), unit }
    }

    /// all fields have fixed widths that add up to at most 18 columns, which is the smallest grid we support
    /// without clipping. The alert marker has its own slot between call sign and hex so that it always shows
    pub fn format (&self, input: &RenderInput)->DisplayLines {
        let mut candidates = vec![ self.status_line( input) ];

        if let Some(prox) = &input.report.closest {
            let ac = &prox.aircraft;
            let alert = if input.report.close { '!' } else { ' ' };
            candidates.push( format!("C:{:<8.8}{}{:.7}", ac.label(), alert, ac.hex));

            let dist = self.unit.value( input.report.distance).clamp( 0.0, MAX_DISTANCE);
            let cat = ac.category_code().unwrap_or("");
            candidates.push( format!("D:{:6.2} {:<2.2} T:{}C", dist, cat, format_temp( input.cpu_temp)));

            let (good,bad) = input.feeder_counts;
            let update = if input.update_available { " U" } else { "" };
            candidates.push( format!("A:{} F:{}/{}{}", format_altitude( &ac.altitude), good.min(MAX_LINKS), bad.min(MAX_LINKS), update));
        }

        DisplayLines::new( candidates, self.rows, self.columns)
    }

    fn status_line (&self, input: &RenderInput)->String {
        format!("{} P:{:3}/{:3}", format_clock( &input.now), input.total.min(MAX_COUNT), input.report.positioned.min(MAX_COUNT))
    }
}

const MAX_COUNT: usize = 999;
const MAX_LINKS: usize = 99;
const MAX_DISTANCE: f64 = 999.99;

fn format_altitude (alt: &Altitude)->String {
    match alt {
        Altitude::Numeric(_) => format!("{:5}", (alt.feet().unwrap_or(0.0).round() as i64).clamp( -9999, 99999)),
        Altitude::Ground => "  GND".to_string(),
        Altitude::Unknown => "     ".to_string(),
    }
}

fn format_temp (temp: Option<i32>)->String {
    match temp {
        Some(t) => format!("{:2}", t.clamp( -99, 999)),
        None => "--".to_string()
    }
}

/// everything that is fixed for the process lifetime and needed to turn snapshots into display frames
#[derive(Debug,Clone,PartialEq)]
pub struct Renderer {
    pub observer: GeoPoint3,
    pub alert: AlertConfig,
    pub method: DistanceMethod,
    pub geometry: DisplayGeometry,
    pub formatter: LineFormatter,
}

impl Renderer {
    pub fn new (observer: GeoPoint3, alert: AlertConfig, method: DistanceMethod, geometry: DisplayGeometry, unit: LengthUnit)->Self {
        let formatter = LineFormatter::new( &geometry, unit);
        Renderer { observer, alert, method, geometry, formatter }
    }

    pub fn input (&self, snapshot: &FeedSnapshot, now: DateTime<Local>)->RenderInput {
        render_input( snapshot, &self.observer, &self.alert, self.method, now)
    }

    pub fn render (&self, snapshot: &FeedSnapshot, now: DateTime<Local>)->(RenderInput,DisplayLines) {
        let input = self.input( snapshot, now);
        let lines = self.formatter.format( &input);
        (input,lines)
    }
}
