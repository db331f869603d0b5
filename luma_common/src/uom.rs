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

use std::{fmt, str::FromStr};
use uom::si::{length::{foot,meter,kilometer,mile,nautical_mile},f64::Length};
use serde::{Serialize,Deserialize};

#[inline]
pub fn meters (len: f64)-> Length { Length::new::<meter>(len) }

#[inline]
pub fn feet (len: f64)-> Length { Length::new::<foot>(len) }

#[inline]
pub fn kilometers (len: f64)-> Length { Length::new::<kilometer>(len) }

#[inline]
pub fn miles (len: f64)-> Length { Length::new::<mile>(len) }

#[inline]
pub fn nautical_miles (len: f64)-> Length { Length::new::<nautical_mile>(len) }

/// the units we use to show horizontal distances to humans (and configure distance thresholds in)
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
#[serde(rename_all="lowercase")]
pub enum LengthUnit {
    #[default]
    #[serde(alias="mi")]
    Miles,
    #[serde(alias="nm")]
    NauticalMiles,
    #[serde(alias="km")]
    Kilometers,
}

impl LengthUnit {
    pub fn length (&self, v: f64)->Length {
        match self {
            LengthUnit::Miles => miles(v),
            LengthUnit::NauticalMiles => nautical_miles(v),
            LengthUnit::Kilometers => kilometers(v),
        }
    }

    pub fn value (&self, len: Length)->f64 {
        match self {
            LengthUnit::Miles => len.get::<mile>(),
            LengthUnit::NauticalMiles => len.get::<nautical_mile>(),
            LengthUnit::Kilometers => len.get::<kilometer>(),
        }
    }

    pub fn symbol (&self)->&'static str {
        match self {
            LengthUnit::Miles => "mi",
            LengthUnit::NauticalMiles => "nm",
            LengthUnit::Kilometers => "km",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str (s: &str)->Result<Self,Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mi" | "mile" | "miles" => Ok(LengthUnit::Miles),
            "nm" | "nmi" | "nauticalmiles" => Ok(LengthUnit::NauticalMiles),
            "km" | "kilometers" => Ok(LengthUnit::Kilometers),
            other => Err( format!("unknown length unit '{other}'"))
        }
    }
}
