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
use thiserror::Error;
use luma_common::net::LumaNetError;

pub type Result<T> = std::result::Result<T,LumaAdsbError>;

#[derive(Error,Debug)]
pub enum LumaAdsbError {

    #[error("config error {0}")]
    ConfigError(String),

    #[error("network error {0}")]
    NetError( #[from] LumaNetError),

    #[error("timeout after {0:?}")]
    TimeoutError(Duration),

    #[error("parse error {0}")]
    ParseError(String),

    #[error("no stats available")]
    NoStatsError,

    #[error("display error {0}")]
    DisplayError(String),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("RON error {0}")]
    RonError( #[from] ron::error::SpannedError),
}

macro_rules! parse_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::LumaAdsbError::ParseError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use parse_error;

macro_rules! config_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::LumaAdsbError::ConfigError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use config_error;

macro_rules! display_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::LumaAdsbError::DisplayError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use display_error;
