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

use std::io;

/// the signal that ended our wait in [`termination_signal`]
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Termination {
    Interrupt,
    Terminate,
}

/// wait until the process receives SIGINT (ctrl-c) or SIGTERM.
/// Note this does *not* exit the process, it is up to the caller to run its shutdown sequence and exit.
#[cfg(unix)]
pub async fn termination_signal ()->io::Result<Termination> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal( SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => { res.map(|_| Termination::Interrupt) }
        _ = sigterm.recv() => { Ok(Termination::Terminate) }
    }
}

#[cfg(not(unix))]
pub async fn termination_signal ()->io::Result<Termination> {
    tokio::signal::ctrl_c().await.map(|_| Termination::Interrupt)
}

/// just an alias for std::process::exit()
#[inline] pub fn exit(exit_code: i32)-> ! { std::process::exit(exit_code) }
