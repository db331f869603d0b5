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

use std::{path::PathBuf, sync::Arc};
use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use luma_common::process::{exit, termination_signal};
use luma_adsb::{
    config::{FileConfig, LumaConfig},
    display::{ConsoleDisplay, LogDisplay},
    http_feed::HttpFeedConnector,
    scheduler::{Scheduler, SharedDisplay, run_once, shared_display},
    store::FeedStore,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "show the closest aircraft of a local ADS-B receiver on a small text display")]
struct Args {
    /// RON file with schedule and display geometry
    #[arg(short,long, env="LUMA_ADSB_CONFIG")]
    config: Option<PathBuf>,

    /// print display frames to stdout
    #[arg(long)]
    console: bool,

    /// fetch all feeds once, show one frame and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info"))) // RUST_LOG
        .init();

    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => FileConfig::load( path)?,
        None => FileConfig::default()
    };

    let config = match LumaConfig::from_env( file_config) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            exit(1)
        }
    };
    info!("observer at {}, receiver host {}", config.observer, config.host);

    let display: SharedDisplay = if args.console {
        shared_display( ConsoleDisplay::new( &config.display))
    } else {
        shared_display( LogDisplay::new())
    };

    let connector = Arc::new( HttpFeedConnector::new( &config.host));
    let store = FeedStore::new();
    let renderer = config.renderer();

    if args.once {
        let lines = run_once( connector, &store, &config.schedule, &renderer, &display).await;
        if !args.console {
            print!("{lines}");
        }
        return Ok(())
    }

    let scheduler = Scheduler::spawn( connector, store, &config.schedule, renderer, display)?;

    match termination_signal().await {
        Ok(sig) => info!("received {sig:?}"),
        Err(e) => error!("failed to wait for termination signal: {e}")
    }
    scheduler.shutdown( config.schedule.shutdown_grace).await;

    Ok(())
}
