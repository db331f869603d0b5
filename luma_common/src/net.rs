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

//! common utility functions for network operations

use std::time::Duration;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::define_error;

define_error!{ pub LumaNetError =
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    TimeoutError(String) : "request timed out: {0}",
    StatusError(StatusCode) : "response status {0}",
    NotFoundError(String) : "not found {0}",
    ParseError(String) : "parse error: {0}"
}

pub type Result<T> = std::result::Result<T, LumaNetError>;

/// build a `http://host[:port]/path` URL. `host` might already contain a port, in which case `port` has to be None
pub fn http_url (host: &str, port: Option<u16>, path: &str)->String {
    let path = path.trim_start_matches('/');
    match port {
        Some(port) => format!("http://{host}:{port}/{path}"),
        None => format!("http://{host}/{path}")
    }
}

/// GET a JSON resource within the given timeout. Anything but a 2xx status is an error, as is a body that does not
/// deserialize into `T`
pub async fn get_json<T> (client: &Client, url: &str, timeout: Duration)->Result<T> where T: DeserializeOwned {
    let response = client.get( url)
        .timeout( timeout)
        .send().await
        .map_err( |e| if e.is_timeout() { LumaNetError::TimeoutError(url.to_string()) } else { LumaNetError::HttpError(e) })?;

    match response.status() {
        status if status.is_success() => from_json( response).await,
        StatusCode::NOT_FOUND => Err( LumaNetError::NotFoundError( url.to_string())),
        other => Err( LumaNetError::StatusError(other))
    }
}

pub async fn from_json<T> (response: Response)->Result<T> where T: DeserializeOwned {
    let bytes = response.bytes().await?;
    serde_json::from_slice( &bytes).map_err(|e| LumaNetError::ParseError(e.to_string()))
}
