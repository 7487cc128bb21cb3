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

//! a deterministic, discrete-time flight dynamics core for air traffic control training.
//! A `SimController` manages any number of independent simulations, each one holding a population
//! of aircraft that follow their flight plans or controller commands. Simulated time only advances
//! through explicit `tick` / `run_for` calls, so identical inputs always produce identical outputs.

use std::path::Path;
use serde::de::DeserializeOwned;

pub mod constants;
pub mod flight_math;
pub mod catalog;
pub mod navigation;
pub mod command;
pub mod aircraft;
pub mod controller;
pub mod scenario;

pub mod errors;
use errors::{OdinFlightSimError, Result};

pub use aircraft::{Aircraft, AircraftState, ControlMode, FlightPhase, Waypoint};
pub use catalog::{PerformanceCatalog, PerformanceRecord};
pub use command::AircraftCommand;
pub use controller::{SimController, SimId, SimulationConfig, SimulationSnapshot, SpawnParams, TickResult, Rejection};
pub use flight_math::{GeoPos, Wind};
pub use navigation::{Airport, NavResolver, RoutePoint, StaticNavData};

/// load and deserialize a RON config file
pub fn load_config<C: DeserializeOwned> (path: impl AsRef<Path>)->Result<C> {
    let path = path.as_ref();
    let s = std::fs::read_to_string( path)
        .map_err( |e| OdinFlightSimError::ConfigError( format!("cannot read config {}: {}", path.display(), e)))?;
    Ok( ron::from_str( &s)? )
}
