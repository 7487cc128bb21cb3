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

//! the simulation registry. Each simulation owns an independent aircraft population that is
//! advanced in discrete, caller supplied time steps - there is no wall clock involved in ticking.
//! Simulation ids are never reused within a controller so that stale ids of deleted simulations
//! can't alias new ones. Aircraft within a simulation are ordered by callsign

use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};
use chrono::{DateTime,TimeDelta,Utc};
use serde::{Serialize,Serializer,Deserialize};
use tracing::{debug,info,warn};
use odin_common::collections::BoundedLog;

use crate::constants::*;
use crate::aircraft::{Aircraft, AircraftEvent, AircraftSetup, AircraftState, Waypoint};
use crate::catalog::PerformanceCatalog;
use crate::command::AircraftCommand;
use crate::flight_math::{Wind, bearing_to};
use crate::navigation::NavResolver;
use crate::errors::{OdinFlightSimError, Result, parse_error};

/// opaque simulation identifier. The default value is never assigned to a simulation
#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Default)]
pub struct SimId(u64);

impl fmt::Display for SimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "sim-{}", self.0)
    }
}

impl FromStr for SimId {
    type Err = OdinFlightSimError;

    fn from_str (s: &str)->Result<Self> {
        let n = s.strip_prefix("sim-").ok_or_else( || parse_error!("not a simulation id: {}", s))?;
        let n: u64 = n.parse().map_err( |_| parse_error!("not a simulation id: {}", s))?;
        Ok( SimId(n))
    }
}

impl Serialize for SimId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        serializer.collect_str(self)
    }
}

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub name: Option<String>,
    pub start_time: Option<DateTime<Utc>>, // simulated time at tick 0, defaults to creation time
    pub max_events: usize,
}

impl Default for SimulationConfig {
    fn default()->Self {
        SimulationConfig { name: None, start_time: None, max_events: MAX_SIM_EVENTS }
    }
}

impl SimulationConfig {
    pub fn named (name: impl ToString)->Self {
        SimulationConfig { name: Some(name.to_string()), ..Default::default() }
    }
}

#[derive(Debug,Clone,Serialize)]
pub struct SimEvent {
    pub sim_time: DateTime<Utc>,
    pub message: String
}

/// why a tick was not executed. These are expected outcomes, not errors
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize)]
#[serde(rename_all="snake_case")]
pub enum Rejection {
    UnknownSimulation,
    Paused,
    InvalidTimeStep,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownSimulation => write!(f, "unknown simulation"),
            Rejection::Paused => write!(f, "simulation is paused"),
            Rejection::InvalidTimeStep => write!(f, "invalid time step"),
        }
    }
}

/// the aggregated state of all active aircraft of a simulation after a tick
#[derive(Debug,Clone,Serialize)]
pub struct SimulationSnapshot {
    pub sim_id: SimId,
    pub name: String,
    pub sim_time: DateTime<Utc>,
    pub elapsed: f64,
    pub tick_count: u64,
    pub paused: bool,
    pub aircraft: Vec<AircraftState>,
}

impl SimulationSnapshot {
    pub fn get (&self, callsign: &str)->Option<&AircraftState> {
        self.aircraft.iter().find( |ac| ac.callsign == callsign)
    }
}

#[derive(Debug,Clone,Serialize)]
#[serde(tag="status", rename_all="snake_case")]
pub enum TickResult {
    Advanced { snapshot: SimulationSnapshot },
    Rejected { reason: Rejection },
}

impl TickResult {
    pub fn success (&self)->bool { matches!( self, TickResult::Advanced{..}) }

    pub fn snapshot (&self)->Option<&SimulationSnapshot> {
        match self {
            TickResult::Advanced{snapshot} => Some(snapshot),
            TickResult::Rejected{..} => None
        }
    }

    pub fn reason (&self)->Option<Rejection> {
        match self {
            TickResult::Advanced{..} => None,
            TickResult::Rejected{reason} => Some(*reason)
        }
    }
}

#[derive(Debug,Clone,Serialize)]
pub struct SimulationInfo {
    pub sim_id: SimId,
    pub name: String,
    pub created: DateTime<Utc>,
    pub sim_time: DateTime<Utc>,
    pub tick_count: u64,
    pub paused: bool,
    pub n_aircraft: usize,
    pub n_active: usize,
}

/* #region spawn parameters ******************************************************************************/

/// what the orchestration layer provides to create a new aircraft
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct SpawnParams {
    pub callsign: String,
    pub type_code: String,
    pub origin: String,

    #[serde(default)] pub destination: Option<String>,
    #[serde(default)] pub route: Option<String>,
    #[serde(default)] pub flight_plan: Option<Vec<Waypoint>>,

    #[serde(default)] pub altitude: Option<f64>,
    #[serde(default)] pub heading: Option<f64>,
    #[serde(default)] pub speed: Option<f64>,
    #[serde(default)] pub cruise_altitude: Option<f64>,
    #[serde(default)] pub cruise_speed: Option<f64>,
    #[serde(default)] pub wind: Option<Wind>,
}

impl SpawnParams {
    pub fn new (callsign: impl ToString, type_code: impl ToString, origin: impl ToString)->Self {
        SpawnParams {
            callsign: callsign.to_string(),
            type_code: type_code.to_string(),
            origin: origin.to_string(),
            destination: None, route: None, flight_plan: None,
            altitude: None, heading: None, speed: None,
            cruise_altitude: None, cruise_speed: None, wind: None
        }
    }

    pub fn with_destination (mut self, destination: impl ToString)->Self { self.destination = Some(destination.to_string()); self }
    pub fn with_route (mut self, route: impl ToString)->Self { self.route = Some(route.to_string()); self }
    pub fn with_flight_plan (mut self, flight_plan: Vec<Waypoint>)->Self { self.flight_plan = Some(flight_plan); self }
    pub fn with_altitude (mut self, altitude: f64)->Self { self.altitude = Some(altitude); self }
    pub fn with_heading (mut self, heading: f64)->Self { self.heading = Some(heading); self }
    pub fn with_speed (mut self, speed: f64)->Self { self.speed = Some(speed); self }
    pub fn with_wind (mut self, wind: Wind)->Self { self.wind = Some(wind); self }

    pub fn with_cruise (mut self, altitude: f64, speed: f64)->Self {
        self.cruise_altitude = Some(altitude);
        self.cruise_speed = Some(speed);
        self
    }
}

/* #endregion spawn parameters */

/* #region Simulation ************************************************************************************/

#[derive(Debug)]
pub struct Simulation {
    id: SimId,
    name: String,
    created: DateTime<Utc>,
    start_time: DateTime<Utc>,
    sim_time: DateTime<Utc>,
    elapsed: f64, // simulated seconds
    tick_count: u64,
    paused: bool,
    events: BoundedLog<SimEvent>,
    aircraft: BTreeMap<String,Aircraft>,
}

impl Simulation {
    fn new (id: SimId, name: String, config: SimulationConfig, created: DateTime<Utc>)->Self {
        let start_time = config.start_time.unwrap_or(created);

        Simulation {
            id,
            name,
            created,
            start_time,
            sim_time: start_time,
            elapsed: 0.0,
            tick_count: 0,
            paused: false,
            events: BoundedLog::new( config.max_events),
            aircraft: BTreeMap::new(),
        }
    }

    pub fn id (&self)->SimId { self.id }
    pub fn name (&self)->&str { self.name.as_str() }
    pub fn created (&self)->DateTime<Utc> { self.created }
    pub fn sim_time (&self)->DateTime<Utc> { self.sim_time }
    pub fn elapsed (&self)->f64 { self.elapsed }
    pub fn tick_count (&self)->u64 { self.tick_count }
    pub fn is_paused (&self)->bool { self.paused }
    pub fn events (&self)->&BoundedLog<SimEvent> { &self.events }

    pub fn aircraft (&self, callsign: &str)->Option<&Aircraft> { self.aircraft.get( callsign) }
    pub fn n_active (&self)->usize { self.aircraft.values().filter( |ac| ac.is_active()).count() }

    pub fn info (&self)->SimulationInfo {
        SimulationInfo {
            sim_id: self.id,
            name: self.name.clone(),
            created: self.created,
            sim_time: self.sim_time,
            tick_count: self.tick_count,
            paused: self.paused,
            n_aircraft: self.aircraft.len(),
            n_active: self.n_active(),
        }
    }

    pub fn snapshot (&self)->SimulationSnapshot {
        SimulationSnapshot {
            sim_id: self.id,
            name: self.name.clone(),
            sim_time: self.sim_time,
            elapsed: self.elapsed,
            tick_count: self.tick_count,
            paused: self.paused,
            aircraft: self.aircraft.values().filter( |ac| ac.is_active()).map( |ac| ac.state()).collect(),
        }
    }

    /// simulated time after another `dt` seconds, or `None` if that is outside the representable range
    fn next_sim_time (&self, dt: f64)->Option<DateTime<Utc>> {
        let micros = ((self.elapsed + dt) * 1e6).round() as i64;
        self.start_time.checked_add_signed( TimeDelta::microseconds( micros))
    }

    /// advance all active aircraft to `sim_time`. There are no dependencies between aircraft within a tick
    fn advance (&mut self, dt: f64, sim_time: DateTime<Utc>) {
        let mut arrivals: Vec<String> = Vec::new();

        for ac in self.aircraft.values_mut() {
            if ac.is_active() {
                ac.tick( dt);
                if !ac.is_active() { arrivals.push( ac.callsign().to_string()) }
            }
        }

        self.elapsed += dt;
        self.sim_time = sim_time;
        self.tick_count += 1;

        for cs in arrivals {
            info!("{} arrived in simulation {}", cs, self.id);
            self.log( format!("{cs} arrived"));
        }
    }

    fn log (&mut self, message: String) {
        self.events.push( SimEvent { sim_time: self.sim_time, message });
    }
}

/* #endregion Simulation */

/* #region SimController *********************************************************************************/

/// the synchronous API of the flight simulation core
pub struct SimController {
    resolver: Box<dyn NavResolver>,
    catalog: Arc<PerformanceCatalog>,
    simulations: BTreeMap<SimId,Simulation>,
    last_id: u64,
}

impl SimController {
    pub fn new (resolver: impl NavResolver + 'static, catalog: Arc<PerformanceCatalog>)->Self {
        SimController { resolver: Box::new(resolver), catalog, simulations: BTreeMap::new(), last_id: 0 }
    }

    pub fn with_builtin_catalog (resolver: impl NavResolver + 'static)->Self {
        Self::new( resolver, PerformanceCatalog::builtin())
    }

    pub fn catalog (&self)->&PerformanceCatalog { self.catalog.as_ref() }

    //--- simulation management

    pub fn create_simulation (&mut self, config: SimulationConfig)->SimId {
        self.last_id += 1;
        let id = SimId(self.last_id);
        let name = config.name.clone().unwrap_or_else( || format!("simulation-{}", self.last_id));

        info!("created simulation {} ({})", id, name);
        self.simulations.insert( id, Simulation::new( id, name, config, Utc::now()));
        id
    }

    pub fn list_simulations (&self)->Vec<SimulationInfo> {
        self.simulations.values().map( |sim| sim.info()).collect()
    }

    pub fn get_simulation (&self, sim_id: SimId)->Option<&Simulation> {
        self.simulations.get( &sim_id)
    }

    pub fn snapshot (&self, sim_id: SimId)->Option<SimulationSnapshot> {
        self.simulations.get( &sim_id).map( |sim| sim.snapshot())
    }

    pub fn pause (&mut self, sim_id: SimId)->bool {
        self.set_paused( sim_id, true)
    }

    pub fn resume (&mut self, sim_id: SimId)->bool {
        self.set_paused( sim_id, false)
    }

    fn set_paused (&mut self, sim_id: SimId, paused: bool)->bool {
        match self.simulations.get_mut( &sim_id) {
            Some(sim) => {
                if sim.paused != paused {
                    sim.paused = paused;
                    sim.log( if paused { "paused".to_string() } else { "resumed".to_string() });
                }
                true
            }
            None => false
        }
    }

    pub fn delete_simulation (&mut self, sim_id: SimId)->bool {
        match self.simulations.remove( &sim_id) {
            Some(sim) => {
                info!("deleted simulation {} ({})", sim_id, sim.name);
                true
            }
            None => false
        }
    }

    //--- aircraft management

    /// create a new aircraft in the given simulation. This is the only place where the navigation
    /// resolver is consulted, unresolvable data is a hard error
    pub fn spawn_aircraft (&mut self, sim_id: SimId, params: SpawnParams)->Result<AircraftState> {
        let sim = self.simulations.get( &sim_id).ok_or_else( || OdinFlightSimError::UnknownSimulation( sim_id.to_string()))?;
        if sim.aircraft( &params.callsign).map( |ac| ac.is_active()).unwrap_or(false) {
            return Err( OdinFlightSimError::DuplicateCallsign( params.callsign))
        }

        let origin = self.resolver.get_airport( &params.origin)
            .ok_or_else( || OdinFlightSimError::UnresolvedAirport( params.origin.clone()))?;

        let destination = match &params.destination {
            Some(icao) => Some( self.resolver.get_airport( icao).ok_or_else( || OdinFlightSimError::UnresolvedAirport( icao.clone()))?),
            None => None
        };

        let flight_plan: Vec<Waypoint> = if let Some(plan) = &params.flight_plan {
            plan.clone()
        } else if let Some(route) = &params.route {
            let dest = destination.as_ref().ok_or_else( || OdinFlightSimError::UnresolvedRoute( format!("{route} (no destination)")))?;
            let points = self.resolver.resolve_route( &origin.icao, &dest.icao, route);
            if points.is_empty() {
                return Err( OdinFlightSimError::UnresolvedRoute( format!("{} {} {}", origin.icao, route, dest.icao)))
            }
            points.into_iter().map( Waypoint::from).collect()
        } else {
            let mut plan = vec![ Waypoint::new( &origin.icao, origin.lat, origin.lon) ];
            if let Some(dest) = &destination { plan.push( Waypoint::new( &dest.icao, dest.lat, dest.lon)); }
            plan
        };

        let heading = match params.heading {
            Some(hdg) => hdg,
            None if flight_plan.len() >= 2 => bearing_to( flight_plan[0].position(), flight_plan[1].position()),
            None => 0.0
        };

        let (perf, is_fallback) = self.catalog.get_or_default( &params.type_code);
        if is_fallback {
            warn!("unknown aircraft type {} for {}, using {} performance", params.type_code, params.callsign, perf.type_code);
        }

        let setup = AircraftSetup {
            callsign: params.callsign.clone(),
            type_code: params.type_code,
            origin: origin.icao.clone(),
            destination: destination.as_ref().map( |d| d.icao.clone()),
            destination_pos: destination.as_ref().map( |d| d.position()),
            position: origin.position(),
            altitude: params.altitude.unwrap_or(0.0),
            heading,
            speed: params.speed,
            cruise_altitude: params.cruise_altitude,
            cruise_speed: params.cruise_speed,
            flight_plan,
            wind: params.wind.unwrap_or_default(),
        };
        let aircraft = Aircraft::new( setup, perf.clone());
        let state = aircraft.state();

        // checked above
        let Some(sim) = self.simulations.get_mut( &sim_id) else {
            return Err( OdinFlightSimError::UnknownSimulation( sim_id.to_string()))
        };
        info!("spawned {} in simulation {}", aircraft, sim_id);
        sim.log( format!("spawned {} ({}) at {}", state.callsign, state.type_code, state.origin));
        sim.aircraft.insert( params.callsign, aircraft);

        Ok(state)
    }

    /// remove an aircraft from the simulation
    pub fn remove_aircraft (&mut self, sim_id: SimId, callsign: &str)->bool {
        let Some(sim) = self.simulations.get_mut( &sim_id) else { return false };

        match sim.aircraft.remove( callsign) {
            Some(mut ac) => {
                ac.deactivate( "removed");
                info!("removed {} from simulation {}", callsign, sim_id);
                sim.log( format!("removed {callsign}"));
                true
            }
            None => false
        }
    }

    pub fn get_aircraft (&self, sim_id: SimId, callsign: &str)->Option<AircraftState> {
        self.simulations.get( &sim_id)?.aircraft( callsign).map( |ac| ac.state())
    }

    /// all aircraft of a simulation including the ones that are no longer active
    pub fn get_all_aircraft (&self, sim_id: SimId)->Option<Vec<AircraftState>> {
        self.simulations.get( &sim_id).map( |sim| sim.aircraft.values().map( |ac| ac.state()).collect())
    }

    pub fn aircraft_events (&self, sim_id: SimId, callsign: &str)->Option<Vec<AircraftEvent>> {
        self.simulations.get( &sim_id)?.aircraft( callsign).map( |ac| ac.events().iter().cloned().collect())
    }

    pub fn set_wind (&mut self, sim_id: SimId, callsign: &str, wind: Wind)->bool {
        match self.simulations.get_mut( &sim_id).and_then( |sim| sim.aircraft.get_mut( callsign)) {
            Some(ac) if ac.is_active() => { ac.set_wind( wind); true }
            _ => false
        }
    }

    //--- commands

    /// returns false without changing state if simulation or (active) aircraft are unknown or the
    /// command can't be applied (e.g. direct-to a fix that is not in the flight plan)
    pub fn issue_command (&mut self, sim_id: SimId, callsign: &str, cmd: AircraftCommand)->bool {
        let Some(sim) = self.simulations.get_mut( &sim_id) else {
            debug!("command {cmd:?} for unknown simulation {sim_id}");
            return false
        };
        let Some(ac) = sim.aircraft.get_mut( callsign) else {
            debug!("command {cmd:?} for unknown aircraft {callsign} in {sim_id}");
            return false
        };

        if ac.apply_command( &cmd) {
            sim.log( format!("{callsign} {cmd}"));
            true
        } else {
            debug!("command {cmd:?} rejected by {callsign}");
            false
        }
    }

    /// the string based variant for transport layers that don't use `AircraftCommand`
    pub fn issue_command_token (&mut self, sim_id: SimId, callsign: &str, token: &str, param: Option<&str>)->bool {
        match AircraftCommand::parse( token, param) {
            Ok(cmd) => self.issue_command( sim_id, callsign, cmd),
            Err(e) => {
                debug!("rejected command for {callsign}: {e}");
                false
            }
        }
    }

    //--- time

    /// advance all active aircraft of a simulation by `dt` seconds
    pub fn tick (&mut self, sim_id: SimId, dt: f64)->TickResult {
        if !(dt.is_finite() && dt > 0.0) {
            return TickResult::Rejected { reason: Rejection::InvalidTimeStep }
        }

        match self.simulations.get_mut( &sim_id) {
            None => TickResult::Rejected { reason: Rejection::UnknownSimulation },
            Some(sim) if sim.paused => TickResult::Rejected { reason: Rejection::Paused },
            Some(sim) => match sim.next_sim_time( dt) {
                Some(sim_time) => {
                    sim.advance( dt, sim_time);
                    TickResult::Advanced { snapshot: sim.snapshot() }
                }
                None => {
                    warn!("time step {dt}s overflows clock of simulation {}", sim.id);
                    TickResult::Rejected { reason: Rejection::InvalidTimeStep }
                }
            }
        }
    }

    /// `ceil(duration/tick_interval)` consecutive ticks, returning the result of the last one
    /// (or of the first rejected one)
    pub fn run_for (&mut self, sim_id: SimId, duration: f64, tick_interval: f64)->TickResult {
        if !(tick_interval.is_finite() && tick_interval > 0.0 && duration.is_finite() && duration >= 0.0) {
            return TickResult::Rejected { reason: Rejection::InvalidTimeStep }
        }

        let n_ticks = (duration / tick_interval).ceil() as u64;
        if n_ticks == 0 {
            return match self.simulations.get( &sim_id) {
                None => TickResult::Rejected { reason: Rejection::UnknownSimulation },
                Some(sim) if sim.paused => TickResult::Rejected { reason: Rejection::Paused },
                Some(sim) => TickResult::Advanced { snapshot: sim.snapshot() }
            }
        }

        let mut result = TickResult::Rejected { reason: Rejection::UnknownSimulation };
        for _ in 0..n_ticks {
            result = self.tick( sim_id, tick_interval);
            if !result.success() { break }
        }
        result
    }
}

/* #endregion SimController */
