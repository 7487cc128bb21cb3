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

//! the kinematic motion model of a single simulated aircraft.
//! Each control axis (heading, speed, altitude) converges from its current value towards a target
//! value at a bounded rate and snaps to the target once it is within the axis capture tolerance.
//! Position is integrated along the aircraft heading with the wind-adjusted ground speed, i.e.
//! wind changes how fast the aircraft moves but not the direction it drifts.

use std::fmt;
use serde::{Serialize,Deserialize};
use uom::si::{f64::{Length,Velocity}, length::foot, velocity::knot};
use odin_common::{angle::Heading, collections::BoundedLog};

use crate::constants::*;
use crate::catalog::PerformanceRecord;
use crate::command::AircraftCommand;
use crate::navigation::RoutePoint;
use crate::flight_math::{
    GeoPos, Wind, distance_nm, bearing_to, destination_point, heading_difference,
    ias_to_tas, tas_to_mach, calculate_ground_speed, top_of_descent_distance, clamp
};

/// who owns a control axis
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all="SCREAMING_SNAKE_CASE")]
pub enum ControlMode {
    Fms,    // follow the flight plan
    Manual  // follow the last controller command
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(rename_all="SCREAMING_SNAKE_CASE")]
pub enum FlightPhase {
    Preflight,
    TaxiOut,
    Departure,
    Climb,
    Cruise,
    Descent,
    Approach,
    Landing,
    TaxiIn,
    Arrived
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlightPhase::Preflight => "PREFLIGHT",
            FlightPhase::TaxiOut => "TAXI_OUT",
            FlightPhase::Departure => "DEPARTURE",
            FlightPhase::Climb => "CLIMB",
            FlightPhase::Cruise => "CRUISE",
            FlightPhase::Descent => "DESCENT",
            FlightPhase::Approach => "APPROACH",
            FlightPhase::Landing => "LANDING",
            FlightPhase::TaxiIn => "TAXI_IN",
            FlightPhase::Arrived => "ARRIVED",
        };
        write!(f, "{s}")
    }
}

/// the state that determines the flight phase
#[derive(Debug,Clone,Copy)]
pub struct PhaseInputs {
    pub active: bool,
    pub altitude: f64,
    pub vertical_speed: f64,
    pub target_altitude: f64,
    pub was_airborne: bool,
    pub distance_to_destination: Option<f64>,
}

/// flight phase classification. This is a pure function of the physical state, phases cannot be set
pub fn derive_phase (s: &PhaseInputs)->FlightPhase {
    if !s.active { return FlightPhase::Arrived }

    let dist = s.distance_to_destination.unwrap_or(f64::INFINITY);
    let low = s.altitude < DEPARTURE_ALTITUDE_FT;

    if s.altitude < GROUND_ALTITUDE_FT {
        if s.was_airborne { FlightPhase::TaxiIn }
        else if s.target_altitude >= GROUND_ALTITUDE_FT { FlightPhase::TaxiOut } // cleared to climb
        else { FlightPhase::Preflight }

    } else if s.vertical_speed > 0.0 {
        if low { FlightPhase::Departure } else { FlightPhase::Climb }

    } else if s.vertical_speed < 0.0 {
        if low && dist < LANDING_DISTANCE_NM { FlightPhase::Landing }
        else if dist < APPROACH_DISTANCE_NM { FlightPhase::Approach }
        else { FlightPhase::Descent }

    } else {
        if low && dist < APPROACH_DISTANCE_NM { FlightPhase::Approach } else { FlightPhase::Cruise }
    }
}

/// a named flight plan point with optional FMS constraints
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if="odin_common::is_none")]
    pub altitude: Option<f64>, // ft
    #[serde(default, skip_serializing_if="odin_common::is_none")]
    pub speed: Option<f64>,    // kt
}

impl Waypoint {
    pub fn new (name: impl ToString, lat: f64, lon: f64)->Self {
        Waypoint { name: name.to_string(), lat, lon, altitude: None, speed: None }
    }

    pub fn with_constraints (mut self, altitude: Option<f64>, speed: Option<f64>)->Self {
        self.altitude = altitude;
        self.speed = speed;
        self
    }

    pub fn position (&self)->GeoPos { GeoPos::new( self.lat, self.lon) }
}

impl From<RoutePoint> for Waypoint {
    fn from (rp: RoutePoint)->Self { Waypoint::new( rp.name, rp.lat, rp.lon) }
}

#[derive(Debug,Clone,Serialize)]
pub struct AircraftEvent {
    pub elapsed: f64, // seconds since spawn
    pub message: String
}

/// everything we need to instantiate an aircraft, with all external data already resolved
#[derive(Debug,Clone)]
pub struct AircraftSetup {
    pub callsign: String,
    pub type_code: String,
    pub origin: String,
    pub destination: Option<String>,
    pub destination_pos: Option<GeoPos>,

    pub position: GeoPos,
    pub altitude: f64,
    pub heading: f64,
    pub speed: Option<f64>,

    pub cruise_altitude: Option<f64>,
    pub cruise_speed: Option<f64>,

    pub flight_plan: Vec<Waypoint>,
    pub wind: Wind,
}

/// serializable snapshot of an aircraft
#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct AircraftState {
    pub callsign: String,
    pub type_code: String,
    pub origin: String,
    #[serde(skip_serializing_if="odin_common::is_none")]
    pub destination: Option<String>,

    pub lat: f64,
    pub lon: f64,
    pub altitude: f64,
    pub heading: f64,
    pub speed: f64,
    pub vertical_speed: f64,
    pub ground_speed: f64,
    pub true_airspeed: f64,
    pub mach: f64,
    pub track: f64,
    pub wind_correction_angle: f64,
    pub turn_rate: f64,

    pub target_heading: f64,
    pub target_altitude: f64,
    pub target_speed: f64,
    pub heading_mode: ControlMode,
    pub altitude_mode: ControlMode,
    pub speed_mode: ControlMode,

    pub phase: FlightPhase,
    pub active: bool,

    pub waypoint_index: usize,
    #[serde(skip_serializing_if="odin_common::is_none")]
    pub next_waypoint: Option<String>,
    #[serde(skip_serializing_if="odin_common::is_none")]
    pub distance_to_destination: Option<f64>,
    #[serde(skip_serializing_if="odin_common::is_none")]
    pub top_of_descent_distance: Option<f64>,

    pub wind: Wind,
    pub distance_flown: f64,
    pub elapsed: f64,
}

/// the simulated aircraft
#[derive(Debug,Clone)]
pub struct Aircraft {
    callsign: String,
    type_code: String,
    origin: String,
    destination: Option<String>,
    destination_pos: Option<GeoPos>,

    // kinematic state
    position: GeoPos,
    altitude: f64,        // ft
    heading: Heading,
    speed: f64,           // kt IAS
    vertical_speed: f64,  // ft/min
    true_airspeed: f64,   // kt
    ground_speed: f64,    // kt
    track: f64,           // deg
    wind_correction_angle: f64,
    turn_rate: f64,       // deg/s, positive right

    // targets
    target_heading: Heading,
    target_altitude: f64,
    target_speed: f64,
    heading_mode: ControlMode,
    altitude_mode: ControlMode,
    speed_mode: ControlMode,

    perf: PerformanceRecord,
    flight_plan: Vec<Waypoint>,
    waypoint_index: usize,
    wind: Wind,

    distance_flown: f64,  // NM
    elapsed: f64,         // s
    was_airborne: bool,
    active: bool,
    phase: FlightPhase,
    events: BoundedLog<AircraftEvent>,
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Aircraft( cs: {}, type: {}, pos: {}, alt: {:.0}, hdg: {}, spd: {:.0}, vs: {:.0}, phase: {}",
                self.callsign, self.type_code, self.position, self.altitude, self.heading, self.speed, self.vertical_speed, self.phase)?;
        if let Some(wp) = self.current_waypoint() { write!( f, ", next: {}", wp.name)?; }
        if !self.active { write!( f, ", inactive")?; }
        write!( f, ")")
    }
}

impl Aircraft {
    pub fn new (setup: AircraftSetup, perf: PerformanceRecord)->Self {
        let altitude = clamp( setup.altitude, 0.0, perf.ceiling);
        let airborne = altitude > AIRBORNE_SPAWN_ALTITUDE_FT;

        let target_altitude = clamp( setup.cruise_altitude.unwrap_or(altitude), 0.0, perf.ceiling);
        let requested_speed = setup.cruise_speed.or( setup.cruise_altitude.map(|_| perf.cruise_speed));

        let speed = match setup.speed {
            Some(spd) => spd,
            None => if airborne {
                effective_target_speed( requested_speed.unwrap_or( perf.cruise_speed), altitude, &perf)
            } else {
                perf.min_speed
            }
        };
        let speed = clamp( speed, perf.min_speed, perf.max_speed);
        let target_speed = requested_speed.unwrap_or(speed);

        // airborne spawns are already established in their climb (or descent)
        let vertical_speed = if airborne && (target_altitude - altitude).abs() >= ALTITUDE_CAPTURE_FT {
            if target_altitude > altitude { perf.climb_rate } else { -perf.descent_rate }
        } else {
            0.0
        };

        let heading = Heading::from_degrees( setup.heading);

        let mut ac = Aircraft {
            callsign: setup.callsign,
            type_code: setup.type_code,
            origin: setup.origin,
            destination: setup.destination,
            destination_pos: setup.destination_pos,
            position: setup.position,
            altitude,
            heading,
            speed,
            vertical_speed,
            true_airspeed: 0.0,
            ground_speed: 0.0,
            track: heading.degrees(),
            wind_correction_angle: 0.0,
            turn_rate: 0.0,
            target_heading: heading,
            target_altitude,
            target_speed,
            heading_mode: ControlMode::Fms,
            altitude_mode: ControlMode::Fms,
            speed_mode: ControlMode::Fms,
            perf,
            flight_plan: setup.flight_plan,
            waypoint_index: 0,
            wind: setup.wind,
            distance_flown: 0.0,
            elapsed: 0.0,
            was_airborne: airborne,
            active: true,
            phase: FlightPhase::Preflight,
            events: BoundedLog::new( MAX_AIRCRAFT_EVENTS),
        };

        ac.update_air_data();
        ac.skip_reached_waypoints();
        ac.phase = derive_phase( &ac.phase_inputs());
        ac.log( format!("spawned at {} alt {:.0} hdg {} spd {:.0} ({})", ac.position, ac.altitude, ac.heading, ac.speed, ac.phase));

        ac
    }

    //--- accessors

    pub fn callsign (&self)->&str { self.callsign.as_str() }
    pub fn type_code (&self)->&str { self.type_code.as_str() }
    pub fn origin (&self)->&str { self.origin.as_str() }
    pub fn destination (&self)->Option<&str> { self.destination.as_deref() }

    pub fn position (&self)->GeoPos { self.position }
    pub fn altitude (&self)->f64 { self.altitude }
    pub fn heading (&self)->f64 { self.heading.degrees() }
    pub fn speed (&self)->f64 { self.speed }
    pub fn vertical_speed (&self)->f64 { self.vertical_speed }
    pub fn ground_speed (&self)->f64 { self.ground_speed }
    pub fn true_airspeed (&self)->f64 { self.true_airspeed }
    pub fn turn_rate (&self)->f64 { self.turn_rate }

    pub fn altitude_length (&self)->Length { Length::new::<foot>( self.altitude) }
    pub fn indicated_airspeed (&self)->Velocity { Velocity::new::<knot>( self.speed) }
    pub fn ground_velocity (&self)->Velocity { Velocity::new::<knot>( self.ground_speed) }

    pub fn target_heading (&self)->f64 { self.target_heading.degrees() }
    pub fn target_altitude (&self)->f64 { self.target_altitude }
    pub fn target_speed (&self)->f64 { self.target_speed }

    pub fn heading_mode (&self)->ControlMode { self.heading_mode }
    pub fn altitude_mode (&self)->ControlMode { self.altitude_mode }
    pub fn speed_mode (&self)->ControlMode { self.speed_mode }

    pub fn performance (&self)->&PerformanceRecord { &self.perf }
    pub fn flight_plan (&self)->&[Waypoint] { self.flight_plan.as_slice() }
    pub fn waypoint_index (&self)->usize { self.waypoint_index }
    pub fn current_waypoint (&self)->Option<&Waypoint> { self.flight_plan.get( self.waypoint_index) }

    pub fn wind (&self)->Wind { self.wind }
    pub fn set_wind (&mut self, wind: Wind) {
        self.wind = wind;
        self.log( format!("wind {:03.0}/{:.0}", wind.direction, wind.speed));
    }

    pub fn distance_flown (&self)->f64 { self.distance_flown }
    pub fn elapsed (&self)->f64 { self.elapsed }
    pub fn is_active (&self)->bool { self.active }
    pub fn phase (&self)->FlightPhase { self.phase }
    pub fn events (&self)->&BoundedLog<AircraftEvent> { &self.events }

    pub fn distance_to_destination (&self)->Option<f64> {
        self.destination_pos.map( |dest| distance_nm( self.position, dest))
    }

    /// the target speed after applying the low altitude restriction and the performance envelope
    pub fn effective_target_speed (&self)->f64 {
        effective_target_speed( self.target_speed, self.altitude, &self.perf)
    }

    pub fn state (&self)->AircraftState {
        let distance_to_destination = self.distance_to_destination();
        let top_of_descent_distance = self.destination_pos.map( |_| {
            top_of_descent_distance( self.altitude, 0.0, self.ground_speed, self.perf.descent_rate)
        });

        AircraftState {
            callsign: self.callsign.clone(),
            type_code: self.type_code.clone(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            lat: self.position.lat,
            lon: self.position.lon,
            altitude: self.altitude,
            heading: self.heading.degrees(),
            speed: self.speed,
            vertical_speed: self.vertical_speed,
            ground_speed: self.ground_speed,
            true_airspeed: self.true_airspeed,
            mach: tas_to_mach( self.true_airspeed, self.altitude),
            track: self.track,
            wind_correction_angle: self.wind_correction_angle,
            turn_rate: self.turn_rate,
            target_heading: self.target_heading.degrees(),
            target_altitude: self.target_altitude,
            target_speed: self.target_speed,
            heading_mode: self.heading_mode,
            altitude_mode: self.altitude_mode,
            speed_mode: self.speed_mode,
            phase: self.phase,
            active: self.active,
            waypoint_index: self.waypoint_index,
            next_waypoint: self.current_waypoint().map( |wp| wp.name.clone()),
            distance_to_destination,
            top_of_descent_distance,
            wind: self.wind,
            distance_flown: self.distance_flown,
            elapsed: self.elapsed,
        }
    }

    //--- commands

    /// apply a controller command. Returns false (without changing anything) if the aircraft is not
    /// active, the command parameters are not valid or a direct-to fix is not in the flight plan
    pub fn apply_command (&mut self, cmd: &AircraftCommand)->bool {
        if !self.active || !cmd.is_valid() { return false }

        match cmd {
            AircraftCommand::FlyHeading(hdg) | AircraftCommand::TurnLeftHeading(hdg) | AircraftCommand::TurnRightHeading(hdg) => {
                self.target_heading = Heading::from_degrees(*hdg);
                self.heading_mode = ControlMode::Manual;
            }
            AircraftCommand::Climb(alt) | AircraftCommand::Descend(alt) => {
                self.target_altitude = clamp( *alt, 0.0, self.perf.ceiling);
                self.altitude_mode = ControlMode::Manual;
            }
            AircraftCommand::Speed(spd) => {
                self.target_speed = *spd;
                self.speed_mode = ControlMode::Manual;
            }
            AircraftCommand::DirectTo(fix) => {
                let Some(idx) = self.flight_plan.iter().position( |wp| wp.name == *fix) else {
                    return false
                };
                self.waypoint_index = idx;
                self.heading_mode = ControlMode::Fms;
                self.update_fms_heading();
            }
            AircraftCommand::ResumeNav => {
                self.heading_mode = ControlMode::Fms;
                self.update_fms_heading();
            }
        }

        self.log( cmd.to_string());
        true
    }

    /// take the aircraft out of the simulation
    pub fn deactivate (&mut self, reason: &str) {
        if self.active {
            self.active = false;
            self.vertical_speed = 0.0;
            self.turn_rate = 0.0;
            self.set_phase( derive_phase( &self.phase_inputs()));
            self.log( format!("deactivated: {reason}"));
        }
    }

    //--- the motion model

    /// advance the aircraft by `dt` seconds. Inactive aircraft are not changed
    pub fn tick (&mut self, dt: f64) {
        if !self.active || !(dt > 0.0) { return }

        self.update_fms_heading();
        self.update_heading( dt);
        self.update_speed( dt);
        self.update_altitude( dt);
        self.update_position( dt);
        self.check_waypoint_capture();

        self.elapsed += dt;
        if self.altitude >= GROUND_ALTITUDE_FT { self.was_airborne = true; }

        self.check_arrival();
        self.set_phase( derive_phase( &self.phase_inputs()));
    }

    fn update_fms_heading (&mut self) {
        if self.heading_mode == ControlMode::Fms {
            if let Some(wp) = self.current_waypoint() {
                let wp_pos = wp.position();
                // bearing is undefined at the waypoint itself
                if distance_nm( self.position, wp_pos) > 0.0 {
                    self.target_heading = Heading::from_degrees( bearing_to( self.position, wp_pos));
                }
            }
        }
    }

    fn update_heading (&mut self, dt: f64) {
        let diff = heading_difference( self.heading.degrees(), self.target_heading.degrees());
        let max_turn = STANDARD_TURN_RATE * dt;

        if diff.abs() < HEADING_CAPTURE_DEG {
            self.heading = self.target_heading;
            self.turn_rate = 0.0;
        } else if diff.abs() <= max_turn {
            self.heading = self.target_heading;
            self.turn_rate = diff / dt;
        } else {
            let turn = max_turn.copysign(diff);
            self.heading = self.heading + turn;
            self.turn_rate = turn / dt;
        }
    }

    fn update_speed (&mut self, dt: f64) {
        let target = self.effective_target_speed();
        let diff = target - self.speed;

        if diff.abs() < SPEED_CAPTURE_KT {
            self.speed = target;
        } else if diff > 0.0 {
            self.speed += (self.perf.accel_rate * dt).min(diff);
        } else {
            self.speed -= (self.perf.decel_rate * dt).min(-diff);
        }

        self.speed = clamp( self.speed, self.perf.min_speed, self.perf.max_speed);
    }

    /// vertical speed is whatever closes the altitude gap within this tick, limited by climb/descent rate
    fn update_altitude (&mut self, dt: f64) {
        let diff = self.target_altitude - self.altitude;

        if diff.abs() < ALTITUDE_CAPTURE_FT {
            self.altitude = self.target_altitude;
            self.vertical_speed = 0.0;
        } else {
            let dt_min = dt / SECS_PER_MIN;
            self.vertical_speed = clamp( diff / dt_min, -self.perf.descent_rate, self.perf.climb_rate);
            self.altitude = clamp( self.altitude + self.vertical_speed * dt_min, 0.0, self.perf.ceiling);
        }
    }

    fn update_air_data (&mut self) {
        self.true_airspeed = ias_to_tas( self.speed, self.altitude);
        let gv = calculate_ground_speed( self.true_airspeed, self.heading.degrees(), &self.wind);
        self.ground_speed = gv.ground_speed;
        self.track = gv.track;
        self.wind_correction_angle = gv.wind_correction_angle;
    }

    // note we move along the heading, not the wind corrected track
    fn update_position (&mut self, dt: f64) {
        self.update_air_data();

        let dist = self.ground_speed * dt / SECS_PER_HOUR;
        if dist > 0.0 {
            self.position = destination_point( self.position, self.heading.degrees(), dist);
            self.distance_flown += dist;
        }
    }

    fn check_waypoint_capture (&mut self) {
        if let Some(wp) = self.current_waypoint() {
            if distance_nm( self.position, wp.position()) < WAYPOINT_CAPTURE_NM {
                let name = wp.name.clone();
                self.advance_waypoint();
                self.log( format!("passed {name}"));
            }
        }
    }

    /// advance to the next waypoint and pick up its constraints for FMS controlled axes
    fn advance_waypoint (&mut self) {
        self.waypoint_index += 1;

        if let Some(wp) = self.flight_plan.get( self.waypoint_index) {
            if self.altitude_mode == ControlMode::Fms {
                if let Some(alt) = wp.altitude { self.target_altitude = clamp( alt, 0.0, self.perf.ceiling); }
            }
            if self.speed_mode == ControlMode::Fms {
                if let Some(spd) = wp.speed { self.target_speed = spd; }
            }
        }
    }

    /// spawning on top of the first waypoints (usually the origin) counts as having passed them
    fn skip_reached_waypoints (&mut self) {
        while let Some(wp) = self.current_waypoint() {
            if distance_nm( self.position, wp.position()) < WAYPOINT_CAPTURE_NM {
                self.advance_waypoint();
            } else {
                break
            }
        }
    }

    fn check_arrival (&mut self) {
        let plan_done = !self.flight_plan.is_empty() && self.waypoint_index >= self.flight_plan.len();
        if plan_done && self.was_airborne && self.altitude < GROUND_ALTITUDE_FT {
            self.deactivate( "arrived");
        }
    }

    fn phase_inputs (&self)->PhaseInputs {
        PhaseInputs {
            active: self.active,
            altitude: self.altitude,
            vertical_speed: self.vertical_speed,
            target_altitude: self.target_altitude,
            was_airborne: self.was_airborne,
            distance_to_destination: self.distance_to_destination(),
        }
    }

    fn set_phase (&mut self, phase: FlightPhase) {
        if phase != self.phase {
            let msg = format!("{} -> {}", self.phase, phase);
            self.phase = phase;
            self.log( msg);
        }
    }

    fn log (&mut self, message: String) {
        self.events.push( AircraftEvent { elapsed: self.elapsed, message });
    }
}

/// requested speed limited by the 250kt restriction below 10,000ft and the aircraft envelope
pub fn effective_target_speed (requested: f64, altitude: f64, perf: &PerformanceRecord)->f64 {
    let speed = if altitude < SPEED_RESTRICTION_ALTITUDE_FT { requested.min( SPEED_RESTRICTION_KT) } else { requested };
    clamp( speed, perf.min_speed, perf.max_speed)
}
