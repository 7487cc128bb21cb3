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

//! physical constants and engine tuning values.
//! Units follow aviation conventions: feet for altitude, knots for speeds, nautical miles for
//! distances, ft/min for vertical speeds and seconds for time steps

//--- earth and unit conversions

/// mean earth radius in nautical miles (used by all great circle computations)
pub const EARTH_RADIUS_NM: f64 = 3440.065;

pub const FT_PER_NM: f64 = 6076.12;
pub const M_PER_FT: f64 = 0.3048;
pub const M_PER_NM: f64 = 1852.0;
pub const FPM_PER_KT: f64 = FT_PER_NM / 60.0; // 1 kt expressed in ft/min

pub const SECS_PER_HOUR: f64 = 3600.0;
pub const SECS_PER_MIN: f64 = 60.0;

//--- ISA temperature model

/// sea level standard temperature in Kelvin
pub const ISA_SEA_LEVEL_TEMP_K: f64 = 288.15;

/// temperature lapse rate in Kelvin per foot (6.5 K/km)
pub const ISA_LAPSE_RATE_K_PER_FT: f64 = 0.0019812;

/// altitude above which the ISA temperature stays constant
pub const ISA_TROPOPAUSE_FT: f64 = 36089.0;
pub const ISA_TROPOPAUSE_TEMP_K: f64 = 216.65;

/// speed of sound in knots is `SPEED_OF_SOUND_COEFF_KT * sqrt(T[K])` (sqrt(γ·R) converted to kt)
pub const SPEED_OF_SOUND_COEFF_KT: f64 = 38.967854;

/// altitude scale of the linear IAS/TAS density correction `TAS = IAS * (1 + alt/50000)`
pub const TAS_DENSITY_SCALE_FT: f64 = 50000.0;

//--- control model

/// standard rate turn in degrees per second
pub const STANDARD_TURN_RATE: f64 = 3.0;

pub const HEADING_CAPTURE_DEG: f64 = 2.0;
pub const SPEED_CAPTURE_KT: f64 = 5.0;
pub const ALTITUDE_CAPTURE_FT: f64 = 100.0;
pub const WAYPOINT_CAPTURE_NM: f64 = 1.5;

/// max indicated airspeed below `SPEED_RESTRICTION_ALTITUDE_FT`
pub const SPEED_RESTRICTION_KT: f64 = 250.0;
pub const SPEED_RESTRICTION_ALTITUDE_FT: f64 = 10000.0;

//--- phase classification thresholds

/// below this altitude aircraft are considered to be on the ground
pub const GROUND_ALTITUDE_FT: f64 = 100.0;

/// climbing aircraft below this altitude are in departure phase
pub const DEPARTURE_ALTITUDE_FT: f64 = 3000.0;

pub const APPROACH_DISTANCE_NM: f64 = 30.0;
pub const LANDING_DISTANCE_NM: f64 = 5.0;

/// aircraft spawned above this altitude start airborne and climbing towards their cruise targets
pub const AIRBORNE_SPAWN_ALTITUDE_FT: f64 = 1000.0;

//--- bounded logs

pub const MAX_SIM_EVENTS: usize = 100;
pub const MAX_AIRCRAFT_EVENTS: usize = 50;
