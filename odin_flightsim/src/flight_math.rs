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
#![allow(uncommon_codepoints,non_snake_case)]

//! pure geodesic and kinematic functions of the flight model.
//! All functions are stateless and deterministic, i.e. identical inputs produce bit-identical
//! results. Angles are in degrees, distances in nautical miles, altitudes in feet, speeds in knots
//! and vertical speeds in ft/min unless noted otherwise

use std::fmt;
use serde::{Serialize,Deserialize};
use odin_common::{sin, cos, asin, atan2, sqrt, pow2, deg, rad, angle::{normalize_360, normalize_180, normalize_90}};

use crate::constants::*;

/// a position on the earth surface (geodetic degrees)
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoPos {
    pub lat: f64,
    pub lon: f64
}

impl GeoPos {
    pub fn new (lat: f64, lon: f64)->Self { GeoPos { lat, lon } }
}

impl fmt::Display for GeoPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.5},{:.5}]", self.lat, self.lon)
    }
}

/// wind vector given as speed and the direction the wind is blowing *from*
#[derive(Debug,Clone,Copy,PartialEq,Default,Serialize,Deserialize)]
pub struct Wind {
    pub speed: f64,      // kt
    pub direction: f64   // deg true, from
}

impl Wind {
    pub fn new (speed: f64, direction: f64)->Self { Wind { speed, direction: normalize_360(direction) } }
    pub fn calm ()->Self { Wind::default() }
}

/// result of composing true airspeed and wind
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct GroundVector {
    pub ground_speed: f64,          // kt
    pub track: f64,                 // deg true
    pub wind_correction_angle: f64  // deg, positive means crab to the right
}

/* #region great circle *********************************************************************************/

/// haversine great circle distance
pub fn distance_nm (from: GeoPos, to: GeoPos)->f64 {
    let φ1 = rad(from.lat);
    let φ2 = rad(to.lat);
    let Δφ = rad(to.lat - from.lat);
    let Δλ = rad(to.lon - from.lon);

    let a = pow2(sin(Δφ/2.0)) + cos(φ1) * cos(φ2) * pow2(sin(Δλ/2.0));
    let c = 2.0 * atan2( sqrt(a), sqrt(1.0 - a));

    EARTH_RADIUS_NM * c
}

/// initial great circle bearing in [0,360)
pub fn bearing_to (from: GeoPos, to: GeoPos)->f64 {
    let φ1 = rad(from.lat);
    let φ2 = rad(to.lat);
    let Δλ = rad(to.lon - from.lon);

    let y = sin(Δλ) * cos(φ2);
    let x = cos(φ1) * sin(φ2) - sin(φ1) * cos(φ2) * cos(Δλ);

    normalize_heading( deg( atan2(y,x)))
}

/// direct geodesic problem on the sphere: the point reached from `from` after travelling
/// `distance` nautical miles along the initial great circle `bearing`
pub fn destination_point (from: GeoPos, bearing: f64, distance: f64)->GeoPos {
    let δ = distance / EARTH_RADIUS_NM;
    let θ = rad(bearing);
    let φ1 = rad(from.lat);
    let λ1 = rad(from.lon);

    let sin_φ2 = sin(φ1) * cos(δ) + cos(φ1) * sin(δ) * cos(θ);
    let φ2 = asin( sin_φ2.clamp(-1.0, 1.0));
    let λ2 = λ1 + atan2( sin(θ) * sin(δ) * cos(φ1), cos(δ) - sin(φ1) * sin_φ2);

    GeoPos { lat: normalize_90( deg(φ2)), lon: normalize_180( deg(λ2)) }
}

/* #endregion great circle */

/* #region headings *************************************************************************************/

/// heading in [0,360) for any finite input
#[inline]
pub fn normalize_heading (hdg: f64)->f64 { normalize_360(hdg) }

/// signed shortest turn in (-180,180] to get from heading `from` to heading `to`.
/// Positive values are right turns
#[inline]
pub fn heading_difference (from: f64, to: f64)->f64 { normalize_180( to - from) }

/* #endregion headings */

/* #region airspeeds ************************************************************************************/

/// simplified linear density correction
#[inline]
pub fn ias_to_tas (ias: f64, altitude: f64)->f64 { ias * (1.0 + altitude / TAS_DENSITY_SCALE_FT) }

#[inline]
pub fn tas_to_ias (tas: f64, altitude: f64)->f64 { tas / (1.0 + altitude / TAS_DENSITY_SCALE_FT) }

/// ISA temperature in Kelvin (constant above the tropopause)
pub fn isa_temperature (altitude: f64)->f64 {
    if altitude < ISA_TROPOPAUSE_FT {
        ISA_SEA_LEVEL_TEMP_K - ISA_LAPSE_RATE_K_PER_FT * altitude
    } else {
        ISA_TROPOPAUSE_TEMP_K
    }
}

pub fn speed_of_sound (altitude: f64)->f64 {
    SPEED_OF_SOUND_COEFF_KT * sqrt( isa_temperature(altitude))
}

#[inline]
pub fn tas_to_mach (tas: f64, altitude: f64)->f64 { tas / speed_of_sound(altitude) }

#[inline]
pub fn mach_to_tas (mach: f64, altitude: f64)->f64 { mach * speed_of_sound(altitude) }

/// compose true airspeed along `heading` with the wind vector
pub fn calculate_ground_speed (tas: f64, heading: f64, wind: &Wind)->GroundVector {
    let h = rad(heading);
    let wd = rad(wind.direction);

    // wind blows *towards* direction + 180
    let north = tas * cos(h) - wind.speed * cos(wd);
    let east = tas * sin(h) - wind.speed * sin(wd);

    let ground_speed = sqrt( north*north + east*east);
    let track = if ground_speed > 0.0 { normalize_heading( deg( atan2(east,north))) } else { normalize_heading(heading) };

    let wind_correction_angle = if tas > 0.0 && wind.speed > 0.0 {
        deg( asin( (wind.speed * sin(wd - h) / tas).clamp(-1.0, 1.0)))
    } else {
        0.0
    };

    GroundVector { ground_speed, track, wind_correction_angle }
}

/* #endregion airspeeds */

/* #region vertical profile *****************************************************************************/

/// vertical speed (ft/min) needed to change altitude by `altitude_change` over `distance` at `ground_speed`.
/// Returns 0 if the distance can't be covered
pub fn required_vertical_speed (altitude_change: f64, distance: f64, ground_speed: f64)->f64 {
    if distance <= 0.0 || ground_speed <= 0.0 { return 0.0 }

    let minutes = distance / ground_speed * SECS_PER_MIN;
    altitude_change / minutes
}

/// distance (NM) before a waypoint at which a descent from `current_altitude` to `target_altitude`
/// has to start, given ground speed and descent rate (ft/min). Returns 0 if no descent is required
pub fn top_of_descent_distance (current_altitude: f64, target_altitude: f64, ground_speed: f64, descent_rate: f64)->f64 {
    let altitude_to_lose = current_altitude - target_altitude;
    if altitude_to_lose <= 0.0 || descent_rate <= 0.0 { return 0.0 }

    let minutes = altitude_to_lose / descent_rate;
    ground_speed * minutes / SECS_PER_MIN
}

/* #endregion vertical profile */

#[inline]
pub fn lerp (a: f64, b: f64, t: f64)->f64 { a + (b - a) * t }

/// unlike `f64::clamp` this does not panic if min > max (min wins)
#[inline]
pub fn clamp (v: f64, min: f64, max: f64)->f64 {
    if v > max { if max < min { min } else { max } }
    else if v < min { min }
    else { v }
}
