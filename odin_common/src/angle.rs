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

//! normalized angles as they are used for geodetic coordinates and aircraft headings.
//! The free functions are the primitives, the `Heading` newtype makes sure a value that was
//! normalized once stays normalized through arithmetic.

use std::{fmt, ops, cmp};
use serde::{Serialize,Deserialize,Serializer,Deserializer};

/// normalize degrees into [0,360)
#[inline]
pub fn normalize_360 (d: f64) -> f64 {
    let x = d % 360.0;
    let x = if x < 0.0 { 360.0 + x } else { x };
    if x >= 360.0 { 0.0 } else { x } // tiny negative inputs round up to 360.0
}

/// normalize degrees into (-180,180]
#[inline]
pub fn normalize_180 (d: f64) -> f64 {
    let x = normalize_360(d);
    if x > 180.0 { x - 360.0 } else { x }
}

/// normalize latitude degrees into [-90,90] (reflecting over the poles)
#[inline]
pub fn normalize_90 (d: f64) -> f64 {
    let x = normalize_180(d);

    if x < -90.0 { -180.0 - x }
    else if x > 90.0 { 180.0 - x }
    else { x }
}

/// a compass direction in degrees [0,360)
#[derive(Clone,Copy,Default)]
pub struct Heading(f64);

impl Heading {
    #[inline] pub fn from_degrees (deg: f64)->Self { Heading( normalize_360(deg)) }
    #[inline] pub fn from_radians (rad: f64)->Self { Heading( normalize_360(rad.to_degrees())) }

    #[inline] pub fn degrees (&self)->f64 { self.0 }
    #[inline] pub fn radians (&self)->f64 { self.0.to_radians() }

    #[inline] pub fn sin (&self)->f64 { self.0.to_radians().sin() }
    #[inline] pub fn cos (&self)->f64 { self.0.to_radians().cos() }

    /// signed shortest turn (degrees in (-180,180]) that gets us from self to `other`.
    /// positive values are right (clockwise) turns
    #[inline]
    pub fn turn_to (&self, other: Heading)->f64 { normalize_180( other.0 - self.0) }

    /// the reciprocal direction
    #[inline]
    pub fn reciprocal (&self)->Heading { Heading::from_degrees( self.0 + 180.0) }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:03.0}", self.0) }
}

impl fmt::Debug for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Heading({})", self.0) }
}

impl From<Heading> for f64 {
    fn from (h: Heading)->Self { h.0 }
}

impl cmp::PartialEq for Heading {
    fn eq (&self, other: &Self)->bool { self.0 == other.0 }
}

impl cmp::PartialOrd for Heading {
    fn partial_cmp (&self, other: &Self)->Option<cmp::Ordering> { self.0.partial_cmp(&other.0) }
}

// adding/subtracting degrees turns the heading
impl ops::Add<f64> for Heading {
    type Output = Self;
    fn add (self, rhs: f64)->Self::Output { Heading::from_degrees( self.0 + rhs) }
}
impl ops::Sub<f64> for Heading {
    type Output = Self;
    fn sub (self, rhs: f64)->Self::Output { Heading::from_degrees( self.0 - rhs) }
}

//--- serde support - serialized as plain degrees, deserialization normalizes

impl Serialize for Heading {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for Heading {
    fn deserialize<D>(deserializer: D) -> Result<Heading, D::Error> where D: Deserializer<'de> {
        let deg = f64::deserialize(deserializer)?;
        if deg.is_finite() {
            Ok( Heading::from_degrees(deg))
        } else {
            Err( serde::de::Error::custom( format!("not a valid heading: {deg}")))
        }
    }
}
