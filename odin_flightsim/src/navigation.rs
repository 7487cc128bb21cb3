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

//! the interface to navigation data (airports, fixes, routes). Real deployments resolve these
//! through a remote navigation data service, the engine itself only depends on the `NavResolver`
//! trait. `StaticNavData` is a deterministic in-memory implementation that is initialized from
//! RON data

use std::{collections::HashMap, path::Path};
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::foot};

use crate::flight_math::{GeoPos, distance_nm};
use crate::errors::{OdinFlightSimError, Result, config_error};

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Airport {
    pub icao: String,
    pub lat: f64,
    pub lon: f64,
    pub elevation_ft: f64,
    pub name: String,
}

impl Airport {
    pub fn position (&self)->GeoPos { GeoPos::new( self.lat, self.lon) }
    pub fn elevation (&self)->Length { Length::new::<foot>( self.elevation_ft) }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Fix {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// a resolved route element
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct RoutePoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub cumulative_distance_nm: f64,
}

impl RoutePoint {
    pub fn position (&self)->GeoPos { GeoPos::new( self.lat, self.lon) }
}

/// the navigation data lookup used when spawning aircraft.
/// Implementations have to be deterministic for a given data set - absent data is reported as
/// `None` / empty route, never substituted
pub trait NavResolver: Send + Sync {
    fn get_airport (&self, icao: &str)->Option<Airport>;

    /// resolve a route string between origin and destination into an ordered list of points,
    /// starting with the origin and ending with the destination. Empty if anything can't be resolved
    fn resolve_route (&self, origin: &str, destination: &str, route: &str)->Vec<RoutePoint>;
}

/// accumulate distances along a list of named positions
pub fn to_route_points (points: Vec<(String,GeoPos)>)->Vec<RoutePoint> {
    let mut dist = 0.0;
    let mut last: Option<GeoPos> = None;

    points.into_iter().map( |(name,pos)| {
        if let Some(prev) = last { dist += distance_nm( prev, pos); }
        last = Some(pos);
        RoutePoint { name, lat: pos.lat, lon: pos.lon, cumulative_distance_nm: dist }
    }).collect()
}

/// the serialized navigation data format
#[derive(Debug,Default,Serialize,Deserialize)]
pub struct NavData {
    pub airports: Vec<Airport>,
    #[serde(default)]
    pub fixes: Vec<Fix>,
}

/// in-memory navigation data
#[derive(Debug,Clone,Default)]
pub struct StaticNavData {
    airports: HashMap<String,Airport>,
    fixes: HashMap<String,Fix>,
}

impl StaticNavData {
    pub fn new (data: NavData)->Self {
        let airports = data.airports.into_iter().map( |a| (a.icao.clone(), a)).collect();
        let fixes = data.fixes.into_iter().map( |f| (f.name.clone(), f)).collect();
        StaticNavData { airports, fixes }
    }

    pub fn from_ron_str (s: &str)->Result<Self> {
        let data: NavData = ron::from_str(s)?;
        if data.airports.is_empty() {
            return Err( config_error!("no airports in navigation data"))
        }
        Ok( Self::new(data))
    }

    pub fn from_path (path: impl AsRef<Path>)->Result<Self> {
        let s = std::fs::read_to_string( path.as_ref())?;
        Self::from_ron_str( &s)
    }

    pub fn add_airport (&mut self, airport: Airport) {
        self.airports.insert( airport.icao.clone(), airport);
    }

    pub fn add_fix (&mut self, fix: Fix) {
        self.fixes.insert( fix.name.clone(), fix);
    }

    pub fn fix (&self, name: &str)->Option<&Fix> { self.fixes.get(name) }

    pub fn n_airports (&self)->usize { self.airports.len() }
    pub fn n_fixes (&self)->usize { self.fixes.len() }

    /// route elements can be fixes or airports (fixes take precedence), "DCT" is ignored
    fn lookup_route_element (&self, name: &str)->Option<GeoPos> {
        if let Some(fix) = self.fixes.get(name) {
            Some( GeoPos::new( fix.lat, fix.lon))
        } else {
            self.airports.get(name).map( |a| a.position())
        }
    }
}

impl NavResolver for StaticNavData {
    fn get_airport (&self, icao: &str)->Option<Airport> {
        self.airports.get(icao).cloned()
    }

    fn resolve_route (&self, origin: &str, destination: &str, route: &str)->Vec<RoutePoint> {
        let (Some(orig), Some(dest)) = (self.airports.get(origin), self.airports.get(destination)) else {
            return Vec::new()
        };

        let mut points: Vec<(String,GeoPos)> = vec![ (orig.icao.clone(), orig.position()) ];

        for elem in route.split_whitespace() {
            if elem == "DCT" || elem == origin || elem == destination { continue }

            match self.lookup_route_element( elem) {
                Some(pos) => points.push( (elem.to_string(), pos)),
                None => return Vec::new()
            }
        }
        points.push( (dest.icao.clone(), dest.position()));

        to_route_points( points)
    }
}
