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

use std::{collections::HashMap, path::Path, sync::Arc};
use lazy_static::lazy_static;
use serde::{Serialize,Deserialize};

use crate::errors::{OdinFlightSimError, Result, config_error};

/// the built-in catalog, which is the `configs/aircraft_types.ron` this crate was compiled with
pub const BUILTIN_CATALOG_RON: &str = include_str!("../configs/aircraft_types.ron");

lazy_static! {
    static ref BUILTIN_CATALOG: Arc<PerformanceCatalog> = Arc::new(
        PerformanceCatalog::from_ron_str( BUILTIN_CATALOG_RON).expect("invalid built-in aircraft_types.ron")
    );
}

/// per aircraft type performance envelope
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct PerformanceRecord {
    pub type_code: String,
    pub ceiling: f64,       // ft
    pub climb_rate: f64,    // ft/min
    pub descent_rate: f64,  // ft/min (positive)
    pub accel_rate: f64,    // kt/s
    pub decel_rate: f64,    // kt/s (positive)
    pub min_speed: f64,     // kt IAS
    pub max_speed: f64,     // kt IAS
    pub cruise_speed: f64,  // kt IAS

    #[serde(default, skip_serializing_if="odin_common::is_none")]
    pub cruise_mach: Option<f64>,
}

impl PerformanceRecord {
    fn check (&self)->Result<()> {
        let positive = [self.ceiling, self.climb_rate, self.descent_rate, self.accel_rate, self.decel_rate, self.min_speed];
        if positive.iter().any( |v| !v.is_finite() || *v <= 0.0) {
            return Err( config_error!("non-positive performance value for type {}", self.type_code))
        }
        if !(self.min_speed <= self.cruise_speed && self.cruise_speed <= self.max_speed) {
            return Err( config_error!("inconsistent speed envelope for type {}", self.type_code))
        }
        Ok(())
    }

    /// cruise speed clamped to the envelope
    pub fn clamp_speed (&self, speed: f64)->f64 { speed.clamp( self.min_speed, self.max_speed) }
}

/// the serialized catalog format
#[derive(Debug,Serialize,Deserialize)]
pub struct AircraftCatalog {
    pub default_type: String,
    pub types: Vec<PerformanceRecord>
}

/// lookup table for aircraft performance, keyed by ICAO type designator
#[derive(Debug,Clone)]
pub struct PerformanceCatalog {
    default_type: String,
    records: HashMap<String,PerformanceRecord>,
}

impl PerformanceCatalog {
    /// the process-wide built-in catalog (parsed once)
    pub fn builtin ()->Arc<PerformanceCatalog> {
        BUILTIN_CATALOG.clone()
    }

    pub fn from_records (default_type: impl ToString, types: Vec<PerformanceRecord>)->Result<Self> {
        let default_type = default_type.to_string();
        let mut records = HashMap::with_capacity( types.len());

        for rec in types {
            rec.check()?;
            if records.contains_key( &rec.type_code) {
                return Err( config_error!("duplicate aircraft type {}", rec.type_code))
            }
            records.insert( rec.type_code.clone(), rec);
        }

        if !records.contains_key( &default_type) {
            return Err( config_error!("default aircraft type {} not in catalog", default_type))
        }

        Ok( PerformanceCatalog { default_type, records } )
    }

    pub fn from_ron_str (s: &str)->Result<Self> {
        let catalog: AircraftCatalog = ron::from_str(s)?;
        Self::from_records( catalog.default_type, catalog.types)
    }

    pub fn from_path (path: impl AsRef<Path>)->Result<Self> {
        let s = std::fs::read_to_string( path.as_ref())?;
        Self::from_ron_str( &s)
    }

    pub fn get (&self, type_code: &str)->Option<&PerformanceRecord> {
        self.records.get( type_code)
    }

    pub fn default_record (&self)->&PerformanceRecord {
        &self.records[&self.default_type] // checked in ctor
    }

    /// the record for `type_code` or (if there is none) the default record. The second tuple
    /// element tells us if we had to fall back
    pub fn get_or_default (&self, type_code: &str)->(&PerformanceRecord,bool) {
        match self.records.get( type_code) {
            Some(rec) => (rec, false),
            None => (self.default_record(), true)
        }
    }

    pub fn contains (&self, type_code: &str)->bool { self.records.contains_key(type_code) }

    pub fn len (&self)->usize { self.records.len() }

    pub fn is_empty (&self)->bool { self.records.is_empty() }

    pub fn type_codes (&self)->Vec<&str> {
        let mut codes: Vec<&str> = self.records.keys().map( |k| k.as_str()).collect();
        codes.sort();
        codes
    }
}
