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

use std::{fmt, str::FromStr};
use serde::{Serialize,Deserialize};

use crate::errors::{OdinFlightSimError, Result, parse_error};

/// controller instructions that can be issued to a simulated aircraft
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum AircraftCommand {
    FlyHeading(f64),        // deg
    TurnLeftHeading(f64),   // deg - same state change as FlyHeading, only reported differently
    TurnRightHeading(f64),  // deg
    Climb(f64),             // ft
    Descend(f64),           // ft
    Speed(f64),             // kt
    DirectTo(String),       // name of a flight plan waypoint
    ResumeNav,
}

impl AircraftCommand {

    /// parse the command token / parameter pairs we get from the transport layer, e.g.
    /// `("CLIMB", Some("35000"))` or `("DIRECT", Some("FIXX"))`.
    /// Tokens are case insensitive, '-' and '_' are interchangeable
    pub fn parse (token: &str, param: Option<&str>)->Result<Self> {
        let token = token.trim().to_ascii_uppercase().replace('-', "_");
        let param = param.map(|s| s.trim()).filter(|s| !s.is_empty());

        match token.as_str() {
            "FLY_HEADING" | "HEADING" => Ok( AircraftCommand::FlyHeading( parse_heading(&token, param)?)),
            "TURN_LEFT_HEADING" | "TURN_LEFT" => Ok( AircraftCommand::TurnLeftHeading( parse_heading(&token, param)?)),
            "TURN_RIGHT_HEADING" | "TURN_RIGHT" => Ok( AircraftCommand::TurnRightHeading( parse_heading(&token, param)?)),
            "CLIMB" => Ok( AircraftCommand::Climb( parse_altitude(&token, param)?)),
            "DESCEND" => Ok( AircraftCommand::Descend( parse_altitude(&token, param)?)),
            "SPEED" => Ok( AircraftCommand::Speed( parse_speed(&token, param)?)),
            "DIRECT" | "DIRECT_TO" => {
                let fix = param.ok_or_else( || parse_error!("missing fix for {}", token))?;
                Ok( AircraftCommand::DirectTo( fix.to_ascii_uppercase()))
            }
            "RESUME" | "RESUME_NAV" => Ok( AircraftCommand::ResumeNav),
            _ => Err( parse_error!("unknown command {}", token))
        }
    }

    /// are the numeric parameters usable
    pub fn is_valid (&self)->bool {
        match self {
            AircraftCommand::FlyHeading(h) | AircraftCommand::TurnLeftHeading(h) | AircraftCommand::TurnRightHeading(h) => h.is_finite(),
            AircraftCommand::Climb(alt) | AircraftCommand::Descend(alt) => alt.is_finite() && *alt >= 0.0,
            AircraftCommand::Speed(spd) => spd.is_finite() && *spd > 0.0,
            AircraftCommand::DirectTo(fix) => !fix.is_empty(),
            AircraftCommand::ResumeNav => true
        }
    }
}

fn parse_number (token: &str, param: Option<&str>)->Result<f64> {
    let s = param.ok_or_else( || parse_error!("missing parameter for {}", token))?;
    let v: f64 = s.parse().map_err( |_| parse_error!("invalid parameter for {}: '{}'", token, s))?;
    if v.is_finite() { Ok(v) } else { Err( parse_error!("invalid parameter for {}: '{}'", token, s)) }
}

fn parse_heading (token: &str, param: Option<&str>)->Result<f64> {
    parse_number( token, param)
}

fn parse_altitude (token: &str, param: Option<&str>)->Result<f64> {
    let alt = parse_number( token, param)?;
    if alt < 0.0 { return Err( parse_error!("negative altitude for {}", token)) }
    Ok(alt)
}

fn parse_speed (token: &str, param: Option<&str>)->Result<f64> {
    let spd = parse_number( token, param)?;
    if spd <= 0.0 { return Err( parse_error!("non-positive speed for {}", token)) }
    Ok(spd)
}

/// "<TOKEN> [<PARAM>]" format, e.g. "FLY_HEADING 270"
impl FromStr for AircraftCommand {
    type Err = OdinFlightSimError;

    fn from_str (s: &str)->Result<Self> {
        let mut parts = s.split_whitespace();
        let token = parts.next().ok_or_else( || parse_error!("empty command"))?;
        let param = parts.next();
        if parts.next().is_some() {
            return Err( parse_error!("too many parameters in '{}'", s))
        }
        AircraftCommand::parse( token, param)
    }
}

// this is also the wording of the aircraft event log
impl fmt::Display for AircraftCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AircraftCommand::FlyHeading(h) => write!( f, "fly heading {:03.0}", h),
            AircraftCommand::TurnLeftHeading(h) => write!( f, "turn left heading {:03.0}", h),
            AircraftCommand::TurnRightHeading(h) => write!( f, "turn right heading {:03.0}", h),
            AircraftCommand::Climb(alt) => write!( f, "climb and maintain {:.0}", alt),
            AircraftCommand::Descend(alt) => write!( f, "descend and maintain {:.0}", alt),
            AircraftCommand::Speed(spd) => write!( f, "maintain {:.0} knots", spd),
            AircraftCommand::DirectTo(fix) => write!( f, "proceed direct {}", fix),
            AircraftCommand::ResumeNav => write!( f, "resume own navigation"),
        }
    }
}
