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

//! scripted simulation runs: a scenario spawns a set of aircraft, advances the simulation in fixed
//! steps for a given duration and issues controller commands at given simulation times

use std::{str::FromStr, time::Duration};
use serde::{Serialize,Deserialize};
use tracing::{debug,info,warn};
use odin_common::is_none;

use crate::controller::{SimController, SimId, SimulationConfig, SimulationSnapshot, SpawnParams, TickResult};
use crate::command::AircraftCommand;
use crate::errors::{OdinFlightSimError, Result, config_error};

/// a controller command that is issued once simulation time reaches `at` seconds
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct TimedCommand {
    pub at: f64,
    pub callsign: String,
    pub command: String, // "<TOKEN> [<PARAM>]", e.g. "CLIMB 20000"
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,

    pub tick_interval: f64,  // s
    pub duration: f64,       // s

    #[serde(default, skip_serializing_if="is_none")]
    pub report_interval: Option<f64>, // s, no intermediate reports if not set

    pub aircraft: Vec<SpawnParams>,

    #[serde(default)]
    pub commands: Vec<TimedCommand>,
}

impl ScenarioConfig {
    pub fn check (&self)->Result<()> {
        if !(self.tick_interval.is_finite() && self.tick_interval > 0.0) {
            return Err( config_error!("invalid tick interval {}", self.tick_interval))
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err( config_error!("invalid duration {}", self.duration))
        }
        if let Some(ri) = self.report_interval {
            if !(ri.is_finite() && ri > 0.0) { return Err( config_error!("invalid report interval {}", ri)) }
        }
        Ok(())
    }

    pub fn n_ticks (&self)->u64 { (self.duration / self.tick_interval).ceil() as u64 }

    pub fn simulated_duration (&self)->Duration { Duration::from_secs_f64( self.n_ticks() as f64 * self.tick_interval) }
}

#[derive(Debug,Clone,Serialize)]
pub struct ScenarioOutcome {
    pub sim_id: SimId,
    pub n_ticks: u64,
    pub n_commands: usize,
    pub n_rejected_commands: usize,
    pub snapshot: SimulationSnapshot,
}

/// create a new simulation for `scenario` within `controller` and run it to completion. The
/// `report` callback is invoked with the initial snapshot, every `report_interval` and after the
/// last tick
pub fn run_scenario<F> (controller: &mut SimController, scenario: &ScenarioConfig, mut report: F)->Result<ScenarioOutcome>
    where F: FnMut(&SimulationSnapshot)
{
    scenario.check()?;

    // parse all commands before we start so that we don't fail halfway through
    let mut commands: Vec<(f64,&str,AircraftCommand)> = Vec::with_capacity( scenario.commands.len());
    for tc in &scenario.commands {
        let cmd = AircraftCommand::from_str( &tc.command)?;
        commands.push( (tc.at, tc.callsign.as_str(), cmd));
    }
    commands.sort_by( |a,b| a.0.total_cmp( &b.0)); // stable, keeps config order for same time

    let sim_id = controller.create_simulation( scenario.simulation.clone());
    for params in &scenario.aircraft {
        controller.spawn_aircraft( sim_id, params.clone())?;
    }

    let Some(snapshot) = controller.snapshot( sim_id) else {
        return Err( OdinFlightSimError::UnknownSimulation( sim_id.to_string()))
    };
    report( &snapshot);

    let n_ticks = scenario.n_ticks();
    let dt = scenario.tick_interval;
    info!("running scenario {} for {} ticks of {}s", snapshot.name, n_ticks, dt);

    let mut pending = commands.into_iter().peekable();
    let mut n_rejected = 0;
    let mut last_report = 0.0;
    let mut last_snapshot = snapshot;

    for _ in 0..n_ticks {
        let elapsed = last_snapshot.elapsed;
        while let Some((_, callsign, cmd)) = pending.next_if( |(at,_,_)| *at <= elapsed) {
            if !controller.issue_command( sim_id, callsign, cmd.clone()) {
                warn!("command '{}' for {} rejected at {:.0}s", cmd, callsign, elapsed);
                n_rejected += 1;
            }
        }

        match controller.tick( sim_id, dt) {
            TickResult::Advanced { snapshot } => last_snapshot = snapshot,
            TickResult::Rejected { reason } => return Err( OdinFlightSimError::OpFailedError( format!("tick rejected: {reason}")))
        }

        if let Some(ri) = scenario.report_interval {
            if last_snapshot.elapsed - last_report >= ri {
                report( &last_snapshot);
                last_report = last_snapshot.elapsed;
            }
        }
    }

    // commands scheduled after the end of the run are never issued
    let n_unissued = pending.count();
    if n_unissued > 0 { debug!("{} commands scheduled after end of scenario", n_unissued) }

    if last_report < last_snapshot.elapsed {
        report( &last_snapshot);
    }

    Ok( ScenarioOutcome {
        sim_id,
        n_ticks,
        n_commands: scenario.commands.len() - n_unissued,
        n_rejected_commands: n_rejected,
        snapshot: last_snapshot
    })
}
