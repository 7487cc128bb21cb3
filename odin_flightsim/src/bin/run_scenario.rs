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

use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use odin_flightsim::{
    load_config, PerformanceCatalog, StaticNavData, SimController, SimulationSnapshot,
    scenario::{ScenarioConfig, run_scenario}
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "run a flight simulation scenario and report aircraft states")]
pub struct Args {
    /// RON scenario file
    #[arg(short,long, default_value = "odin_flightsim/configs/scenario.ron")]
    pub scenario: String,

    /// RON navigation data file
    #[arg(short,long, default_value = "odin_flightsim/configs/navdata.ron")]
    pub navdata: String,

    /// optional RON aircraft performance catalog (built-in catalog if not set)
    #[arg(short,long)]
    pub catalog: Option<String>,

    /// print final snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

fn main()->Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let scenario: ScenarioConfig = load_config( &args.scenario)?;
    let navdata = StaticNavData::from_path( &args.navdata)?;
    let catalog = match &args.catalog {
        Some(path) => Arc::new( PerformanceCatalog::from_path( path)?),
        None => PerformanceCatalog::builtin()
    };

    let mut controller = SimController::new( navdata, catalog);
    let json = args.json;

    let outcome = run_scenario( &mut controller, &scenario, |snapshot| {
        if !json { print_snapshot( snapshot) }
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty( &outcome.snapshot)?);
    } else {
        println!("{} ticks, {} commands ({} rejected), {} aircraft still active",
                 outcome.n_ticks, outcome.n_commands, outcome.n_rejected_commands, outcome.snapshot.aircraft.len());
    }

    Ok(())
}

fn print_snapshot (snapshot: &SimulationSnapshot) {
    println!("------- {} t+{:.0}s ({})", snapshot.name, snapshot.elapsed, snapshot.sim_time.format("%H:%M:%S"));
    for ac in &snapshot.aircraft {
        println!("{:<8} {:<4} {:>9.4} {:>10.4} {:>6.0}ft {:03.0}° {:>4.0}kt gs:{:>4.0} vs:{:>6.0} {:<10} {}",
                 ac.callsign, ac.type_code, ac.lat, ac.lon, ac.altitude, ac.heading, ac.speed, ac.ground_speed,
                 ac.vertical_speed, ac.phase, ac.next_waypoint.as_deref().unwrap_or("-"));
    }
}
