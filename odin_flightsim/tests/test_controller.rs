#![allow(unused)]

/// tests for the simulation registry and its tick semantics

use chrono::{DateTime,TimeDelta,Utc};
use odin_common::approx_eq;
use odin_flightsim::{
    aircraft::{ControlMode, FlightPhase, Waypoint},
    command::AircraftCommand,
    controller::{SimController, SimId, SimulationConfig, SpawnParams, TickResult, Rejection},
    errors::OdinFlightSimError,
    flight_math::{Wind, GeoPos},
    navigation::StaticNavData,
};

const NAVDATA: &str = include_str!("../configs/navdata.ron");

fn controller ()->SimController {
    SimController::with_builtin_catalog( StaticNavData::from_ron_str( NAVDATA).unwrap())
}

fn departure (callsign: &str)->SpawnParams {
    SpawnParams::new( callsign, "B738", "KATL")
        .with_destination( "KJFK")
        .with_route( "FIXX")
        .with_cruise( 35000.0, 280.0)
}

#[test]
fn test_registry () {
    let mut ctrl = controller();
    let a = ctrl.create_simulation( SimulationConfig::named("alpha"));
    let b = ctrl.create_simulation( SimulationConfig::default());
    assert_ne!( a, b);

    let list = ctrl.list_simulations();
    println!("{list:?}");
    assert_eq!( list.len(), 2);
    assert!( list.iter().any( |s| s.sim_id == a && s.name == "alpha"));

    // ids survive their string form
    let s = a.to_string();
    assert!( s.starts_with("sim-"));
    assert_eq!( s.parse::<SimId>().unwrap(), a);
    assert!( "foo".parse::<SimId>().is_err());

    assert!( ctrl.delete_simulation( a));
    assert!( !ctrl.delete_simulation( a));
    assert_eq!( ctrl.list_simulations().len(), 1);

    // stale ids don't alias new simulations
    let c = ctrl.create_simulation( SimulationConfig::default());
    assert!( ctrl.get_simulation( a).is_none());
    assert!( ctrl.get_simulation( c).is_some());
}

#[test]
fn test_rejected_ticks () {
    let mut ctrl = controller();
    let id = ctrl.create_simulation( SimulationConfig::default());
    ctrl.spawn_aircraft( id, departure("DAL1")).unwrap();
    assert!( ctrl.tick( id, 5.0).success());

    let before = ctrl.snapshot( id).unwrap();

    assert!( ctrl.pause( id));
    let res = ctrl.tick( id, 5.0);
    assert_eq!( res.reason(), Some(Rejection::Paused));
    assert!( res.snapshot().is_none());
    assert!( !ctrl.run_for( id, 60.0, 5.0).success());

    for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert_eq!( ctrl.tick( id, dt).reason(), Some(Rejection::InvalidTimeStep));
    }

    let after = ctrl.snapshot( id).unwrap();
    assert_eq!( before.tick_count, after.tick_count);
    assert_eq!( before.sim_time, after.sim_time);
    assert_eq!( before.aircraft, after.aircraft);

    assert!( ctrl.resume( id));
    assert!( ctrl.tick( id, 5.0).success());

    ctrl.delete_simulation( id);
    assert_eq!( ctrl.tick( id, 5.0).reason(), Some(Rejection::UnknownSimulation));
    assert!( !ctrl.pause( id));
}

#[test]
fn test_clock_overflow () {
    let mut ctrl = controller();
    let id = ctrl.create_simulation( SimulationConfig::default());
    ctrl.spawn_aircraft( id, departure("DAL1")).unwrap();
    assert!( ctrl.tick( id, 5.0).success());

    let before = ctrl.snapshot( id).unwrap();
    let res = ctrl.tick( id, 1.0e13);
    println!("{res:?}");
    assert_eq!( res.reason(), Some(Rejection::InvalidTimeStep));

    let after = ctrl.snapshot( id).unwrap();
    assert_eq!( before.tick_count, after.tick_count);
    assert_eq!( before.sim_time, after.sim_time);
    assert_eq!( before.elapsed, after.elapsed);
    assert_eq!( before.aircraft, after.aircraft);

    // the simulation is still usable
    assert!( ctrl.tick( id, 5.0).success());
}

#[test]
fn test_spawn_errors () {
    let mut ctrl = controller();
    let id = ctrl.create_simulation( SimulationConfig::default());

    let state = ctrl.spawn_aircraft( id, departure("DAL1")).unwrap();
    println!("{state:?}");
    assert_eq!( state.phase, FlightPhase::TaxiOut);
    assert_eq!( state.next_waypoint.as_deref(), Some("FIXX"));
    assert!( approx_eq( state.heading, 58.95, 0.05)); // towards FIXX
    assert!( approx_eq( state.distance_to_destination.unwrap(), 659.9, 0.5));

    let res = ctrl.spawn_aircraft( id, departure("DAL1"));
    assert!( matches!( res, Err(OdinFlightSimError::DuplicateCallsign(_))));

    let res = ctrl.spawn_aircraft( id, SpawnParams::new( "DAL2", "B738", "XXXX"));
    assert!( matches!( res, Err(OdinFlightSimError::UnresolvedAirport(_))));

    let res = ctrl.spawn_aircraft( id, SpawnParams::new( "DAL2", "B738", "KATL").with_destination("YYYY"));
    assert!( matches!( res, Err(OdinFlightSimError::UnresolvedAirport(_))));

    let res = ctrl.spawn_aircraft( id, departure("DAL2").with_route("FIXX NOWHERE"));
    assert!( matches!( res, Err(OdinFlightSimError::UnresolvedRoute(_))));

    let fake = SimId::default();
    let res = ctrl.spawn_aircraft( fake, departure("DAL2"));
    assert!( matches!( res, Err(OdinFlightSimError::UnknownSimulation(_))));

    // failed spawns leave nothing behind
    assert_eq!( ctrl.get_all_aircraft( id).unwrap().len(), 1);
}

#[test]
fn test_spawn_variants () {
    let mut ctrl = controller();
    let id = ctrl.create_simulation( SimulationConfig::default());

    // unknown types fly with default performance
    ctrl.spawn_aircraft( id, SpawnParams::new( "X1", "ZZZZ", "KATL")).unwrap();
    let sim = ctrl.get_simulation( id).unwrap();
    assert_eq!( sim.aircraft("X1").unwrap().performance().type_code, "B738");
    assert_eq!( sim.aircraft("X1").unwrap().type_code(), "ZZZZ");

    // no destination means a single point plan
    let state = ctrl.get_aircraft( id, "X1").unwrap();
    assert_eq!( state.phase, FlightPhase::Preflight);
    assert!( state.destination.is_none());
    assert!( state.next_waypoint.is_none());

    // direct flight plan
    let state = ctrl.spawn_aircraft( id, SpawnParams::new( "X2", "A320", "KCLT").with_destination("KDCA")).unwrap();
    assert_eq!( state.next_waypoint.as_deref(), Some("KDCA"));

    // explicit flight plan wins over route
    let plan = vec![ Waypoint::new( "KATL", 33.6367, -84.4281), Waypoint::new( "SPA", 35.0336, -81.9272) ];
    let state = ctrl.spawn_aircraft( id, departure("X3").with_flight_plan( plan).with_heading(10.0)).unwrap();
    assert_eq!( state.next_waypoint.as_deref(), Some("SPA"));
    assert_eq!( state.heading, 10.0);

    // airborne spawn
    let state = ctrl.spawn_aircraft( id, departure("X4").with_altitude( 12000.0).with_wind( Wind::new( 30.0, 250.0))).unwrap();
    assert_eq!( state.phase, FlightPhase::Climb);
    assert_eq!( state.wind, Wind::new( 30.0, 250.0));

    assert_eq!( ctrl.list_simulations()[0].n_aircraft, 4);
}

#[test]
fn test_commands () {
    let mut ctrl = controller();
    let id = ctrl.create_simulation( SimulationConfig::default());
    ctrl.spawn_aircraft( id, departure("DAL1")).unwrap();
    ctrl.run_for( id, 60.0, 5.0);

    let before = ctrl.get_aircraft( id, "DAL1").unwrap();

    // unknown tokens, fixes, aircraft and simulations have no effect
    assert!( !ctrl.issue_command_token( id, "DAL1", "BARREL_ROLL", None));
    assert!( !ctrl.issue_command_token( id, "DAL1", "CLIMB", Some("lots")));
    assert!( !ctrl.issue_command( id, "DAL1", AircraftCommand::DirectTo("NOWHERE".to_string())));
    assert!( !ctrl.issue_command( id, "NOBODY", AircraftCommand::Climb(10000.0)));
    assert!( !ctrl.issue_command( SimId::default(), "DAL1", AircraftCommand::Climb(10000.0)));
    assert_eq!( ctrl.get_aircraft( id, "DAL1").unwrap(), before);

    assert!( ctrl.issue_command_token( id, "DAL1", "climb", Some("20000")));
    assert!( ctrl.issue_command_token( id, "DAL1", "turn-right-heading", Some("090")));
    assert!( ctrl.issue_command( id, "DAL1", "SPEED 230".parse().unwrap()));

    let state = ctrl.get_aircraft( id, "DAL1").unwrap();
    assert_eq!( state.target_altitude, 20000.0);
    assert_eq!( state.target_heading, 90.0);
    assert_eq!( state.target_speed, 230.0);
    assert_eq!( state.altitude_mode, ControlMode::Manual);
    assert_eq!( state.heading_mode, ControlMode::Manual);
    assert_eq!( state.speed_mode, ControlMode::Manual);

    assert!( ctrl.issue_command( id, "DAL1", AircraftCommand::DirectTo("KJFK".to_string())));
    let state = ctrl.get_aircraft( id, "DAL1").unwrap();
    assert_eq!( state.waypoint_index, 2);
    assert_eq!( state.heading_mode, ControlMode::Fms);

    let events = ctrl.aircraft_events( id, "DAL1").unwrap();
    assert!( events.iter().any( |e| e.message == "climb and maintain 20000"));
    assert!( events.iter().any( |e| e.message == "turn right heading 090"));

    let sim = ctrl.get_simulation( id).unwrap();
    assert!( sim.events().iter().any( |e| e.message == "DAL1 proceed direct KJFK"));

    assert!( ctrl.set_wind( id, "DAL1", Wind::new( 20.0, 180.0)));
    assert!( !ctrl.set_wind( id, "NOBODY", Wind::calm()));
}

#[test]
fn test_run_for () {
    let start: DateTime<Utc> = "2025-06-01T14:00:00Z".parse().unwrap();
    let mut ctrl = controller();
    let id = ctrl.create_simulation( SimulationConfig { start_time: Some(start), ..SimulationConfig::default() });
    ctrl.spawn_aircraft( id, departure("DAL1")).unwrap();

    let res = ctrl.run_for( id, 60.0, 5.0);
    let snap = res.snapshot().unwrap();
    assert_eq!( snap.tick_count, 12);
    assert_eq!( snap.sim_time, start + TimeDelta::seconds(60));
    assert!( approx_eq( snap.get("DAL1").unwrap().elapsed, 60.0, 1e-9));

    // partial intervals round up
    let res = ctrl.run_for( id, 62.0, 5.0);
    assert_eq!( res.snapshot().unwrap().tick_count, 25);

    let res = ctrl.run_for( id, 0.0, 5.0);
    assert!( res.success());
    assert_eq!( res.snapshot().unwrap().tick_count, 25);

    assert_eq!( ctrl.run_for( id, 10.0, 0.0).reason(), Some(Rejection::InvalidTimeStep));

    let json = serde_json::to_value( &res).unwrap();
    assert_eq!( json["status"], "advanced");
    assert_eq!( json["snapshot"]["aircraft"][0]["callsign"], "DAL1");
    assert_eq!( json["snapshot"]["aircraft"][0]["phase"], "CLIMB");
}

#[test]
fn test_departure_phases () {
    let mut ctrl = controller();
    let id = ctrl.create_simulation( SimulationConfig::default());
    let state = ctrl.spawn_aircraft( id, departure("DAL1")).unwrap();

    let mut phases = vec![ state.phase ];
    let mut max_alt = 0.0;
    for _ in 0..300 {
        let res = ctrl.tick( id, 5.0);
        let ac = res.snapshot().unwrap().get("DAL1").unwrap();
        if phases.last() != Some(&ac.phase) { phases.push( ac.phase) }
        assert!( ac.altitude >= max_alt); // never descends
        max_alt = ac.altitude;
    }

    let ac = ctrl.get_aircraft( id, "DAL1").unwrap();
    println!("phases: {phases:?}\nfinal: {ac:?}");
    assert_eq!( phases, vec![ FlightPhase::TaxiOut, FlightPhase::Departure, FlightPhase::Climb, FlightPhase::Cruise ]);
    assert_eq!( ac.altitude, 35000.0);
    assert_eq!( ac.speed, 280.0);
    assert_eq!( ac.next_waypoint.as_deref(), Some("FIXX"));
}

#[test]
fn test_arrival () {
    let mut ctrl = controller();
    let id = ctrl.create_simulation( SimulationConfig::default());

    let katl = GeoPos::new( 33.6367, -84.4281);
    let plan = vec![
        Waypoint::new( "FINAL", katl.lat + 2.0/60.0, katl.lon).with_constraints( Some(0.0), None),
        Waypoint::new( "STOP", katl.lat + 6.0/60.0, katl.lon),
    ];
    let params = SpawnParams::new( "N1", "B738", "KATL").with_flight_plan( plan).with_altitude( 2000.0).with_speed( 140.0);
    let state = ctrl.spawn_aircraft( id, params.clone()).unwrap();
    assert_eq!( state.heading, 0.0);

    let res = ctrl.run_for( id, 300.0, 5.0);
    let snap = res.snapshot().unwrap();
    assert!( snap.aircraft.is_empty()); // arrived aircraft are not reported

    let all = ctrl.get_all_aircraft( id).unwrap();
    assert_eq!( all.len(), 1);
    assert!( !all[0].active);
    assert_eq!( all[0].phase, FlightPhase::Arrived);

    let sim = ctrl.get_simulation( id).unwrap();
    assert!( sim.events().iter().any( |e| e.message == "N1 arrived"));
    assert_eq!( ctrl.list_simulations()[0].n_active, 0);

    // commands to arrived aircraft fail, callsign can be reused
    assert!( !ctrl.issue_command( id, "N1", AircraftCommand::Climb(5000.0)));
    assert!( ctrl.spawn_aircraft( id, params).is_ok());
    assert!( ctrl.get_aircraft( id, "N1").unwrap().active);
}

#[test]
fn test_remove_aircraft () {
    let mut ctrl = controller();
    let id = ctrl.create_simulation( SimulationConfig::default());
    ctrl.spawn_aircraft( id, departure("DAL1")).unwrap();
    ctrl.spawn_aircraft( id, departure("DAL2")).unwrap();

    assert!( ctrl.remove_aircraft( id, "DAL1"));
    assert!( !ctrl.remove_aircraft( id, "DAL1"));
    assert!( ctrl.get_aircraft( id, "DAL1").is_none());

    let res = ctrl.tick( id, 5.0);
    let snap = res.snapshot().unwrap();
    assert_eq!( snap.aircraft.len(), 1);
    assert_eq!( snap.aircraft[0].callsign, "DAL2");
}

#[test]
fn test_independent_simulations () {
    let mut ctrl = controller();
    let a = ctrl.create_simulation( SimulationConfig::default());
    let b = ctrl.create_simulation( SimulationConfig::default());
    ctrl.spawn_aircraft( a, departure("DAL1")).unwrap();
    ctrl.spawn_aircraft( b, departure("DAL1")).unwrap(); // same callsign in different simulation

    ctrl.run_for( a, 120.0, 5.0);
    assert_eq!( ctrl.snapshot( a).unwrap().tick_count, 24);
    assert_eq!( ctrl.snapshot( b).unwrap().tick_count, 0);
    assert_eq!( ctrl.get_aircraft( b, "DAL1").unwrap().altitude, 0.0);
}

#[test]
fn test_determinism () {
    let run = || {
        let mut ctrl = controller();
        let id = ctrl.create_simulation( SimulationConfig::default());
        ctrl.spawn_aircraft( id, departure("DAL1").with_wind( Wind::new( 45.0, 300.0))).unwrap();
        ctrl.spawn_aircraft( id, SpawnParams::new( "AAL2", "A321", "KCLT").with_destination("KBOS").with_altitude(9000.0)).unwrap();
        ctrl.run_for( id, 600.0, 5.0);
        ctrl.issue_command_token( id, "AAL2", "TURN_LEFT", Some("200"));
        ctrl.run_for( id, 600.0, 2.0);
        ctrl.get_all_aircraft( id).unwrap()
    };

    assert_eq!( run(), run());
}
