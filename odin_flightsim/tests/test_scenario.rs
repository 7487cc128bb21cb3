#![allow(unused)]

/// tests for scripted scenario runs

use odin_flightsim::{
    load_config,
    aircraft::FlightPhase,
    controller::SimController,
    errors::OdinFlightSimError,
    navigation::StaticNavData,
    scenario::{ScenarioConfig, run_scenario},
};

const NAVDATA: &str = include_str!("../configs/navdata.ron");

fn controller ()->SimController {
    SimController::with_builtin_catalog( StaticNavData::from_ron_str( NAVDATA).unwrap())
}

#[test]
fn test_example_scenario () {
    let scenario: ScenarioConfig = load_config("configs/scenario.ron").unwrap();
    assert_eq!( scenario.aircraft.len(), 3);
    assert_eq!( scenario.n_ticks(), 720);

    let mut ctrl = controller();
    let mut n_reports = 0;
    let outcome = run_scenario( &mut ctrl, &scenario, |snap| {
        println!("t+{:.0}s: {} aircraft", snap.elapsed, snap.aircraft.len());
        n_reports += 1;
    }).unwrap();

    assert_eq!( n_reports, 13); // initial + every 300s
    assert_eq!( outcome.n_ticks, 720);
    assert_eq!( outcome.n_commands, 4);
    assert_eq!( outcome.n_rejected_commands, 0);
    assert_eq!( outcome.snapshot.elapsed, 3600.0);
    assert_eq!( outcome.snapshot.name, "atl-departures");

    let dal = outcome.snapshot.get("DAL123").unwrap();
    assert_eq!( dal.altitude, 35000.0);
    assert_eq!( dal.phase, FlightPhase::Cruise);

    let n172 = outcome.snapshot.get("N172SP").unwrap();
    assert_eq!( n172.target_altitude, 4500.0);
}

#[test]
fn test_timed_commands () {
    let ron = r#"
        ScenarioConfig(
            tick_interval: 5.0,
            duration: 120.0,
            aircraft: [
                ( callsign: "UAL1", type_code: "A320", origin: "KORD", altitude: Some(11000.0) ),
            ],
            commands: [
                ( at: 60.0, callsign: "UAL1", command: "CLIMB 15000" ),
                ( at: 0.0,  callsign: "UAL1", command: "FLY_HEADING 180" ),
                ( at: 30.0, callsign: "NOBODY", command: "SPEED 250" ),
                ( at: 500.0, callsign: "UAL1", command: "DESCEND 3000" ),
            ],
        )
    "#;
    let scenario: ScenarioConfig = ron::from_str( ron).unwrap();

    let mut ctrl = controller();
    let outcome = run_scenario( &mut ctrl, &scenario, |_| {}).unwrap();

    assert_eq!( outcome.n_commands, 3); // the last one is never reached
    assert_eq!( outcome.n_rejected_commands, 1);

    let ual = outcome.snapshot.get("UAL1").unwrap();
    assert_eq!( ual.heading, 180.0);
    assert_eq!( ual.target_altitude, 15000.0);
    assert!( ual.altitude > 11000.0);
}

#[test]
fn test_invalid_scenarios () {
    let mut ctrl = controller();

    let bad_command = r#"
        ScenarioConfig( tick_interval: 5.0, duration: 60.0, aircraft: [],
            commands: [ ( at: 0.0, callsign: "X", command: "LOOP 3" ) ] )
    "#;
    let scenario: ScenarioConfig = ron::from_str( bad_command).unwrap();
    let res = run_scenario( &mut ctrl, &scenario, |_| {});
    assert!( matches!( res, Err(OdinFlightSimError::ParseError(_))));
    assert!( ctrl.list_simulations().is_empty());

    let bad_interval = r#"ScenarioConfig( tick_interval: 0.0, duration: 60.0, aircraft: [] )"#;
    let scenario: ScenarioConfig = ron::from_str( bad_interval).unwrap();
    assert!( matches!( run_scenario( &mut ctrl, &scenario, |_| {}), Err(OdinFlightSimError::ConfigError(_))));

    let bad_origin = r#"ScenarioConfig( tick_interval: 5.0, duration: 60.0, aircraft: [ (callsign: "X", type_code: "B738", origin: "NOPE") ] )"#;
    let scenario: ScenarioConfig = ron::from_str( bad_origin).unwrap();
    assert!( matches!( run_scenario( &mut ctrl, &scenario, |_| {}), Err(OdinFlightSimError::UnresolvedAirport(_))));
}
