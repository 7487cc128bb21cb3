#![allow(unused)]

/// tests for the in-memory navigation resolver

use uom::si::length::{foot,meter};
use odin_common::approx_eq;
use odin_flightsim::{
    navigation::{Airport, Fix, NavResolver, StaticNavData},
    flight_math::distance_nm,
    errors::OdinFlightSimError,
};

const NAVDATA: &str = include_str!("../configs/navdata.ron");

fn navdata ()->StaticNavData { StaticNavData::from_ron_str( NAVDATA).unwrap() }

#[test]
fn test_airports () {
    let nav = navdata();
    println!("{} airports, {} fixes", nav.n_airports(), nav.n_fixes());
    assert_eq!( nav.n_airports(), 10);

    let katl = nav.get_airport("KATL").unwrap();
    assert_eq!( katl.lat, 33.6367);
    assert!( approx_eq( katl.elevation().get::<meter>(), 1026.0 * 0.3048, 1e-9));
    assert!( nav.get_airport("XXXX").is_none());
    assert!( nav.get_airport("katl").is_none()); // identifiers are case sensitive
}

#[test]
fn test_route_resolution () {
    let nav = navdata();

    let route = nav.resolve_route( "KATL", "KJFK", "FIXX");
    let names: Vec<&str> = route.iter().map( |p| p.name.as_str()).collect();
    assert_eq!( names, vec!["KATL", "FIXX", "KJFK"]);

    // cumulative distances
    assert_eq!( route[0].cumulative_distance_nm, 0.0);
    assert!( approx_eq( route[1].cumulative_distance_nm, 224.1, 0.1));
    assert!( approx_eq( route[2].cumulative_distance_nm, route[1].cumulative_distance_nm + distance_nm( route[1].position(), route[2].position()), 1e-9));

    // DCT and repeated endpoints are ignored
    let route = nav.resolve_route( "KATL", "KJFK", "KATL DCT SPA GSO RDU DCT KJFK");
    let names: Vec<&str> = route.iter().map( |p| p.name.as_str()).collect();
    assert_eq!( names, vec!["KATL", "SPA", "GSO", "RDU", "KJFK"]);

    // an empty route is a direct flight
    assert_eq!( nav.resolve_route( "KATL", "KJFK", "").len(), 2);

    // any unknown element invalidates the route
    assert!( nav.resolve_route( "KATL", "KJFK", "FIXX NOWHERE").is_empty());
    assert!( nav.resolve_route( "KATL", "XXXX", "FIXX").is_empty());
}

#[test]
fn test_runtime_additions () {
    let mut nav = navdata();
    nav.add_fix( Fix { name: "TESTY".to_string(), lat: 36.0, lon: -79.0 });
    nav.add_airport( Airport { icao: "KRDU".to_string(), lat: 35.8776, lon: -78.7875, elevation_ft: 435.0, name: "Raleigh-Durham Intl".to_string() });

    assert!( nav.fix("TESTY").is_some());
    let route = nav.resolve_route( "KATL", "KRDU", "TESTY");
    assert_eq!( route.len(), 3);
    assert_eq!( route[2].name, "KRDU");
}

#[test]
fn test_invalid_navdata () {
    assert!( matches!( StaticNavData::from_ron_str("NavData(airports: [])"), Err(OdinFlightSimError::ConfigError(_))));
    assert!( matches!( StaticNavData::from_ron_str("NavData(airports: [ (icao: \"KATL\") ])"), Err(OdinFlightSimError::RonError(_))));
}
