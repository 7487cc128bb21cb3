#![allow(unused)]

/// unit tests for angle normalization and the Heading type

use odin_common::{approx_eq, angle::{normalize_360, normalize_180, normalize_90, Heading}};

#[test]
fn test_normalize_360 () {
    for d in [-1080.5, -720.0, -359.9, -180.0, -0.0001, 0.0, 45.0, 359.999, 360.0, 725.0, 1e6] {
        let n = normalize_360(d);
        println!("{d} -> {n}");
        assert!( n >= 0.0 && n < 360.0);
        assert!( approx_eq( normalize_360(n), n, 1e-9)); // idempotent
    }

    assert_eq!( normalize_360(-90.0), 270.0);
    assert_eq!( normalize_360(370.0), 10.0);
    assert_eq!( normalize_360(-1e-15), 0.0);
}

#[test]
fn test_normalize_180 () {
    for d in [-540.0, -181.0, -180.0, -179.0, 0.0, 179.0, 180.0, 181.0, 540.0] {
        let n = normalize_180(d);
        println!("{d} -> {n}");
        assert!( n > -180.0 && n <= 180.0);
    }

    assert_eq!( normalize_180(-180.0), 180.0);
    assert_eq!( normalize_180(181.0), -179.0);
    assert_eq!( normalize_180(-190.0), 170.0);
}

#[test]
fn test_normalize_90 () {
    assert_eq!( normalize_90(45.0), 45.0);
    assert_eq!( normalize_90(100.0), 80.0);
    assert_eq!( normalize_90(-100.0), -80.0);
}

#[test]
fn test_heading () {
    let h = Heading::from_degrees(350.0);
    assert_eq!( (h + 20.0).degrees(), 10.0);
    assert_eq!( (h - 360.0).degrees(), 350.0);
    assert_eq!( h.reciprocal().degrees(), 170.0);
    assert_eq!( h.to_string(), "350");

    // shortest turn, positive is right
    assert_eq!( h.turn_to( Heading::from_degrees(10.0)), 20.0);
    assert_eq!( Heading::from_degrees(10.0).turn_to(h), -20.0);
    assert_eq!( Heading::from_degrees(0.0).turn_to( Heading::from_degrees(180.0)), 180.0);

    assert!( approx_eq( Heading::from_radians( -std::f64::consts::FRAC_PI_2).degrees(), 270.0, 1e-9));
}

#[test]
fn test_heading_serde () {
    let h: Heading = serde_json::from_str("-90.0").unwrap();
    assert_eq!( h.degrees(), 270.0);
    assert_eq!( serde_json::to_string(&h).unwrap(), "270.0");

    assert!( serde_json::from_str::<Heading>("1e400").is_err()); // not finite
}
