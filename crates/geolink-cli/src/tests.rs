use super::*;

use geolink_core::ResolverSettings;
use geolink_resolver::ResolveResponse;

use crate::resolve::{is_success, render, run_normalize, Overrides};

#[test]
fn parses_resolve_command() {
    let cli = Cli::try_parse_from(["geolink", "resolve", "https://maps.app.goo.gl/abc"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Resolve {
            ref url,
            attempts: None,
            max_hops: None,
            pretty: false,
        } if url == "https://maps.app.goo.gl/abc"
    ));
}

#[test]
fn parses_resolve_overrides() {
    let cli = Cli::try_parse_from([
        "geolink",
        "resolve",
        "https://goo.gl/maps/x",
        "--attempts",
        "5",
        "--max-hops",
        "4",
        "--pretty",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Resolve {
            attempts: Some(5),
            max_hops: Some(4),
            pretty: true,
            ..
        }
    ));
}

#[test]
fn resolve_requires_url() {
    assert!(Cli::try_parse_from(["geolink", "resolve"]).is_err());
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["geolink"]).is_err());
}

#[test]
fn parses_normalize_with_negative_values() {
    let cli = Cli::try_parse_from(["geolink", "normalize", "-122.4194", "37.7749"])
        .expect("expected valid cli args");

    let Commands::Normalize { a, b } = cli.command else {
        panic!("expected normalize command");
    };
    assert!((a + 122.4194).abs() < f64::EPSILON);
    assert!((b - 37.7749).abs() < f64::EPSILON);
}

#[test]
fn normalize_puts_larger_magnitude_second() {
    assert_eq!(run_normalize(121.5, 25.1), "25.100000,121.500000");
    assert_eq!(run_normalize(25.1, 121.5), "25.100000,121.500000");
}

#[test]
fn overrides_replace_settings() {
    let mut settings = ResolverSettings::default();
    Overrides {
        attempts: Some(7),
        max_hops: Some(2),
    }
    .apply(&mut settings)
    .unwrap();
    assert_eq!(settings.max_attempts, 7);
    assert_eq!(settings.max_hops, 2);
}

#[test]
fn empty_overrides_keep_settings() {
    let mut settings = ResolverSettings::default();
    Overrides::default().apply(&mut settings).unwrap();
    assert_eq!(settings, ResolverSettings::default());
}

#[test]
fn zero_attempts_is_rejected() {
    let mut settings = ResolverSettings::default();
    let err = Overrides {
        attempts: Some(0),
        max_hops: None,
    }
    .apply(&mut settings)
    .unwrap_err();
    assert!(err.to_string().contains("--attempts"));
}

#[test]
fn oversized_hop_bound_is_rejected() {
    let mut settings = ResolverSettings::default();
    assert!(Overrides {
        attempts: None,
        max_hops: Some(17),
    }
    .apply(&mut settings)
    .is_err());
}

#[test]
fn render_compact_body() {
    let response = ResolveResponse::Found {
        coords: Some("25.033000,121.564000".to_owned()),
        place_name: "Taipei 101".to_owned(),
    };
    assert_eq!(
        render(&response, false).unwrap(),
        r#"{"coords":"25.033000,121.564000","placeName":"Taipei 101"}"#
    );
}

#[test]
fn render_pretty_body_spans_lines() {
    let response = ResolveResponse::Found {
        coords: None,
        place_name: "Din Tai Fung".to_owned(),
    };
    let body = render(&response, true).unwrap();
    assert!(body.contains('\n'));
    assert!(body.contains(r#""coords": null"#));
}

#[test]
fn only_2xx_statuses_exit_cleanly() {
    assert!(is_success(200));
    assert!(!is_success(400));
    assert!(!is_success(404));
    assert!(!is_success(500));
}
