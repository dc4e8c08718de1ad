//! Tests for the HEASARC client module
//!
//! Offline checks of payload construction and the scoped server override
//! live here; `remote_isdc` holds the tests that talk to real servers.


use super::*;
use crate::constants::heasarc;

fn one_degree() -> Angle {
    "1 degree".parse().unwrap()
}

#[test]
fn test_object_payload_defaults_to_fk5() {
    let client = HeasarcClient::new().unwrap();
    let options = QueryOptions::new().with_radius(one_degree());
    let payload = client.object_payload(" 3c273 ", "integral_rev3_scw", &options);

    assert_eq!(payload.get("Entry"), Some("3c273"));
    assert_eq!(payload.get("Coordinates"), Some("Equatorial: R.A. Dec"));
    assert_eq!(payload.get("Radius"), Some("60.0 arcmin"));
}

#[test]
fn test_region_payload_uses_frame() {
    let client = HeasarcClient::new().unwrap();
    let coordinate = SkyCoord::parse("289.7 64.36", Frame::Galactic).unwrap();
    let payload = client.region_payload(
        &coordinate,
        "integral_rev3_scw",
        one_degree(),
        &QueryOptions::default(),
    );

    assert_eq!(payload.get("Entry"), Some("289.7,64.36"));
    assert_eq!(payload.get("Coordinates"), Some("Galactic: LII BII"));
    assert_eq!(payload.get("Radius"), Some("60.0 arcmin"));
}

#[test]
fn test_region_payload_coord_sys_override() {
    let client = HeasarcClient::new().unwrap();
    let coordinate = SkyCoord::parse("187.25 2.05", Frame::Icrs).unwrap();
    let options = QueryOptions::new().with_coord_sys(CoordSys::Fk4);
    let payload = client.region_payload(&coordinate, "m", one_degree(), &options);

    assert_eq!(payload.get("equinox"), Some("1950"));
}

#[test]
fn test_temp_server_restores_on_drop() {
    let mut client = HeasarcClient::new().unwrap();
    {
        let isdc = client.set_temp_server(heasarc::ISDC_SERVER).unwrap();
        assert_eq!(isdc.server().as_str(), heasarc::ISDC_SERVER);
        assert_eq!(
            isdc.previous().map(Url::as_str),
            Some(heasarc::DEFAULT_SERVER)
        );
    }
    assert_eq!(client.server().as_str(), heasarc::DEFAULT_SERVER);
}

#[test]
fn test_temp_server_restores_after_early_return() {
    fn query_through(client: &mut HeasarcClient) -> QueryResult<()> {
        let _isdc = client.set_temp_server(heasarc::ISDC_SERVER)?;
        Err(QueryError::ServerOverloaded)
    }

    let mut client = HeasarcClient::new().unwrap();
    assert!(query_through(&mut client).is_err());
    assert_eq!(client.server().as_str(), heasarc::DEFAULT_SERVER);
}

#[test]
fn test_temp_server_restores_after_panic() {
    let mut client = HeasarcClient::new().unwrap();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> QueryResult<()> {
        let _isdc = client.set_temp_server(heasarc::ISDC_SERVER)?;
        panic!("query aborted while using the mirror");
    }));

    assert!(result.is_err());
    assert_eq!(client.server().as_str(), heasarc::DEFAULT_SERVER);
}

#[test]
fn test_invalid_temp_server_leaves_client_unchanged() {
    let mut client = HeasarcClient::new().unwrap();
    assert!(matches!(
        client.set_temp_server("not a url"),
        Err(QueryError::InvalidUrl { .. })
    ));
    assert_eq!(client.server().as_str(), heasarc::DEFAULT_SERVER);
}

#[test]
fn test_nested_temp_servers() {
    let mut client = HeasarcClient::with_server("http://localhost:8080/w3query.pl").unwrap();
    {
        let mut outer = client.set_temp_server(heasarc::ISDC_SERVER).unwrap();
        {
            let inner = outer.set_temp_server(heasarc::DEFAULT_SERVER).unwrap();
            assert_eq!(inner.server().as_str(), heasarc::DEFAULT_SERVER);
        }
        assert_eq!(outer.server().as_str(), heasarc::ISDC_SERVER);
    }
    assert_eq!(client.server().as_str(), "http://localhost:8080/w3query.pl");
}
