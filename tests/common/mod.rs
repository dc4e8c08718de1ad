//! Shared helpers for the client integration tests
//!
//! A wiremock server standing in for `w3query.pl` plus a small FITS writer
//! producing binary-table responses.

#![allow(dead_code)]

use heasarc_query::app::HeasarcClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const W3QUERY_PATH: &str = "/w3query.pl";
pub const MISSION: &str = "integral_rev3_scw";

const BLOCK: usize = 2880;

fn padded(len: usize) -> usize {
    (len + BLOCK - 1) / BLOCK * BLOCK
}

fn card(keyword: &str, value: &str) -> String {
    format!("{:<8}= {:>20}", keyword, value)
}

fn text_card(keyword: &str, value: &str) -> String {
    format!("{:<8}= '{:<8}'", keyword, value)
}

fn header(cards: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    for c in cards.iter().map(String::as_str).chain(["END"]) {
        out.extend(format!("{:<80}", c).bytes());
    }
    out.resize(padded(out.len()), b' ');
    out
}

/// A FITS file with an empty primary HDU and one BINTABLE extension
pub fn fits_table(columns: &[(&str, &str)], row_bytes: usize, rows: &[Vec<u8>]) -> Vec<u8> {
    let mut out = header(&[
        card("SIMPLE", "T"),
        card("BITPIX", "8"),
        card("NAXIS", "0"),
        card("EXTEND", "T"),
    ]);

    let mut cards = vec![
        text_card("XTENSION", "BINTABLE"),
        card("BITPIX", "8"),
        card("NAXIS", "2"),
        card("NAXIS1", &row_bytes.to_string()),
        card("NAXIS2", &rows.len().to_string()),
        card("PCOUNT", "0"),
        card("GCOUNT", "1"),
        card("TFIELDS", &columns.len().to_string()),
    ];
    for (i, (name, tform)) in columns.iter().enumerate() {
        cards.push(text_card(&format!("TTYPE{}", i + 1), name));
        cards.push(text_card(&format!("TFORM{}", i + 1), tform));
    }
    out.extend(header(&cards));

    let mut data: Vec<u8> = rows.concat();
    data.resize(padded(data.len()), 0);
    out.extend(data);
    out
}

pub const SCW_COLUMNS: [(&str, &str); 4] = [
    ("SCW_ID", "12A"),
    ("RA_X", "D"),
    ("DEC_X", "D"),
    ("SCW_TYPE", "8A"),
];

/// Science window table with `count` pointings near 3C 273
pub fn scw_fits(count: usize) -> Vec<u8> {
    let rows: Vec<Vec<u8>> = (0..count)
        .map(|i| {
            let mut row = format!("{:012}", 4_900_020_010_u64 + i as u64).into_bytes();
            row.extend((187.0 + i as f64 * 0.125).to_be_bytes());
            row.extend((2.0_f64).to_be_bytes());
            row.extend(format!("{:<8}", "POINTING").bytes());
            row
        })
        .collect();
    fits_table(&SCW_COLUMNS, 36, &rows)
}

pub const MISSION_LIST: &str = "\
<pre>
BATCH_RETRIEVAL_MSG ERROR: Table xray does not seem to exist!

Available tables:
+-------------------+----------------------------------+
| Mission           | Description                      |
+-------------------+----------------------------------+
| integral_rev3     | INTEGRAL Rev3 Pointings          |
| integral_rev3_scw | INTEGRAL Rev3 Science Windows    |
| integral_rev3_prp | INTEGRAL Rev3 Proposals          |
+-------------------+----------------------------------+
</pre>
";

/// Mock W3Browse server for integration tests
pub struct MockHeasarcServer {
    server: MockServer,
}

impl MockHeasarcServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Full URL of the mocked batch endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.server.uri(), W3QUERY_PATH)
    }

    /// A client pointed at this server
    pub fn client(&self) -> HeasarcClient {
        HeasarcClient::with_server(&self.endpoint()).unwrap()
    }

    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// GET on the batch endpoint for `mission`
    pub fn request(mission: &str) -> MockBuilder {
        Mock::given(method("GET")).and(path(W3QUERY_PATH)).and(query_param(
            "tablehead",
            format!("name=BATCHRETRIEVALCATALOG_2.0 {}", mission),
        ))
    }

    /// Object query for `entry` answered with `body`
    pub async fn mock_entry(&self, entry: &str, body: impl Into<Vec<u8>>) {
        Self::request(MISSION)
            .and(query_param("Entry", entry))
            .and(query_param("displaymode", "FitsDisplay"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.into()))
            .mount(&self.server)
            .await;
    }

    /// Column lookup query answered with a one-row table
    pub async fn mock_mission_cols(&self, expected_calls: u64) {
        Self::request(MISSION)
            .and(query_param("ResultMax", "1"))
            .and(query_param("Fields", "All"))
            .and(query_param("Radius", "21660.0 arcmin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(scw_fits(1)))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Mission list query
    pub async fn mock_mission_list(&self) {
        Self::request("xray")
            .and(query_param("Entry", "none"))
            .and(query_param("displaymode", "BatchDisplay"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MISSION_LIST))
            .mount(&self.server)
            .await;
    }

    /// Any request answered with a bare status
    pub async fn mock_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(W3QUERY_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string("unavailable"))
            .mount(&self.server)
            .await;
    }
}
