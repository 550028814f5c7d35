use serde_json::{Value, json};
use weather_obs::download::ObservationClient;
use weather_obs::{
    OBSERVATION_URLS_FILE, OBSERVATIONS_FILE, STATIONS_FILE, ScrapeSettings, scrape,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATIONS_TXT: &str = "Bureau of Meteorology product IDCJMC0014.\r\n\
\r\n\
Site list\r\n\
\r\n\
 Site  Dist  Site name\r\n";

fn station_row(name: &str, lat: &str, lon: &str, wmo: &str) -> String {
    format!(
        "{:<8}{:<6}{:<41}{:<8}{:<7}{:>9}{:>10}{:<15}{:<4}{:>11}{:<9}{:>7}\r\n",
        "66062", "", name, "1859", "..", lat, lon, "GPS", "NSW", "39.0", "..", wmo
    )
}

fn feed(air_temp: f64) -> Value {
    json!({
        "observations": {
            "data": [
                { "sort_order": 0, "name": "Sydney", "lat": -33.9, "lon": 151.2, "air_temp": air_temp },
                { "sort_order": 1, "name": "Sydney", "lat": -33.9, "lon": 151.2, "air_temp": 10.0 },
            ]
        }
    })
}

async fn mount_state_page(server: &MockServer) {
    let html = r#"
        <a href="/products/IDN60801/IDN60801.94768.shtml">Sydney</a>
        <a href="/products/IDN60801/IDN60801.94767.shtml">Sydney Airport</a>
        <a href="/products/IDN60801/IDN60801.95000.shtml">Closed</a>
        <a href="/nsw/forecasts/">Forecasts</a>
    "#;

    Mock::given(method("GET"))
        .and(path("/nsw/observations/nswall.shtml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

async fn mount_feed(server: &MockServer, file: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/fwo/IDN60801/{file}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn scrapes_stations_links_and_observations() {
    let server = MockServer::start().await;
    mount_state_page(&server).await;
    mount_feed(&server, "IDN60801.94768.json", feed(18.4)).await;
    mount_feed(&server, "IDN60801.94767.json", feed(19.2)).await;
    mount_feed(
        &server,
        "IDN60801.95000.json",
        json!({ "observations": { "data": [] } }),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let stations_file = dir.path().join("stations.txt");
    let mut stations = STATIONS_TXT.to_string();
    stations.push_str(&station_row("SYDNEY (OBSERVATORY HILL)", "-33.8607", "151.2050", "94768"));
    stations.push_str(&station_row("PARRAMATTA NORTH", "-33.7917", "151.0181", ".."));
    std::fs::write(&stations_file, stations).unwrap();

    let output_dir = dir.path().join("out");
    let settings = ScrapeSettings {
        stations_file,
        output_dir: output_dir.clone(),
        states: vec!["NSW".to_string()],
        workers: 2,
    };
    let client = ObservationClient::new(reqwest::Client::new(), &server.uri());

    let summary = scrape(&client, &settings).await.unwrap();

    assert_eq!(summary.stations, 1);
    assert_eq!(summary.observation_urls, 3);
    assert_eq!(summary.observations, 2);

    let urls = std::fs::read_to_string(output_dir.join(OBSERVATION_URLS_FILE)).unwrap();
    assert_eq!(
        urls,
        format!(
            "{0}/fwo/IDN60801/IDN60801.94768.json\n\
             {0}/fwo/IDN60801/IDN60801.94767.json\n\
             {0}/fwo/IDN60801/IDN60801.95000.json",
            server.uri()
        )
    );

    let raw = std::fs::read_to_string(output_dir.join("obs/IDN60801.94768.json")).unwrap();
    assert_eq!(serde_json::from_str::<Value>(&raw).unwrap(), feed(18.4));

    let stations: Value =
        serde_json::from_str(&std::fs::read_to_string(output_dir.join(STATIONS_FILE)).unwrap())
            .unwrap();
    assert_eq!(stations["features"].as_array().unwrap().len(), 1);
    assert_eq!(stations["features"][0]["properties"]["wmo"], 94768);

    let observations: Value = serde_json::from_str(
        &std::fs::read_to_string(output_dir.join(OBSERVATIONS_FILE)).unwrap(),
    )
    .unwrap();
    let mut temps: Vec<f64> = observations["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|feature| feature["properties"]["air_temp"].as_f64().unwrap())
        .collect();
    temps.sort_by(f64::total_cmp);
    assert_eq!(temps, vec![18.4, 19.2]);
}

#[tokio::test]
async fn unreachable_state_page_fails_the_scrape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let stations_file = dir.path().join("stations.txt");
    std::fs::write(&stations_file, STATIONS_TXT).unwrap();

    let settings = ScrapeSettings {
        stations_file,
        output_dir: dir.path().join("out"),
        states: vec!["VIC".to_string()],
        workers: 2,
    };
    let client = ObservationClient::new(reqwest::Client::new(), &server.uri());

    let err = scrape(&client, &settings).await.unwrap_err();

    assert!(err.to_string().contains("/vic/observations/vicall.shtml"));
}
