use std::io::Write;

use gpui_hydrograph::data_types::HydrographConfig;
use gpui_hydrograph::feed::{load_observations, parse_observations};
use tempfile::NamedTempFile;

const SAMPLE: &str = r##"[
  {"date":"2017-06-01","key":"05420680","name":"#nwis05420680","time":"00:00",
   "time_mili":1496293200000,"timezone":"CDT","value":"1520"},
  {"date":"2017-06-01","key":"05420680","name":"#nwis05420680","time":"00:15",
   "time_mili":1496294100000,"timezone":"CDT","value":1530.5},
  {"date":"2017-06-01","key":"05463500","name":"#nwis05463500","time":"00:00",
   "time_mili":"1496293200000","timezone":"CDT","value":""}
]"##;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_temp(SAMPLE);
    let data = load_observations(file.path().to_str().unwrap()).unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0].value, 1520.0);
    assert_eq!(data[1].value, 1530.5);
    assert_eq!(data[2].time_mili, 1_496_293_200_000.0);
    assert!(!data[2].is_plottable());
    assert_eq!(data[0].name, "#nwis05420680");
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");
    let err = load_observations(path.to_str().unwrap()).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.json"));
}

#[test]
fn test_malformed_body_is_an_error() {
    assert!(parse_observations("{not json").is_err());
    assert!(parse_observations(r#"{"key":"A"}"#).is_err());
    assert!(parse_observations(r#"[{"key":"A","time_mili":1,"value":"high"}]"#).is_err());
}

#[test]
fn test_empty_array() {
    assert!(parse_observations("[]").unwrap().is_empty());
}

#[test]
fn test_config_from_toml_file() {
    let file = write_temp(
        r#"
data_path = "https://example.org/gages.json"
width = 800.0
height = 400.0
units = "ft3/s"

[margins]
top = 10.0
right = 10.0
bottom = 20.0
left = 40.0
"#,
    );
    let config = HydrographConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.data_path, "https://example.org/gages.json");
    assert_eq!(config.plot_width(), 750.0);
    assert_eq!(config.plot_height(), 370.0);
    assert_eq!(config.units, "ft3/s");
    // untouched keys keep their defaults
    assert_eq!(config.value_floor, 20.0);
    assert_eq!(config.hover_class, "gage--hover");
}

#[test]
fn test_config_validation() {
    assert!(HydrographConfig::from_toml_str("value_floor = 0.0").is_err());
    assert!(HydrographConfig::from_toml_str("width = 60.0").is_err());
    assert!(HydrographConfig::from_toml_str("width = \"wide\"").is_err());
    assert!(HydrographConfig::from_toml_str("").is_ok());
}
