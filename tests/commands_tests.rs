//! End-to-end tests of the netcdf_app and nc_cmp commands
//!
//! Every test builds its own NetCDF files in a temporary directory and checks
//! the exact text a command writes.

use nc_probe::attributes::AttributeKind;
use nc_probe::commands::{
    compare_field, run_attr, run_compare, run_data, run_dim, run_headers, run_string,
};
use nc_probe::element::ElementType;
use nc_probe::errors::{NcProbeError, Result};
use nc_probe::statistics::IgnoreThreshold;
use ndarray::{arr0, arr1, Array2, Array3};
use netcdf::create;
use netcdf::types::{NcTypeDescriptor, NcVariableType};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// NetCDF text character, stored as `CHAR`
#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
struct NcChar(u8);

unsafe impl NcTypeDescriptor for NcChar {
    fn type_descriptor() -> NcVariableType {
        NcVariableType::Char
    }
}

fn chars(text: &[u8]) -> Vec<NcChar> {
    text.iter().copied().map(NcChar).collect()
}

/// File with a 3-D float field, 2-D and 1-D fields of every integer width, a
/// scalar, text and string variables, plus a few attributes
fn create_fixture(dir: &Path) -> std::result::Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join("fixture.nc");
    let mut file = create(&path)?;

    file.add_dimension("time", 3)?;
    file.add_dimension("lat", 2)?;
    file.add_dimension("lon", 4)?;
    file.add_dimension("nchar", 5)?;

    let temp = Array3::from_shape_vec((3, 2, 4), (0..24).map(|i| i as f32).collect())?;
    let mut var = file.add_variable::<f32>("temp", &["time", "lat", "lon"])?;
    var.put_attribute("units", "K")?;
    var.put_attribute("scale_factor", 0.5f64)?;
    var.put_attribute("valid_count", 24i32)?;
    var.put_attribute("flag_values", vec![0i8, 1, -1])?;
    var.put_attribute("valid_min", -5i8)?;
    var.put_attribute("sample_total", 1i64 << 40)?;
    var.put(temp.view(), ..)?;

    let counts = Array2::from_shape_vec((3, 4), (0..12).map(|i: i32| i * 10).collect())?;
    let mut var = file.add_variable::<i32>("counts", &["time", "lon"])?;
    var.put(counts.view(), ..)?;

    let mut var = file.add_variable::<i8>("flags", &["lon"])?;
    var.put(arr1(&[-2i8, -1, 0, 1]).view(), ..)?;

    let mut var = file.add_variable::<u8>("levels", &["lon"])?;
    var.put(arr1(&[0u8, 100, 200, 255]).view(), ..)?;

    let mut var = file.add_variable::<f64>("scale", &[])?;
    var.put(arr0(2.5f64).view(), ..)?;

    file.add_string_variable("names", &["time"])?;

    let mut var = file.add_variable::<NcChar>("label", &["nchar"])?;
    var.put_values(&chars(b"ocean"), ..)?;

    let mut var = file.add_variable::<NcChar>("grid", &["lat", "lon"])?;
    var.put_values(&chars(b"abcdefgh"), ..)?;

    let mut var = file.add_variable::<i16>("shorts", &["lon"])?;
    var.put(arr1(&[-300i16, -1, 0, 300]).view(), ..)?;

    let mut var = file.add_variable::<u16>("ushorts", &["lon"])?;
    var.put(arr1(&[0u16, 1, 60000, 65535]).view(), ..)?;

    let mut var = file.add_variable::<u32>("uints", &["lon"])?;
    var.put(arr1(&[0u32, 1, 3_000_000_000, u32::MAX]).view(), ..)?;

    file.add_attribute("title", "Probe fixture")?;

    Ok(path)
}

fn fixture() -> (TempDir, String) {
    let dir = tempdir().unwrap();
    let path = create_fixture(dir.path()).unwrap();
    (dir, path.to_str().unwrap().to_string())
}

fn capture<F>(command: F) -> (Result<()>, String)
where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
{
    let mut out = Vec::new();
    let result = command(&mut out);
    (result, String::from_utf8(out).unwrap())
}

fn data(var: &str, indices: &[&str], path: &str) -> (Result<()>, String) {
    capture(|out| run_data(var, indices, path, out))
}

#[test]
fn test_headers_lists_dimensions_then_variables() {
    let (_dir, path) = fixture();
    let (result, text) = capture(|out| run_headers(&path, out));
    result.unwrap();
    assert_eq!(
        text,
        "dim time 3\n\
         dim lat 2\n\
         dim lon 4\n\
         dim nchar 5\n\
         var temp FLOAT time lat lon\n\
         var counts INT time lon\n\
         var flags BYTE lon\n\
         var levels UBYTE lon\n\
         var scale DOUBLE\n\
         var names STRING time\n\
         var label CHAR nchar\n\
         var grid CHAR lat lon\n\
         var shorts SHORT lon\n\
         var ushorts USHORT lon\n\
         var uints UINT lon\n"
    );
}

#[test]
fn test_data_full_variable_wraps_on_last_dimension() {
    let (_dir, path) = fixture();
    let (result, text) = data("temp", &[], &path);
    result.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "0 1 2 3");
    assert_eq!(lines[5], "20 21 22 23");
}

#[test]
fn test_data_with_leading_indices() {
    let (_dir, path) = fixture();

    let (result, text) = data("temp", &["1"], &path);
    result.unwrap();
    assert_eq!(text, "8 9 10 11\n12 13 14 15\n");

    let (result, text) = data("temp", &["2", "1"], &path);
    result.unwrap();
    assert_eq!(text, "20 21 22 23\n");

    let (result, text) = data("temp", &["1", "0", "2"], &path);
    result.unwrap();
    assert_eq!(text, "10\n");

    let (result, text) = data("counts", &["2"], &path);
    result.unwrap();
    assert_eq!(text, "80 90 100 110\n");
}

#[test]
fn test_data_small_integer_types() {
    let (_dir, path) = fixture();

    let (result, text) = data("flags", &[], &path);
    result.unwrap();
    assert_eq!(text, "-2 -1 0 1\n");

    let (result, text) = data("levels", &[], &path);
    result.unwrap();
    assert_eq!(text, "0 100 200 255\n");
}

#[test]
fn test_data_wider_integer_types() {
    let (_dir, path) = fixture();

    let (result, text) = data("shorts", &[], &path);
    result.unwrap();
    assert_eq!(text, "-300 -1 0 300\n");

    let (result, text) = data("ushorts", &[], &path);
    result.unwrap();
    assert_eq!(text, "0 1 60000 65535\n");

    let (result, text) = data("uints", &[], &path);
    result.unwrap();
    assert_eq!(text, "0 1 3000000000 4294967295\n");
}

#[test]
fn test_data_char_prints_byte_values() {
    let (_dir, path) = fixture();

    let (result, text) = data("label", &[], &path);
    result.unwrap();
    assert_eq!(text, "111 99 101 97 110\n");

    let (result, text) = data("grid", &["1"], &path);
    result.unwrap();
    assert_eq!(text, "101 102 103 104\n");
}

#[test]
fn test_string_prints_text_variable() {
    let (_dir, path) = fixture();

    let (result, text) = capture(|out| run_string("label", &path, out));
    result.unwrap();
    assert_eq!(text, "ocean\n");

    let (result, text) = capture(|out| run_string("grid", &path, out));
    match result {
        Err(NcProbeError::NotText {
            var,
            type_name,
            ndims,
        }) => {
            assert_eq!(var, "grid");
            assert_eq!(type_name, "CHAR");
            assert_eq!(ndims, 2);
        }
        other => panic!("Expected NotText, got {other:?}"),
    }
    assert!(text.is_empty());

    let (result, _) = capture(|out| run_string("flags", &path, out));
    assert!(matches!(result, Err(NcProbeError::NotText { .. })));
}

#[test]
fn test_data_scalar() {
    let (_dir, path) = fixture();
    let (result, text) = data("scale", &[], &path);
    result.unwrap();
    assert_eq!(text, "2.5\n");
}

#[test]
fn test_data_index_errors_write_nothing() {
    let (_dir, path) = fixture();

    let (result, text) = data("temp", &["0", "0", "0", "0"], &path);
    assert!(matches!(
        result,
        Err(NcProbeError::TooManyIndices { given: 4, ndims: 3 })
    ));
    assert!(text.is_empty());

    let (result, text) = data("temp", &["3"], &path);
    assert!(matches!(
        result,
        Err(NcProbeError::IndexOutOfRange {
            position: 0,
            index: 3,
            length: 3
        })
    ));
    assert!(text.is_empty());

    let (result, _) = data("temp", &["0", "one"], &path);
    match result {
        Err(e @ NcProbeError::MalformedIndex { .. }) => {
            assert_eq!(e.to_string(), "expected integer for index 1, got one");
        }
        other => panic!("Expected MalformedIndex, got {other:?}"),
    }
}

#[test]
fn test_data_unsupported_type() {
    let (_dir, path) = fixture();
    let (result, text) = data("names", &[], &path);
    match result {
        Err(NcProbeError::UnsupportedType { var, type_name }) => {
            assert_eq!(var, "names");
            assert_eq!(type_name, "STRING");
        }
        other => panic!("Expected UnsupportedType, got {other:?}"),
    }
    assert!(text.is_empty());
}

#[test]
fn test_missing_variable_and_file() {
    let (dir, path) = fixture();

    let (result, _) = data("pressure", &[], &path);
    assert!(matches!(result, Err(NcProbeError::VariableNotFound { .. })));

    let missing = dir.path().join("missing.nc");
    let (result, _) = data("temp", &[], missing.to_str().unwrap());
    assert!(matches!(result, Err(NcProbeError::Open { .. })));
}

#[test]
fn test_dim_prints_length() {
    let (_dir, path) = fixture();
    let (result, text) = capture(|out| run_dim("lon", &path, out));
    result.unwrap();
    assert_eq!(text, "4\n");

    let (result, _) = capture(|out| run_dim("depth", &path, out));
    assert!(matches!(result, Err(NcProbeError::DimensionNotFound { .. })));
}

#[test]
fn test_attr_natural_and_forced_forms() {
    let (_dir, path) = fixture();

    let attr = |owner: &str, att: &str, kind: Option<AttributeKind>| {
        capture(|out| run_attr(owner, att, &path, kind, out))
    };

    let (result, text) = attr("temp", "units", None);
    result.unwrap();
    assert_eq!(text, "K\n");

    let (result, text) = attr("NC_GLOBAL", "title", Some(AttributeKind::Text));
    result.unwrap();
    assert_eq!(text, "Probe fixture\n");

    let (result, text) = attr("temp", "valid_count", Some(AttributeKind::Int));
    result.unwrap();
    assert_eq!(text, "24\n");

    let (result, text) = attr("temp", "scale_factor", Some(AttributeKind::Float));
    result.unwrap();
    assert_eq!(text, "0.5\n");

    let (result, text) = attr("temp", "flag_values", None);
    result.unwrap();
    assert_eq!(text, "0 1 -1\n");

    let (result, text) = attr("temp", "valid_min", Some(AttributeKind::Int));
    result.unwrap();
    assert_eq!(text, "-5\n");

    let (result, text) = attr("temp", "sample_total", None);
    result.unwrap();
    assert_eq!(text, "1099511627776\n");

    let (result, text) = attr("temp", "sample_total", Some(AttributeKind::Int));
    result.unwrap();
    assert_eq!(text, "1099511627776\n");

    let (result, _) = attr("temp", "flag_values", Some(AttributeKind::Int));
    assert!(matches!(result, Err(NcProbeError::AttributeKind { .. })));

    let (result, text) = attr("temp", "units", Some(AttributeKind::Int));
    assert!(matches!(result, Err(NcProbeError::AttributeKind { .. })));
    assert!(text.is_empty());

    let (result, _) = attr("temp", "long_name", None);
    assert!(matches!(result, Err(NcProbeError::AttributeNotFound { .. })));

    let (result, _) = attr("pressure", "units", None);
    assert!(matches!(result, Err(NcProbeError::VariableNotFound { .. })));
}

/// Write a one-dimensional field `t` of the given element type
macro_rules! write_field {
    ($dir:expr, $name:expr, $t:ty, $values:expr) => {{
        let values: &[$t] = $values;
        let path = $dir.join($name);
        let mut file = create(&path).unwrap();
        file.add_dimension("x", values.len()).unwrap();
        let mut var = file.add_variable::<$t>("t", &["x"]).unwrap();
        var.put(arr1(values).view(), ..).unwrap();
        path.to_str().unwrap().to_string()
    }};
}

#[test]
fn test_compare_with_ignore_threshold() {
    let dir = tempdir().unwrap();
    let a = write_field!(dir.path(), "a.nc", f32, &[1.0, 2.0, 3.0, 100.0]);
    let b = write_field!(dir.path(), "b.nc", f32, &[1.0, 2.0, 3.0, 5.0]);

    let ign = IgnoreThreshold::new(50.0).unwrap();
    let report = compare_field("t", &a, &b, ign).unwrap();
    assert_eq!(report.element_type, ElementType::Float);
    assert_eq!(report.element_count, 4);
    assert_eq!(report.summary.first.count, 3);
    assert_eq!(report.summary.first.mean, 2.0);
    assert_eq!(report.summary.second.count, 4);
    assert_eq!(report.summary.second.mean, 2.75);
    assert_eq!(report.summary.mean_square_difference, 0.0);

    let (result, text) = capture(|out| run_compare("t", &a, &b, ign, out));
    result.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Ignoring values with absolute value >= 50");
    assert_eq!(lines[1], "Field t. 4 float elements");
    assert!(lines[2].starts_with("File "));
    assert!(lines[2].contains(": mean = 2 rms = "));
    assert!(lines[3].contains(": mean = 2.75 rms = "));
    assert_eq!(lines[4], "Mean square difference = 0");
}

#[test]
fn test_compare_without_threshold() {
    let dir = tempdir().unwrap();
    let a = write_field!(dir.path(), "a.nc", i32, &[1, 2, 3]);
    let b = write_field!(dir.path(), "b.nc", i32, &[2, 2, 5]);

    let (result, text) = capture(|out| run_compare("t", &a, &b, IgnoreThreshold::NONE, out));
    result.unwrap();
    assert!(text.starts_with("Field t. 3 integer elements\n"));
    assert!(text.ends_with("Mean square difference = 1.66667\n"));
}

#[test]
fn test_compare_byte_field() {
    let dir = tempdir().unwrap();
    let a = write_field!(dir.path(), "a.nc", i8, &[1, -3, 5]);
    let b = write_field!(dir.path(), "b.nc", i8, &[1, -1, 5]);

    let report = compare_field("t", &a, &b, IgnoreThreshold::NONE).unwrap();
    assert_eq!(report.element_type, ElementType::Byte);
    assert_eq!(report.summary.first.count, 3);
    assert_eq!(report.summary.second.count, 3);
    assert_eq!(report.summary.first.mean, 1.0);

    let text = report.to_string();
    assert!(text.starts_with("Field t. 3 byte elements\n"));
    assert!(text.contains(": mean = 1 rms = 3.41565\n"));
    assert!(text.contains(": mean = 1.66667 rms = "));
    assert!(text.ends_with("Mean square difference = 1.33333\n"));
}

#[test]
fn test_compare_char_field_counts_each_element_once() {
    let dir = tempdir().unwrap();
    let a = write_field!(dir.path(), "a.nc", NcChar, &chars(b"ab"));
    let b = write_field!(dir.path(), "b.nc", NcChar, &chars(b"ad"));

    let report = compare_field("t", &a, &b, IgnoreThreshold::NONE).unwrap();
    assert_eq!(report.element_type, ElementType::Char);
    assert_eq!(report.summary.first.count, 2);
    assert_eq!(report.summary.first.mean, 97.5);
    assert_eq!(report.summary.second.mean, 98.5);
    assert_eq!(report.summary.mean_square_difference, 2.0);
    assert!(report
        .to_string()
        .starts_with("Field t. 2 char elements\n"));
}

#[test]
fn test_compare_type_mismatch_writes_nothing() {
    let dir = tempdir().unwrap();
    let a = write_field!(dir.path(), "a.nc", f32, &[1.0, 2.0]);
    let b = write_field!(dir.path(), "b.nc", f64, &[1.0, 2.0]);

    let (result, text) = capture(|out| run_compare("t", &a, &b, IgnoreThreshold::NONE, out));
    assert!(matches!(result, Err(NcProbeError::TypeMismatch { .. })));
    assert!(text.is_empty());
}

#[test]
fn test_compare_count_mismatch() {
    let dir = tempdir().unwrap();
    let a = write_field!(dir.path(), "a.nc", i16, &[1, 2, 3]);
    let b = write_field!(dir.path(), "b.nc", i16, &[1, 2]);

    match compare_field("t", &a, &b, IgnoreThreshold::NONE) {
        Err(NcProbeError::ElementCountMismatch {
            first_count,
            second_count,
            ..
        }) => {
            assert_eq!(first_count, 3);
            assert_eq!(second_count, 2);
        }
        other => panic!("Expected ElementCountMismatch, got {other:?}"),
    }
}

#[test]
fn test_compare_everything_ignored() {
    let dir = tempdir().unwrap();
    let a = write_field!(dir.path(), "a.nc", f64, &[10.0, 20.0]);
    let b = write_field!(dir.path(), "b.nc", f64, &[1.0, 2.0]);

    let ign = IgnoreThreshold::new(10.0).unwrap();
    let (result, text) = capture(|out| run_compare("t", &a, &b, ign, out));
    assert!(matches!(
        result,
        Err(NcProbeError::NoQualifyingElements { .. })
    ));
    assert!(text.is_empty());
}
