use correct::subcmd_impls::discover::{discover_studies, Study, MAP1_SUFFIX, WORK_SUBDIR};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn mkdirs(root: &Path, dirs: &[&str]) {
    for d in dirs {
        fs::create_dir_all(root.join(d)).unwrap();
    }
}

#[test]
fn studies_are_sorted_and_filtered() {
    let root = tempdir().unwrap();
    mkdirs(
        root.path(),
        &[
            "M002/Study20190305/ucd",
            "M001/Study20180101/ucd",
            "M001/Study20170612/ucd",
            "M001/Other20170612/ucd",
            "X003/Study20180101/ucd",
            "M004",
        ],
    );
    fs::write(root.path().join("M005"), b"not a directory").unwrap();

    let studies = discover_studies(root.path(), "M", "St").unwrap();
    let ids: Vec<_> = studies.iter().map(Study::file_id).collect();
    assert_eq!(ids, ["M001_20170612", "M001_20180101", "M002_20190305"]);
    assert!(studies.iter().all(|s| s.dir.ends_with(WORK_SUBDIR)));
}

#[test]
fn study_paths() {
    let root = tempdir().unwrap();
    mkdirs(root.path(), &["M001/Study20180101_1/ucd"]);
    let studies = discover_studies(root.path(), "M", "St").unwrap();
    assert_eq!(studies.len(), 1);
    let s = &studies[0];
    assert_eq!(s.date(), "20180101");

    let (map1, map2) = s.map_paths();
    assert_eq!(
        map1.file_name().unwrap().to_str().unwrap(),
        format!("M001_20180101{MAP1_SUFFIX}")
    );
    assert_eq!(
        map2.file_name().unwrap().to_str().unwrap(),
        "M001_20180101_UCD_WMH_ZScore_to_template_1.nii.gz"
    );
    let (out1, out2) = s.output_paths("nii.gz");
    assert_eq!(out1, s.dir.join("v1_corrected_trace.nii.gz"));
    assert_eq!(out2, s.dir.join("v2_corrected_trace.nii.gz"));
}

#[test]
fn missing_root_is_an_error() {
    let root = tempdir().unwrap();
    assert!(discover_studies(&root.path().join("nope"), "M", "St").is_err());
}
