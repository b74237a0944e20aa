//! Runs the bundled scenario files end to end

use std::path::{Path, PathBuf};

use grainfall::scenario::{
    ExecutionReport, ScenarioDefinition, ScenarioExecutor, ScenarioExecutorConfig,
};
use grainfall::simulation::SimConfig;

fn scenarios_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios")
}

fn run(name: &str, snapshot_dir: &Path) -> ExecutionReport {
    let path = scenarios_dir().join(name);
    let scenario = ScenarioDefinition::from_file(&path).unwrap();
    let mut world = scenario
        .create_world(100, 100, SimConfig::default())
        .unwrap();

    let mut executor = ScenarioExecutor::with_config(ScenarioExecutorConfig {
        snapshot_dir: snapshot_dir.to_path_buf(),
        cell_size: 2,
        seed: Some(12345),
        ..Default::default()
    });
    executor.execute_scenario(&scenario, &mut world).unwrap()
}

fn assert_passed(report: &ExecutionReport) {
    assert!(
        report.passed,
        "{} failed:\n{}",
        report.scenario_name,
        report
            .verification_failures
            .iter()
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    );
}

#[test]
fn test_every_bundled_scenario_parses() {
    let mut found = 0;
    for entry in std::fs::read_dir(scenarios_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "ron") {
            ScenarioDefinition::from_file(&path)
                .unwrap_or_else(|e| panic!("{}: {e:#}", path.display()));
            found += 1;
        }
    }
    assert!(found >= 4);
}

#[test]
fn test_sand_pile() {
    let dir = tempfile::tempdir().unwrap();
    let report = run("sand_pile.ron", dir.path());

    assert_passed(&report);
    assert_eq!(report.frames_executed, 80);
    assert_eq!(report.material_counts["sand"], 29);
    assert!(report.stats.cells_moved > 0);
    assert!(dir.path().join("sand_pile.png").exists());
}

#[test]
fn test_layered_liquids() {
    let dir = tempfile::tempdir().unwrap();
    let report = run("layered_liquids.ron", dir.path());
    assert_passed(&report);
}

#[test]
fn test_hourglass_drains() {
    let dir = tempfile::tempdir().unwrap();
    let report = run("hourglass.ron", dir.path());

    assert_passed(&report);
    assert_eq!(report.snapshots.len(), 2);
    // Two ticks per frame
    assert_eq!(report.performance.tick_count, 400);

    let start = image::open(dir.path().join("hourglass_start.png")).unwrap();
    assert_eq!((start.width(), start.height()), (160, 120));
}

#[test]
fn test_campfire_heats_air() {
    let dir = tempfile::tempdir().unwrap();
    let report = run("campfire.ron", dir.path());

    assert_passed(&report);
    assert!(report.material_counts.contains_key("fire"));
    assert!(dir.path().join("campfire.png").exists());
}

#[test]
fn test_report_written_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let report = run("layered_liquids.ron", dir.path());

    let path = dir.path().join("report.json");
    report.save_json(&path).unwrap();
    let loaded = ExecutionReport::from_json(&path).unwrap();

    assert_eq!(loaded.scenario_name, "Layered liquids");
    assert_eq!(loaded.seed, 12345);
    assert_eq!(loaded.material_counts, report.material_counts);
    assert!(loaded.success());
}
