//! NDJSON recording of a full run.

use std::io::Cursor;

use serde_json::Value;
use sortviz_core::{Algorithm, ArrayGenerator, Config, Controller, SnapshotRecorder, Step};

fn parse(bytes: &[u8]) -> Vec<Value> {
    std::str::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn recorded_run_reconstructs_final_array() {
    let config = Config::new(Algorithm::Merge, 12, 10).unwrap();
    let mut controller = Controller::with_generator(config, ArrayGenerator::seeded(4));
    let input = controller.array().to_vec();

    let mut recorder = SnapshotRecorder::with_writer(Cursor::new(Vec::new()), 0).unwrap();
    let outcome = controller.run(&mut recorder).unwrap();
    let records = parse(&recorder.finish().unwrap().into_inner());

    assert_eq!(records[0]["type"], "header");
    assert_eq!(records[1]["type"], "status");
    assert_eq!(records[1]["state"], "running");
    let last = records.last().unwrap();
    assert_eq!(last["type"], "status");
    assert_eq!(last["state"], "completed");

    // Replaying the recorded steps over the input reproduces every snapshot.
    let mut replayed = input;
    let snapshots: Vec<&Value> = records.iter().filter(|r| r["type"] == "snapshot").collect();
    assert_eq!(snapshots.len() as u64, outcome.summary.steps + 1);
    for record in snapshots {
        let step: Option<Step> = serde_json::from_value(record["step"].clone()).unwrap();
        if let Some(step) = step {
            step.apply(&mut replayed).unwrap();
        }
        let array: Vec<u32> = serde_json::from_value(record["array"].clone()).unwrap();
        assert_eq!(array, replayed);
    }
    assert_eq!(replayed.as_slice(), controller.array());
}
