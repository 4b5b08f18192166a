//! End-to-end run lifecycle through the public controller API.

use std::thread;
use std::time::{Duration, Instant};

use sortviz_core::{
    Advance, Algorithm, ArrayGenerator, Config, Controller, EngineError, Presenter, Role,
    RunState, Snapshot, VALUE_MAX, VALUE_MIN,
};

#[derive(Default)]
struct Collector {
    snapshots: Vec<Snapshot>,
    statuses: Vec<RunState>,
}

impl Presenter for Collector {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.snapshots.push(snapshot.clone());
    }

    fn on_status_change(&mut self, state: RunState) {
        self.statuses.push(state);
    }
}

fn fast_controller(algorithm: Algorithm, seed: u64) -> Controller {
    let config = Config::new(algorithm, 32, 10).unwrap();
    Controller::with_generator(config, ArrayGenerator::seeded(seed))
}

fn multiset(values: &[u32]) -> Vec<u32> {
    let mut out = values.to_vec();
    out.sort_unstable();
    out
}

fn step_until_done(controller: &mut Controller, presenter: &mut dyn Presenter) -> RunState {
    loop {
        match controller.advance(presenter).unwrap() {
            Advance::Suspend(_) => {}
            Advance::Finished(outcome) => return outcome.state,
            Advance::Idle => return controller.state(),
        }
    }
}

#[test]
fn every_algorithm_sorts_a_generated_array() {
    for (seed, algorithm) in Algorithm::ALL.into_iter().enumerate() {
        let mut controller = fast_controller(algorithm, seed as u64);
        let input = controller.array().to_vec();
        assert_eq!(input.len(), 32);
        assert!(input.iter().all(|v| (VALUE_MIN..=VALUE_MAX).contains(v)));

        let mut collector = Collector::default();
        controller.start(&mut collector).unwrap();
        assert_eq!(step_until_done(&mut controller, &mut collector), RunState::Completed);
        assert_eq!(controller.array(), multiset(&input).as_slice(), "{algorithm}");

        let last = collector.snapshots.last().unwrap();
        assert_eq!(last.array, controller.array());
        assert!((0..32).all(|i| last.role_at(i) == Some(Role::Sorted)));
    }
}

#[test]
fn snapshot_arrays_track_applied_steps() {
    let mut controller = fast_controller(Algorithm::Quick, 11);
    let mut replayed = controller.array().to_vec();
    let mut collector = Collector::default();
    controller.start(&mut collector).unwrap();
    step_until_done(&mut controller, &mut collector);

    for snapshot in &collector.snapshots {
        if let Some(step) = &snapshot.step {
            step.apply(&mut replayed).unwrap();
        }
        assert_eq!(replayed, snapshot.array, "diverged at seq {}", snapshot.seq);
    }
}

#[test]
fn second_start_is_rejected_while_running() {
    let mut controller = fast_controller(Algorithm::Bubble, 5);
    controller.start(&mut ()).unwrap();
    controller.advance(&mut ()).unwrap();
    assert_eq!(controller.start(&mut ()), Err(EngineError::AlreadyRunning));
    assert_eq!(step_until_done(&mut controller, &mut ()), RunState::Completed);
}

#[test]
fn stopped_insertion_run_holds_its_array() {
    let mut controller = fast_controller(Algorithm::Insertion, 9);
    let input = controller.array().to_vec();
    controller.start(&mut ()).unwrap();
    for _ in 0..40 {
        controller.advance(&mut ()).unwrap();
    }
    controller.stop();
    let at_stop = controller.array().to_vec();

    assert_eq!(step_until_done(&mut controller, &mut ()), RunState::Stopped);
    assert_eq!(controller.array(), at_stop.as_slice());
    assert_eq!(controller.array().len(), input.len());

    // Nothing moves afterwards either.
    assert_eq!(controller.advance(&mut ()), Ok(Advance::Idle));
    assert_eq!(controller.array(), at_stop.as_slice());
}

#[test]
fn regenerate_then_rerun_after_stop() {
    let mut controller = fast_controller(Algorithm::Heap, 2);
    let mut collector = Collector::default();
    controller.start(&mut collector).unwrap();
    controller.advance(&mut collector).unwrap();
    controller.stop();
    step_until_done(&mut controller, &mut collector);

    controller.acknowledge(&mut collector);
    assert_eq!(controller.regenerate(10), Ok(true));
    controller.start(&mut collector).unwrap();
    assert_eq!(step_until_done(&mut controller, &mut collector), RunState::Completed);
    assert_eq!(
        collector.statuses,
        [
            RunState::Running,
            RunState::Stopped,
            RunState::Idle,
            RunState::Running,
            RunState::Completed,
        ]
    );
}

#[test]
fn handle_stops_a_blocking_run_across_threads() {
    let config = Config::new(Algorithm::Selection, 100, 500).unwrap();
    let mut controller = Controller::with_generator(config, ArrayGenerator::seeded(77));
    let input = controller.array().to_vec();
    let handle = controller.handle();

    let worker = thread::spawn(move || {
        let outcome = controller.run(&mut ());
        (outcome, controller)
    });

    while !handle.is_running() {
        thread::sleep(Duration::from_millis(1));
    }
    let stopped_at = Instant::now();
    handle.stop();
    let (outcome, controller) = worker.join().unwrap();

    assert!(stopped_at.elapsed() < Duration::from_millis(400));
    assert_eq!(outcome.unwrap().state, RunState::Stopped);
    assert_eq!(multiset(controller.array()), multiset(&input));
    assert!(!handle.is_running());
}

#[test]
fn handle_delay_change_is_seen_by_controller() {
    let controller = fast_controller(Algorithm::Merge, 1);
    let handle = controller.handle();
    handle.set_delay(640).unwrap();
    assert_eq!(controller.delay(), Duration::from_millis(640));
    assert_eq!(controller.config().delay_ms(), 640);
}

#[test]
fn sorted_positions_keep_their_value_for_the_rest_of_the_run() {
    let inputs: [&[u32]; 3] = [&[1, 2, 3, 0], &[5, 3, 4, 1, 2], &[40, 20, 40, 10, 30, 20]];
    for algorithm in Algorithm::ALL {
        for input in inputs {
            let config = Config::new(algorithm, 10, 10).unwrap();
            let mut controller = Controller::new(config);
            assert!(controller.load(input.to_vec()));
            let mut collector = Collector::default();
            controller.start(&mut collector).unwrap();
            assert_eq!(step_until_done(&mut controller, &mut collector), RunState::Completed);

            let snapshots = &collector.snapshots;
            for (at, snapshot) in snapshots.iter().enumerate() {
                for index in 0..input.len() {
                    if snapshot.role_at(index) != Some(Role::Sorted) {
                        continue;
                    }
                    let value = snapshot.array[index];
                    for later in &snapshots[at + 1..] {
                        assert_eq!(
                            later.array[index], value,
                            "{algorithm} on {input:?}: index {index} changed after seq {}",
                            snapshot.seq
                        );
                    }
                }
            }
        }
    }
}
