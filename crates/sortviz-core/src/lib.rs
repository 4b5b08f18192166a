#![forbid(unsafe_code)]

//! Instrumented sorting engine for sorting visualizers.
//!
//! Six classic algorithms (bubble, selection, insertion, merge, quick,
//! heap) are expressed as lazy [`StepProducer`]s. The [`Controller`] owns
//! the canonical array, applies one [`Step`] at a time, and hands a
//! [`Snapshot`] to a [`Presenter`] after each, pausing for the configured
//! delay in between. A run can be stopped at any suspension point.
//!
//! # Key Components
//!
//! - [`Step`] - One observable action: compare, highlight, swap, overwrite
//! - [`StepProducer`] - Per-algorithm state machine emitting steps
//! - [`Controller`] - Run lifecycle, cancellation, and delay pacing
//! - [`ControlHandle`] - Cross-thread stop and delay control
//! - [`ArrayGenerator`] - Random bar heights in `20..=319`
//! - `SnapshotRecorder` - NDJSON capture of a run (feature `serde`)
//!
//! # Example
//! ```
//! use sortviz_core::{Algorithm, Config, Controller, RunState};
//!
//! let config = Config::new(Algorithm::Heap, 10, 10).unwrap();
//! let mut controller = Controller::new(config);
//! controller.load(vec![5, 3, 4, 1, 2]);
//! let outcome = controller.run(&mut ()).unwrap();
//! assert_eq!(outcome.state, RunState::Completed);
//! assert_eq!(controller.array(), &[1, 2, 3, 4, 5]);
//! ```

pub mod algorithm;
pub mod algorithms;
pub mod cancel;
pub mod config;
pub mod controller;
pub mod error;
pub mod generator;
#[cfg(feature = "serde")]
pub mod recorder;
pub mod step;

pub use algorithm::{Algorithm, AlgorithmInfo};
pub use algorithms::{StepProducer, replay};
pub use cancel::CancelToken;
pub use config::{Config, DEFAULT_DELAY_MS, DEFAULT_SIZE, DELAY_RANGE_MS, SIZE_RANGE};
pub use controller::{
    Advance, ControlHandle, Controller, Highlight, Presenter, RunOutcome, RunState, RunSummary,
    Snapshot,
};
pub use error::{ConfigError, EngineError, EngineFailure};
pub use generator::{ArrayGenerator, VALUE_MAX, VALUE_MIN};
#[cfg(feature = "serde")]
pub use recorder::SnapshotRecorder;
pub use step::{Indices, Role, Step};
