//! Sailperf core: GPS-spor + vindobservasjoner → datasett per punkt
//! (kurs, vindretning, vind/båt-vinkel, fartsforhold, vinkelbøtte).

pub mod analyze_tour;
pub mod cli;
pub mod error;
pub mod fusion;
pub mod geo;
pub mod kinematics;
pub mod metrics;
pub mod models;
pub mod smoothing;
pub mod storage;
pub mod summary;
pub mod track;
pub mod types;
pub mod wind;

#[cfg(feature = "python")]
mod py;

pub use analyze_tour::{analyze_tour, analyze_track, TourInputs, TourOutputs, TrackAnalysis};
pub use error::{PerfError, Result};
pub use fusion::fuse;
pub use geo::{angular_difference, bearing, destination_point};
pub use metrics::gather_text;
pub use models::{FusedRecord, RawPoint, RawSegment, Track, TrackPoint, WindObservation};
pub use storage::{load_config, save_config};
pub use types::{PerfConfig, TimeWindow};
pub use wind::{StaticWindProvider, WindArchive, WindProvider, WindSeries};
