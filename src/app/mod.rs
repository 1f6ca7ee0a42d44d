pub mod run;

pub use run::{RunOutcome, RunRequest, run_template};
