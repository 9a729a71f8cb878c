//! Top-level orchestration: compile, validate, verify, and heal a journey
//! end to end (spec.md §4.13, §4.17, and the forward/feedback data flow in
//! §2).
//!
//! Grounded on the reference workspace's `engine::state` typestate-enum
//! pattern (`ToolLoopPhase`/`ApprovalState`), generalized here from a chat
//! tool-loop's phases to a Journey-compiler pipeline's stages. This crate is
//! the seam an external CLI (out of scope per spec.md §1) calls into: it
//! owns no argument parsing or process dispatch, only the orchestration
//! logic itself.

pub mod compile;
pub mod context;
pub mod state;
pub mod variant;
pub mod verify;

pub use compile::{compile_journey, CompiledJourney};
pub use context::WaymarkContext;
pub use state::{block, default_state_path, load_or_init, record_artifact, transition};
pub use variant::detect_variant;
pub use verify::{should_fail_on_flaky, verify, RunOptions, TestRunner};
