//! Detective Quest: explore a binary layout of rooms, collect clues into an ordered
//! notebook, resolve each clue to a suspect and make a final accusation.

pub mod detective;
pub mod graph;
pub mod investigation;
pub mod ledger;
pub mod scenario;
pub mod session;
pub mod suspect_index;


pub use detective::{ConsoleDetective, Detective, ScriptedDetective};
pub use graph::{Direction, LocationGraph, LocationId, RoomSpec};
pub use investigation::{Command, Investigation, Outcome, Phase, SOLVE_THRESHOLD, Verdict};
pub use ledger::ClueLedger;
pub use scenario::{Case, Scenario, ScenarioError, Testimony};
pub use session::play;
pub use suspect_index::{DEFAULT_BUCKET_COUNT, IndexError, SuspectIndex};
