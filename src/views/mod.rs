//! Page models that hold UI state between requests.
//!
//! Each view keeps the controls a user changes (years, search, page) and the
//! data its last successful refresh loaded. Refreshes are tagged with a
//! [`guard::Ticket`]; a response that arrives after a newer request of the
//! same kind was started is dropped.

pub mod guard;
pub mod item_analysis;
pub mod unit_analysis;

pub use guard::{RequestGuard, Slot, Ticket};
pub use item_analysis::{ItemAnalysisView, ItemTable};
pub use unit_analysis::{UnitAnalysisView, UnitTable};

/// Shown in place of a table that has nothing to show.
pub const NO_DATA_MESSAGE: &str = "Tidak ada data";
