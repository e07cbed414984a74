//! tally-domain
//!
//! Pure domain models for the tally ledger core (transactions, settlements,
//! loans, recurring schedules, invoices, investments, groups).
//! No I/O, no clock reads, no storage. Only data types, enums, and the
//! calendar/money arithmetic they carry.

pub mod common;
pub mod group;
pub mod investment;
pub mod invoice;
pub mod loan;
pub mod money;
pub mod recurring;
pub mod settlement;
pub mod transaction;

pub use common::*;
pub use group::*;
pub use investment::*;
pub use invoice::*;
pub use loan::*;
pub use recurring::*;
pub use settlement::*;
pub use transaction::*;
