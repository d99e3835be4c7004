//! The seam between the substrate and business logic.

use privasset_types::Result;

use crate::context::TxContext;

/// Business logic executed inside a simulation.
///
/// Implementations must be deterministic: the same proposal against the same
/// snapshot must yield the same result bytes and read/write set on every
/// peer. No clocks, no randomness, no unordered iteration.
pub trait Chaincode: Send + Sync {
    /// Execute `function` with positional `args`. Returns the payload bytes
    /// handed back to the client (empty for pure writes).
    fn invoke(&self, ctx: &mut TxContext<'_>, function: &str, args: &[String]) -> Result<Vec<u8>>;
}
