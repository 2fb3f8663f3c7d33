/// optiview — console for the Kruize optimization service.
///
/// The library owns the client-side reconciliation engine: it polls the
/// service's health, inventory-scan, and profile-diff endpoints, merges the
/// three independently-arriving snapshots into one consistent view, and
/// drives the remote install/update operations.
///
/// Module map:
///
/// - [`model`] — wire types for the three endpoints + scan field normalizer
/// - [`table`] — text/label filtering and pagination with page-reset rules
/// - [`client`] — HTTP surface (`OptimizerApi` trait + `ureq` implementation)
/// - [`session`] — fetch orchestrator owning snapshots and operation flags
/// - [`view`] — pure derivation of the renderable dashboard structure
/// - [`config`] — base URL / timeout resolution (defaults → TOML → env)
/// - [`cli`] — terminal rendering for the binary
pub mod cli;
pub mod client;
pub mod config;
pub mod model;
pub mod session;
pub mod table;
pub mod view;
