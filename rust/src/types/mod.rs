//! Request and response DTOs for the comparison tools.
//!
//! Field names follow the server's camelCase JSON. Optional request fields are
//! omitted when unset, so a serialized request is exactly what the caller built.

mod banking;
mod common;
mod credit_cards;
mod loans;

pub use banking::*;
pub use common::*;
pub use credit_cards::*;
pub use loans::*;

/// A response that can carry the HTML widget returned next to its JSON body.
pub trait WithWidget {
    fn set_widget(&mut self, widget: Option<String>);
}
