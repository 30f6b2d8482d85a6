//! Domain types for PortLab.

pub mod bar;
pub mod fill;
pub mod order;
pub mod portfolio;
pub mod position;
pub mod snapshot;
pub mod trade;

pub use bar::Bar;
pub use fill::Fill;
pub use order::{Order, OrderSide};
pub use portfolio::Portfolio;
pub use position::Position;
pub use snapshot::EquitySnapshot;
pub use trade::TradeRecord;

/// Symbol type alias
pub type Symbol = String;
