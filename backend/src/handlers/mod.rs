//! HTTP request handlers

pub mod category;
pub mod department;
pub mod health;
pub mod product;
pub mod repair;
pub mod repair_status;
pub mod reporting;
pub mod status;
pub mod transfer;
pub mod vendor;

pub use category::*;
pub use department::*;
pub use health::*;
pub use product::*;
pub use repair::*;
pub use repair_status::*;
pub use reporting::*;
pub use status::*;
pub use transfer::*;
pub use vendor::*;
