//! Business logic services for the Asset Inventory Platform

pub mod category;
pub mod codes;
pub mod department;
pub mod product;
pub mod propagation;
pub mod repair;
pub mod repair_status;
pub mod reporting;
pub mod status;
pub mod transfer;
pub mod vendor;

pub use category::CategoryService;
pub use codes::{CodeGenerator, CodeLookup};
pub use department::DepartmentService;
pub use product::ProductService;
pub use propagation::StatusPropagator;
pub use repair::RepairService;
pub use repair_status::RepairStatusService;
pub use reporting::ReportingService;
pub use status::StatusService;
pub use transfer::TransferService;
pub use vendor::VendorService;
