pub mod config;
pub mod domain;
pub mod errors;

pub use domain::page::{Page, PageRequest, Sort, SortDirection, SortProperty};
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
