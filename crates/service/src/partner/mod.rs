//! Partner module: three-layer architecture (domain, repository, service).

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{CreatePartnerInput, Partner};
pub use repository::PartnerRepository;
pub use service::PartnerService;
