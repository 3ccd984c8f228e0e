pub mod error;
mod failure;
mod package;
pub mod status;
mod version;
mod vso;

pub use error::*;
pub use failure::FailureType;
pub use package::{
    NO_SUPPRESSION_FILE, NO_SUPPRESSIONS_DEFINED, PackageData, is_data_plane_path,
};
pub use status::{SdkAutoStatus, Severity, StatusContainer, merge};
pub use version::{VersionKind, classify_version};
pub use vso::{TaskLogs, VsoLogs};
