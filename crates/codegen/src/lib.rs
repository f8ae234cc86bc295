//! Artifact generators for the micro gateway CLI
//!
//! Production implementations of the generator traits in
//! [`mgw_runtime::deps`]: throttle policies, API service sources, project
//! initialization and distribution packaging.

pub mod distribution;
pub mod policy;
pub mod project;
pub mod source;
mod templates;

pub use distribution::ZipDistributionPackager;
pub use policy::ThrottlePolicyGenerator;
pub use project::BallerinaProjectInitializer;
pub use source::ServiceSourceGenerator;
