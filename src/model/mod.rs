//! Typed models of the k8s.mariadb.com/v1alpha1 CRDs.

pub mod backup;
pub mod common;
pub mod database;
pub mod maxscale;
pub mod meta;
pub mod user;

pub use backup::BackupSpec;
pub use database::DatabaseSpec;
pub use maxscale::MaxScaleSpec;
pub use meta::ObjectMeta;
pub use user::UserSpec;
