pub mod manifest;
pub mod reference;
