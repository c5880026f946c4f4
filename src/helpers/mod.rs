pub mod xml;
pub mod zip;
