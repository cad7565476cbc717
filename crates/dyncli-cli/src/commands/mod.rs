pub mod docs;
pub mod gslb;
