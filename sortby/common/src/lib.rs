pub mod error;
pub mod ordering;
pub mod record;
pub mod value;
