pub mod record;
pub mod record_set;

pub use record::Record;
pub use record_set::{RecordSet, Summary};
