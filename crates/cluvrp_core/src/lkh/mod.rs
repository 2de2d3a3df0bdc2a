pub mod par_batch;
pub mod parameters;
pub mod problem;
pub(crate) mod spec_writer;
