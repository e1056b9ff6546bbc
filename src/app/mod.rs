pub mod batch;
pub mod interactive;
