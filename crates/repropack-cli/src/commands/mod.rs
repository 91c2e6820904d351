pub mod completion;
pub mod create;
