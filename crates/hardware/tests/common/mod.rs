/// Board fixtures and session constructors.
pub mod harness;
