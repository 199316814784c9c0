pub mod cache;
pub mod emi;
pub mod handlers;
pub mod ingest;
pub mod loan_type;
pub mod prompts;
pub mod repository;
