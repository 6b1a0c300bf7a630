//! HTTP implementations of the DocuBrain QA contract.

pub mod qa_api_client;

pub use qa_api_client::QaApiClient;
