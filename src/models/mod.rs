//! Data Transfer Objects
//!
//! Request and response bodies of the inspection API.

pub mod requests;
pub mod responses;

pub use requests::{SetRequest, MAX_KEY_LENGTH};
pub use responses::{
    ClearResponse, DeleteResponse, ErrorResponse, ExistsResponse, GetResponse, HealthResponse,
    SetResponse,
};
