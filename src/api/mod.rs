pub mod activity;
pub mod auth;
pub mod balance;
pub mod client;
pub mod event;
pub mod group;
pub mod market_data;
pub mod misc;
pub mod notification;
pub mod order;
pub mod prediction;
pub mod transport;

pub use client::{ApiClient, ResponseBody};
pub use transport::{ApiRequest, Method, RawResponse, ReqwestTransport, Transport, TransportError};
