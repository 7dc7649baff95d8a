pub mod caller_token;
pub mod metrics;
pub mod request_id;

pub use caller_token::CallerToken;
pub use metrics::metrics_middleware;
pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
