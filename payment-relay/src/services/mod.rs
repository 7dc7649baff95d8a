pub mod metrics;
pub mod phonepe;
pub mod token_store;

pub use metrics::{get_metrics, init_metrics};
pub use phonepe::PhonePeClient;
pub use token_store::AccessTokenStore;
