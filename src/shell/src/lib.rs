pub mod config;
pub mod http_client;
pub mod intent;
pub mod rtdb_client;
pub mod shell;
pub mod sse;
pub mod view;
