pub mod config;
pub mod console;
pub mod digest;
pub mod error;
pub mod jump;
pub mod machine;
pub mod metrics;
pub mod mixer;
pub mod opcode;
pub mod secret;
pub mod tape;
