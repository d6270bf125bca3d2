pub mod azure;
pub mod publish;
