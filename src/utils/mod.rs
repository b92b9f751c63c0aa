pub mod client_ip;
pub mod codegen;
pub mod url_norm;
