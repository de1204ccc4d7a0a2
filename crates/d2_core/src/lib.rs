pub mod core_api;
