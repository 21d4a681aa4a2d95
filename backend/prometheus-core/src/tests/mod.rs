mod config;
mod envelope;
mod error;
mod payload;
