mod helpers;
mod operations;
mod prometheus_client;
