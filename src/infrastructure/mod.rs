pub mod db;
pub mod gateways;
pub mod repositories;
