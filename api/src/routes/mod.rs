pub mod health_route;
pub mod history;
pub mod repositories_route;
pub mod search;
pub mod session;
