pub mod search_request;
pub mod search_route;
