pub mod session_request;
pub mod session_response;
pub mod session_route;
