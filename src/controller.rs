/// Admin console endpoints
pub mod admin;
/// Public registration, lookup and print endpoints
pub mod registrations;
