mod registrations;
mod users;

pub use registrations::{PgRegistrationRepo, RegistrationRepo};
pub use users::{NewUser, UserCredentials, UsersRepo};
