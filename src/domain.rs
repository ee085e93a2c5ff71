mod area_of_interest;
mod email_address;
mod full_name;
mod gender;
mod phone_number;
mod program_degree;
mod registree_status;
mod serial_id;

pub use area_of_interest::AreaOfInterest;
pub use email_address::EmailAddress;
pub use full_name::FullName;
pub use gender::Gender;
pub use phone_number::PhoneNumber;
pub use program_degree::ProgramDegree;
pub use registree_status::RegistreeStatus;
pub use serial_id::SerialId;
