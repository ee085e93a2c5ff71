mod registration;

pub use registration::{
    filter, AcademicBackground, AlumniRecord, Engagement, NewRegistration, PersonalDetails,
    ProfessionalInfo, RecordUpdate,
};
