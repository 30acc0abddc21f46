//! SeaORM entities for the school registry.
//!
//! Students, staff and classes are plain records. Fee structures, payments,
//! attendance marks and grades hang off a student. The grading system and
//! school settings tables hold the process-wide configuration rows.

pub mod attendance;
pub mod fee_payment;
pub mod fee_structure;
pub mod grade;
pub mod grading_system;
pub mod school_class;
pub mod school_settings;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod timetable_entry;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::attendance::Entity as Attendance;
    pub use super::fee_payment::Entity as FeePayment;
    pub use super::fee_structure::Entity as FeeStructure;
    pub use super::grade::Entity as Grade;
    pub use super::grading_system::Entity as GradingSystem;
    pub use super::school_class::Entity as SchoolClass;
    pub use super::school_settings::Entity as SchoolSettings;
    pub use super::student::Entity as Student;
    pub use super::subject::Entity as Subject;
    pub use super::teacher::Entity as Teacher;
    pub use super::timetable_entry::Entity as TimetableEntry;
}
