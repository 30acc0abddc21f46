pub mod attendance;
pub mod classes;
pub mod dashboard;
pub mod fee_payments;
pub mod fee_structures;
pub mod grades;
pub mod health;
pub mod settings;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod timetable;
