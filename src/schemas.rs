use compute::fees::FeeLedger;
use compute::grading::GradeClassifier;
use moka::future::Cache;
use model::entities::school_settings;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::config::AppConfig;

pub use common::ApiResponse;

/// Cache key of the school settings singleton.
pub const SETTINGS_CACHE_KEY: &str = "school_settings";

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for rarely changing rows
    pub cache: Cache<String, CachedData>,
    /// Runtime configuration
    pub config: AppConfig,
    /// Balance computation and payment recording
    pub ledger: FeeLedger,
    /// Score to letter classification
    pub classifier: GradeClassifier,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl())
            .build();
        let ledger = compute::default_compute(None).with_max_attempts(config.receipt_max_attempts);

        Self {
            db,
            cache,
            config,
            ledger,
            classifier: GradeClassifier::new(),
        }
    }

    /// Replaces the fee ledger, e.g. to pin the date stamped on payments.
    pub fn with_ledger(mut self, ledger: FeeLedger) -> Self {
        self.ledger = ledger;
        self
    }
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Settings(school_settings::Model),
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::students::create_student,
        crate::handlers::students::get_students,
        crate::handlers::students::get_student,
        crate::handlers::students::update_student,
        crate::handlers::students::get_student_fees,
        crate::handlers::students::get_student_fee_balance,
        crate::handlers::students::get_student_attendance,
        crate::handlers::students::get_student_grades,
        crate::handlers::teachers::create_teacher,
        crate::handlers::teachers::get_teachers,
        crate::handlers::teachers::get_teacher,
        crate::handlers::teachers::update_teacher,
        crate::handlers::teachers::delete_teacher,
        crate::handlers::classes::create_class,
        crate::handlers::classes::get_classes,
        crate::handlers::classes::get_class,
        crate::handlers::classes::update_class,
        crate::handlers::classes::delete_class,
        crate::handlers::subjects::get_subjects,
        crate::handlers::fee_structures::create_fee_structure,
        crate::handlers::fee_structures::get_fee_structures,
        crate::handlers::fee_structures::get_fee_structure,
        crate::handlers::fee_structures::update_fee_structure,
        crate::handlers::fee_structures::delete_fee_structure,
        crate::handlers::fee_payments::create_fee_payment,
        crate::handlers::fee_payments::get_fee_payments,
        crate::handlers::fee_payments::get_fee_payment_receipt,
        crate::handlers::attendance::get_attendance,
        crate::handlers::attendance::save_attendance,
        crate::handlers::grades::create_grade,
        crate::handlers::grades::get_grades,
        crate::handlers::grades::get_grade,
        crate::handlers::grades::update_grade,
        crate::handlers::grades::delete_grade,
        crate::handlers::timetable::create_timetable_entry,
        crate::handlers::timetable::get_timetable_entries,
        crate::handlers::timetable::get_timetable_entry,
        crate::handlers::timetable::update_timetable_entry,
        crate::handlers::timetable::delete_timetable_entry,
        crate::handlers::timetable::get_timetable_grid,
        crate::handlers::settings::get_settings,
        crate::handlers::settings::update_settings,
        crate::handlers::settings::get_grading_settings,
        crate::handlers::settings::update_grading_settings,
        crate::handlers::settings::classify_score,
        crate::handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            crate::handlers::students::CreateStudentRequest,
            crate::handlers::students::UpdateStudentRequest,
            crate::handlers::students::StudentResponse,
            crate::handlers::students::StudentFeesResponse,
            crate::handlers::students::StudentAttendanceResponse,
            crate::handlers::students::FeeBalanceResponse,
            crate::handlers::teachers::CreateTeacherRequest,
            crate::handlers::teachers::UpdateTeacherRequest,
            crate::handlers::teachers::TeacherResponse,
            crate::handlers::classes::CreateClassRequest,
            crate::handlers::classes::UpdateClassRequest,
            crate::handlers::classes::ClassResponse,
            crate::handlers::subjects::SubjectResponse,
            crate::handlers::fee_structures::CreateFeeStructureRequest,
            crate::handlers::fee_structures::UpdateFeeStructureRequest,
            crate::handlers::fee_structures::FeeStructureResponse,
            crate::handlers::fee_payments::CreateFeePaymentRequest,
            crate::handlers::fee_payments::FeePaymentResponse,
            crate::handlers::fee_payments::ReceiptResponse,
            crate::handlers::fee_payments::RecentPaymentResponse,
            crate::handlers::attendance::SaveAttendanceRequest,
            crate::handlers::attendance::AttendanceMark,
            crate::handlers::attendance::AttendanceResponse,
            crate::handlers::attendance::RosterEntryResponse,
            crate::handlers::grades::CreateGradeRequest,
            crate::handlers::grades::UpdateGradeRequest,
            crate::handlers::grades::GradeResponse,
            crate::handlers::timetable::CreateTimetableEntryRequest,
            crate::handlers::timetable::UpdateTimetableEntryRequest,
            crate::handlers::timetable::TimetableEntryResponse,
            crate::handlers::settings::SettingsResponse,
            crate::handlers::settings::UpdateSettingsRequest,
            crate::handlers::settings::GradingThresholdsBody,
            crate::handlers::settings::ClassificationResponse,
            crate::handlers::dashboard::DashboardResponse,
            common::FeeSummary,
            common::FeeStructureBalance,
            common::ReceiptBreakdown,
            common::AttendanceSummary,
            common::GradeReport,
            common::TermSummary,
            common::SubjectPerformance,
            common::TimetableGrid,
            common::TimetableDay,
            common::TimetableSlot,
            common::DashboardCounts,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "students", description = "Student registry, balances, attendance and reports"),
        (name = "teachers", description = "Teacher registry"),
        (name = "classes", description = "Classes and class teachers"),
        (name = "subjects", description = "Subject list"),
        (name = "fees", description = "Fee structures, payments and receipts"),
        (name = "attendance", description = "Daily attendance"),
        (name = "grades", description = "Grades and classification"),
        (name = "timetable", description = "Lesson timetable"),
        (name = "settings", description = "School settings and grading thresholds"),
        (name = "dashboard", description = "Administrator dashboard"),
    ),
    info(
        title = "EduRust API",
        description = "School administration API: students, fees, attendance, grades and timetable",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
