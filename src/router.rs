use crate::handlers::{
    attendance::{get_attendance, save_attendance},
    classes::{create_class, delete_class, get_class, get_classes, update_class},
    dashboard::get_dashboard,
    fee_payments::{create_fee_payment, get_fee_payment_receipt, get_fee_payments},
    fee_structures::{
        create_fee_structure, delete_fee_structure, get_fee_structure, get_fee_structures,
        update_fee_structure,
    },
    grades::{create_grade, delete_grade, get_grade, get_grades, update_grade},
    health::health_check,
    settings::{
        classify_score, get_grading_settings, get_settings, update_grading_settings,
        update_settings,
    },
    students::{
        create_student, get_student, get_student_attendance, get_student_fee_balance,
        get_student_fees, get_student_grades, get_students, update_student,
    },
    subjects::get_subjects,
    teachers::{create_teacher, delete_teacher, get_teacher, get_teachers, update_teacher},
    timetable::{
        create_timetable_entry, delete_timetable_entry, get_timetable_entries,
        get_timetable_entry, get_timetable_grid, update_timetable_entry,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.config.request_timeout();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Students
        .route("/api/v1/students", post(create_student).get(get_students))
        .route(
            "/api/v1/students/:student_id",
            get(get_student).put(update_student),
        )
        .route("/api/v1/students/:student_id/fees", get(get_student_fees))
        .route(
            "/api/v1/students/:student_id/fees/:fee_structure_id/balance",
            get(get_student_fee_balance),
        )
        .route(
            "/api/v1/students/:student_id/attendance",
            get(get_student_attendance),
        )
        .route("/api/v1/students/:student_id/grades", get(get_student_grades))
        // Teachers
        .route("/api/v1/teachers", post(create_teacher).get(get_teachers))
        .route(
            "/api/v1/teachers/:teacher_id",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        // Classes and subjects
        .route("/api/v1/classes", post(create_class).get(get_classes))
        .route(
            "/api/v1/classes/:class_id",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route("/api/v1/subjects", get(get_subjects))
        // Fees
        .route(
            "/api/v1/fee-structures",
            post(create_fee_structure).get(get_fee_structures),
        )
        .route(
            "/api/v1/fee-structures/:fee_structure_id",
            get(get_fee_structure)
                .put(update_fee_structure)
                .delete(delete_fee_structure),
        )
        .route(
            "/api/v1/fee-payments",
            post(create_fee_payment).get(get_fee_payments),
        )
        .route(
            "/api/v1/fee-payments/:payment_id/receipt",
            get(get_fee_payment_receipt),
        )
        // Attendance and grades
        .route("/api/v1/attendance", get(get_attendance).post(save_attendance))
        .route("/api/v1/grades", post(create_grade).get(get_grades))
        .route(
            "/api/v1/grades/:grade_id",
            get(get_grade).put(update_grade).delete(delete_grade),
        )
        .route("/api/v1/grading/classify", get(classify_score))
        // Timetable
        .route(
            "/api/v1/timetable",
            post(create_timetable_entry).get(get_timetable_entries),
        )
        .route("/api/v1/timetable/grid", get(get_timetable_grid))
        .route(
            "/api/v1/timetable/:entry_id",
            get(get_timetable_entry)
                .put(update_timetable_entry)
                .delete(delete_timetable_entry),
        )
        // Settings and dashboard
        .route("/api/v1/settings", get(get_settings).put(update_settings))
        .route(
            "/api/v1/settings/grading",
            get(get_grading_settings).put(update_grading_settings),
        )
        .route("/api/v1/dashboard", get(get_dashboard))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
