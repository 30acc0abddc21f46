use crate::handlers::attendance::AttendanceResponse;
use crate::handlers::fee_payments::FeePaymentResponse;
use crate::helpers::errors::{ApiError, is_unique_violation};
use crate::helpers::responses::{HandlerResult, error_response, respond};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum::response::Json;
use axum_valid::Valid;
use chrono::NaiveDate;
use common::{AttendanceSummary, FeeSummary, GradeReport};
use compute::lookup::find_student;
use compute::{attendance, reports};
use model::entities::student;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for registering a student
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateStudentRequest {
    /// Admission number (must be unique)
    #[validate(length(min = 1, max = 50))]
    pub admission_number: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1, max = 120))]
    pub age: Option<i32>,
    /// Class name; fee structures with the same class apply to the student
    pub class: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_contacts: Option<String>,
    #[validate(email)]
    pub guardian_email: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub has_medical_condition: bool,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub blood_type: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

/// Request body for updating a student. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, max = 50))]
    pub admission_number: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 120))]
    pub age: Option<i32>,
    pub class: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_contacts: Option<String>,
    #[validate(email)]
    pub guardian_email: Option<String>,
    pub address: Option<String>,
    pub has_medical_condition: Option<bool>,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub blood_type: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

/// Query parameters for listing students
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct StudentQuery {
    /// Only students of this class
    pub class: Option<String>,
    /// Matches name or admission number
    pub search: Option<String>,
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 100)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
}

/// Query parameters for a student's attendance
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct StudentAttendanceQuery {
    /// Only marks on or after this date
    pub since: Option<NaiveDate>,
    /// Number of records returned (default: 30). The summary covers all of them.
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<usize>,
}

/// Student response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id: i32,
    pub admission_number: String,
    pub name: String,
    pub age: Option<i32>,
    pub class: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_contacts: Option<String>,
    pub guardian_email: Option<String>,
    pub address: Option<String>,
    pub has_medical_condition: bool,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub blood_type: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

impl From<student::Model> for StudentResponse {
    fn from(model: student::Model) -> Self {
        Self {
            id: model.id,
            admission_number: model.admission_number,
            name: model.name,
            age: model.age,
            class: model.class,
            guardian_name: model.guardian_name,
            guardian_contacts: model.guardian_contacts,
            guardian_email: model.guardian_email,
            address: model.address,
            has_medical_condition: model.has_medical_condition,
            medical_conditions: model.medical_conditions,
            allergies: model.allergies,
            medications: model.medications,
            blood_type: model.blood_type,
            emergency_contact_name: model.emergency_contact_name,
            emergency_contact_relation: model.emergency_contact_relation,
            emergency_contact_phone: model.emergency_contact_phone,
        }
    }
}

/// Fee structures, balances and payments of one student
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentFeesResponse {
    pub summary: FeeSummary,
    /// Newest first
    pub payments: Vec<FeePaymentResponse>,
}

/// Outstanding amount on one fee structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeeBalanceResponse {
    pub student_id: i32,
    pub fee_structure_id: i32,
    #[schema(value_type = String, example = "600")]
    pub balance: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentAttendanceResponse {
    pub summary: AttendanceSummary,
    /// Newest day first
    pub records: Vec<AttendanceResponse>,
}

/// Register a new student
#[utoipa::path(
    post,
    path = "/api/v1/students",
    tag = "students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created successfully", body = ApiResponse<StudentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Admission number already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateStudentRequest>>,
) -> HandlerResult<StudentResponse> {
    trace!("Entering create_student function");
    debug!(
        "Creating student '{}' with admission number {}",
        request.name, request.admission_number
    );

    let new_student = student::ActiveModel {
        admission_number: Set(request.admission_number.clone()),
        name: Set(request.name),
        age: Set(request.age),
        class: Set(request.class),
        guardian_name: Set(request.guardian_name),
        guardian_contacts: Set(request.guardian_contacts),
        guardian_email: Set(request.guardian_email),
        address: Set(request.address),
        has_medical_condition: Set(request.has_medical_condition),
        medical_conditions: Set(request.medical_conditions),
        allergies: Set(request.allergies),
        medications: Set(request.medications),
        blood_type: Set(request.blood_type),
        emergency_contact_name: Set(request.emergency_contact_name),
        emergency_contact_relation: Set(request.emergency_contact_relation),
        emergency_contact_phone: Set(request.emergency_contact_phone),
        ..Default::default()
    };

    match new_student.insert(&state.db).await {
        Ok(student) => {
            info!("Student created successfully with ID: {}", student.id);
            respond(
                StatusCode::CREATED,
                StudentResponse::from(student),
                "Student created successfully",
            )
        }
        Err(e) if is_unique_violation(&e) => {
            warn!("Admission number {} already exists", request.admission_number);
            Err(error_response(
                StatusCode::CONFLICT,
                "DUPLICATE_ADMISSION_NUMBER",
                format!(
                    "Student with admission number '{}' already exists",
                    request.admission_number
                ),
            ))
        }
        Err(e) => {
            error!("Failed to create student: {}", e);
            Err(ApiError::from(e).into())
        }
    }
}

/// List students
#[utoipa::path(
    get,
    path = "/api/v1/students",
    tag = "students",
    params(StudentQuery),
    responses(
        (status = 200, description = "Students retrieved successfully", body = ApiResponse<Vec<StudentResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_students(
    Valid(Query(query)): Valid<Query<StudentQuery>>,
    State(state): State<AppState>,
) -> HandlerResult<Vec<StudentResponse>> {
    trace!("Entering get_students function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(100);

    let mut query_builder = student::Entity::find();
    if let Some(class) = &query.class {
        query_builder = query_builder.filter(student::Column::Class.eq(class.as_str()));
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query_builder = query_builder.filter(
            Condition::any()
                .add(student::Column::Name.contains(search))
                .add(student::Column::AdmissionNumber.contains(search)),
        );
    }

    let students = query_builder
        .order_by_asc(student::Column::Name)
        .order_by_asc(student::Column::Id)
        .paginate(&state.db, limit)
        .fetch_page(page - 1)
        .await?;

    info!("Retrieved {} student(s)", students.len());
    respond(
        StatusCode::OK,
        students.into_iter().map(StudentResponse::from).collect(),
        "Students retrieved successfully",
    )
}

/// Get a student by ID
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}",
    tag = "students",
    params(
        ("student_id" = i32, Path, description = "Student ID"),
    ),
    responses(
        (status = 200, description = "Student retrieved successfully", body = ApiResponse<StudentResponse>),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_student(
    Path(student_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<StudentResponse> {
    trace!("Entering get_student function for student_id: {}", student_id);
    let student = find_student(&state.db, student_id).await?;
    respond(
        StatusCode::OK,
        StudentResponse::from(student),
        "Student retrieved successfully",
    )
}

/// Update a student
///
/// Changing `class` moves the student to the fee structures of the new class.
#[utoipa::path(
    put,
    path = "/api/v1/students/{student_id}",
    tag = "students",
    params(
        ("student_id" = i32, Path, description = "Student ID"),
    ),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated successfully", body = ApiResponse<StudentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Admission number already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_student(
    Path(student_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateStudentRequest>>,
) -> HandlerResult<StudentResponse> {
    trace!("Entering update_student function for student_id: {}", student_id);
    let student = find_student(&state.db, student_id).await?;

    let mut active: student::ActiveModel = student.into();
    let mut updated_fields = Vec::new();

    if let Some(admission_number) = request.admission_number {
        active.admission_number = Set(admission_number);
        updated_fields.push("admission_number");
    }
    if let Some(name) = request.name {
        active.name = Set(name);
        updated_fields.push("name");
    }
    if let Some(age) = request.age {
        active.age = Set(Some(age));
        updated_fields.push("age");
    }
    if let Some(class) = request.class {
        active.class = Set(Some(class));
        updated_fields.push("class");
    }
    if let Some(guardian_name) = request.guardian_name {
        active.guardian_name = Set(Some(guardian_name));
        updated_fields.push("guardian_name");
    }
    if let Some(guardian_contacts) = request.guardian_contacts {
        active.guardian_contacts = Set(Some(guardian_contacts));
        updated_fields.push("guardian_contacts");
    }
    if let Some(guardian_email) = request.guardian_email {
        active.guardian_email = Set(Some(guardian_email));
        updated_fields.push("guardian_email");
    }
    if let Some(address) = request.address {
        active.address = Set(Some(address));
        updated_fields.push("address");
    }
    if let Some(has_medical_condition) = request.has_medical_condition {
        active.has_medical_condition = Set(has_medical_condition);
        updated_fields.push("has_medical_condition");
    }
    if let Some(medical_conditions) = request.medical_conditions {
        active.medical_conditions = Set(Some(medical_conditions));
        updated_fields.push("medical_conditions");
    }
    if let Some(allergies) = request.allergies {
        active.allergies = Set(Some(allergies));
        updated_fields.push("allergies");
    }
    if let Some(medications) = request.medications {
        active.medications = Set(Some(medications));
        updated_fields.push("medications");
    }
    if let Some(blood_type) = request.blood_type {
        active.blood_type = Set(Some(blood_type));
        updated_fields.push("blood_type");
    }
    if let Some(name) = request.emergency_contact_name {
        active.emergency_contact_name = Set(Some(name));
        updated_fields.push("emergency_contact_name");
    }
    if let Some(relation) = request.emergency_contact_relation {
        active.emergency_contact_relation = Set(Some(relation));
        updated_fields.push("emergency_contact_relation");
    }
    if let Some(phone) = request.emergency_contact_phone {
        active.emergency_contact_phone = Set(Some(phone));
        updated_fields.push("emergency_contact_phone");
    }

    debug!("Updating student {} fields: {:?}", student_id, updated_fields);
    let student = active.update(&state.db).await.map_err(ApiError::from)?;
    info!("Student {} updated successfully", student_id);
    respond(
        StatusCode::OK,
        StudentResponse::from(student),
        "Student updated successfully",
    )
}

/// Fee structures of the student's class with balances, and the payments made
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}/fees",
    tag = "students",
    params(
        ("student_id" = i32, Path, description = "Student ID"),
    ),
    responses(
        (status = 200, description = "Fee summary retrieved successfully", body = ApiResponse<StudentFeesResponse>),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_student_fees(
    Path(student_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<StudentFeesResponse> {
    trace!("Entering get_student_fees function for student_id: {}", student_id);
    let summary = state.ledger.fee_summary(&state.db, student_id).await?;
    let payments = state
        .ledger
        .payments_for_student(&state.db, student_id)
        .await?;

    debug!(
        "Student {} owes {} over {} structure(s), {} payment(s)",
        student_id,
        summary.balance,
        summary.structures.len(),
        payments.len()
    );
    respond(
        StatusCode::OK,
        StudentFeesResponse {
            summary,
            payments: payments.into_iter().map(FeePaymentResponse::from).collect(),
        },
        "Fee summary retrieved successfully",
    )
}

/// Balance of a student on one fee structure
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}/fees/{fee_structure_id}/balance",
    tag = "students",
    params(
        ("student_id" = i32, Path, description = "Student ID"),
        ("fee_structure_id" = i32, Path, description = "Fee structure ID"),
    ),
    responses(
        (status = 200, description = "Balance computed successfully", body = ApiResponse<FeeBalanceResponse>),
        (status = 404, description = "Student or fee structure not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_student_fee_balance(
    Path((student_id, fee_structure_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> HandlerResult<FeeBalanceResponse> {
    trace!("Entering get_student_fee_balance function");
    let balance = state
        .ledger
        .balance(&state.db, student_id, fee_structure_id)
        .await?;
    respond(
        StatusCode::OK,
        FeeBalanceResponse {
            student_id,
            fee_structure_id,
            balance,
        },
        "Balance computed successfully",
    )
}

/// Attendance summary and recent marks of a student
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}/attendance",
    tag = "students",
    params(
        ("student_id" = i32, Path, description = "Student ID"),
        StudentAttendanceQuery,
    ),
    responses(
        (status = 200, description = "Attendance retrieved successfully", body = ApiResponse<StudentAttendanceResponse>),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_student_attendance(
    Path(student_id): Path<i32>,
    Valid(Query(query)): Valid<Query<StudentAttendanceQuery>>,
    State(state): State<AppState>,
) -> HandlerResult<StudentAttendanceResponse> {
    trace!("Entering get_student_attendance function for student_id: {}", student_id);
    let records = attendance::student_records(&state.db, student_id, query.since).await?;
    let summary = attendance::summarize(&records);

    respond(
        StatusCode::OK,
        StudentAttendanceResponse {
            summary,
            records: records
                .into_iter()
                .take(query.limit.unwrap_or(30))
                .map(AttendanceResponse::from)
                .collect(),
        },
        "Attendance retrieved successfully",
    )
}

/// Term and subject averages of a student
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}/grades",
    tag = "students",
    params(
        ("student_id" = i32, Path, description = "Student ID"),
    ),
    responses(
        (status = 200, description = "Grade report generated successfully", body = ApiResponse<GradeReport>),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_student_grades(
    Path(student_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<GradeReport> {
    trace!("Entering get_student_grades function for student_id: {}", student_id);
    let report = reports::grade_report(&state.db, &state.classifier, student_id).await?;
    respond(
        StatusCode::OK,
        report,
        "Grade report generated successfully",
    )
}
