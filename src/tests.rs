#[cfg(test)]
mod integration_tests {
    use crate::handlers::attendance::{AttendanceResponse, RosterEntryResponse};
    use crate::handlers::classes::ClassResponse;
    use crate::handlers::dashboard::DashboardResponse;
    use crate::handlers::fee_payments::{FeePaymentResponse, ReceiptResponse};
    use crate::handlers::grades::GradeResponse;
    use crate::handlers::settings::{ClassificationResponse, GradingThresholdsBody, SettingsResponse};
    use crate::handlers::students::{
        CreateStudentRequest, FeeBalanceResponse, StudentAttendanceResponse, StudentFeesResponse,
        StudentResponse,
    };
    use crate::handlers::timetable::TimetableEntryResponse;
    use crate::schemas::{ApiResponse, ErrorResponse, HealthResponse};
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use common::{GradeReport, TimetableGrid};
    use compute::fees::is_receipt_number;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    async fn test_server() -> TestServer {
        TestServer::new(setup_test_app().await).unwrap()
    }

    async fn create_student(server: &TestServer, admission_number: &str, name: &str, class: &str) -> i32 {
        let response = server
            .post("/api/v1/students")
            .json(&json!({
                "admission_number": admission_number,
                "name": name,
                "class": class,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<StudentResponse> = response.json();
        body.data.id
    }

    async fn create_fee_structure(server: &TestServer, class: &str, term: &str, amount: &str) -> i32 {
        let response = server
            .post("/api/v1/fee-structures")
            .json(&json!({
                "class": class,
                "term": term,
                "year": 2024,
                "amount": amount,
                "description": "Tuition",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        body.data["id"].as_i64().unwrap() as i32
    }

    async fn pay(server: &TestServer, student_id: i32, fee_structure_id: i32, amount: &str) -> FeePaymentResponse {
        let response = server
            .post("/api/v1/fee-payments")
            .json(&json!({
                "student_id": student_id,
                "fee_structure_id": fee_structure_id,
                "amount_paid": amount,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<FeePaymentResponse> = response.json();
        assert_eq!(body.message, "Payment recorded successfully");
        body.data
    }

    async fn balance(server: &TestServer, student_id: i32, fee_structure_id: i32) -> Decimal {
        let response = server
            .get(&format!(
                "/api/v1/students/{}/fees/{}/balance",
                student_id, fee_structure_id
            ))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<FeeBalanceResponse> = response.json();
        body.data.balance
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.database, "connected");
    }

    #[tokio::test]
    async fn test_create_and_get_student() {
        let server = test_server().await;

        let create_request = CreateStudentRequest {
            admission_number: "ADM001".to_string(),
            name: "Amani Wanjiru".to_string(),
            age: Some(12),
            class: Some("Grade 6".to_string()),
            guardian_name: Some("Grace Wanjiru".to_string()),
            guardian_contacts: Some("0712345678".to_string()),
            guardian_email: Some("grace@example.com".to_string()),
            address: None,
            has_medical_condition: true,
            medical_conditions: Some("Asthma".to_string()),
            allergies: None,
            medications: Some("Inhaler".to_string()),
            blood_type: Some("O+".to_string()),
            emergency_contact_name: None,
            emergency_contact_relation: None,
            emergency_contact_phone: None,
        };

        let response = server.post("/api/v1/students").json(&create_request).await;
        if response.status_code() != StatusCode::CREATED {
            println!("Error response: {}", response.text());
            panic!("Expected 201 Created, got {}", response.status_code());
        }
        let body: ApiResponse<StudentResponse> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Student created successfully");
        assert!(body.data.id > 0);

        let response = server
            .get(&format!("/api/v1/students/{}", body.data.id))
            .await;
        response.assert_status(StatusCode::OK);
        let fetched: ApiResponse<StudentResponse> = response.json();
        assert_eq!(fetched.data.admission_number, "ADM001");
        assert_eq!(fetched.data.class.as_deref(), Some("Grade 6"));
        assert!(fetched.data.has_medical_condition);
        assert_eq!(fetched.data.medical_conditions.as_deref(), Some("Asthma"));
    }

    #[tokio::test]
    async fn test_duplicate_admission_number_conflicts() {
        let server = test_server().await;
        create_student(&server, "ADM100", "First Student", "Grade 1").await;

        let response = server
            .post("/api/v1/students")
            .json(&json!({"admission_number": "ADM100", "name": "Second Student"}))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, "DUPLICATE_ADMISSION_NUMBER");
        assert!(body.error.contains("ADM100"));
    }

    #[tokio::test]
    async fn test_create_student_rejects_invalid_input() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/students")
            .json(&json!({"admission_number": "ADM200", "name": ""}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/v1/students")
            .json(&json!({
                "admission_number": "ADM201",
                "name": "Valid Name",
                "guardian_email": "not-an-email",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_student_is_not_found() {
        let server = test_server().await;

        let response = server.get("/api/v1/students/9999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_student_search_filter_and_pagination() {
        let server = test_server().await;
        create_student(&server, "ADM301", "Baraka Otieno", "Grade 2").await;
        create_student(&server, "ADM302", "Achieng Odhiambo", "Grade 2").await;
        create_student(&server, "ADM303", "Chebet Kiprop", "Grade 3").await;

        let response = server
            .get("/api/v1/students")
            .add_query_param("class", "Grade 2")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<StudentResponse>> = response.json();
        let names: Vec<&str> = body.data.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Achieng Odhiambo", "Baraka Otieno"]);

        let response = server
            .get("/api/v1/students")
            .add_query_param("search", "ADM303")
            .await;
        let body: ApiResponse<Vec<StudentResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].name, "Chebet Kiprop");

        let response = server
            .get("/api/v1/students")
            .add_query_param("page", 2)
            .add_query_param("limit", 2)
            .await;
        let body: ApiResponse<Vec<StudentResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].name, "Chebet Kiprop");
    }

    #[tokio::test]
    async fn test_update_student_changes_only_given_fields() {
        let server = test_server().await;
        let student_id = create_student(&server, "ADM400", "Juma Hassan", "Grade 4").await;

        let response = server
            .put(&format!("/api/v1/students/{}", student_id))
            .json(&json!({"class": "Grade 5"}))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<StudentResponse> = response.json();
        assert_eq!(body.data.class.as_deref(), Some("Grade 5"));
        assert_eq!(body.data.name, "Juma Hassan");
        assert_eq!(body.data.admission_number, "ADM400");
    }

    #[tokio::test]
    async fn test_fee_balance_and_receipt_flow() {
        let server = test_server().await;
        let student_id = create_student(&server, "ADM500", "Wanjiku Kamau", "Grade 7").await;
        let fee_id = create_fee_structure(&server, "Grade 7", "Term 1", "1000").await;
        // Fee structures of other classes never apply.
        create_fee_structure(&server, "Grade 8", "Term 1", "5000").await;

        assert_eq!(balance(&server, student_id, fee_id).await, Decimal::new(1000, 0));

        let first = pay(&server, student_id, fee_id, "400").await;
        assert_eq!(balance(&server, student_id, fee_id).await, Decimal::new(600, 0));

        let second = pay(&server, student_id, fee_id, "700").await;
        assert_eq!(balance(&server, student_id, fee_id).await, Decimal::new(-100, 0));

        for payment in [&first, &second] {
            assert!(is_receipt_number(&payment.receipt_number));
            assert!(payment.receipt_number.starts_with("RCPT-20240315-"));
            assert_eq!(payment.payment_method, "Cash");
        }
        assert_ne!(first.receipt_number, second.receipt_number);

        let response = server
            .get(&format!("/api/v1/fee-payments/{}/receipt", second.id))
            .await;
        response.assert_status(StatusCode::OK);
        let receipt: ApiResponse<ReceiptResponse> = response.json();
        let receipt = receipt.data;
        assert_eq!(receipt.breakdown.previous_balance, Decimal::new(600, 0));
        assert_eq!(receipt.breakdown.amount_paid, Decimal::new(700, 0));
        assert_eq!(receipt.breakdown.new_balance, Decimal::new(-100, 0));
        assert_eq!(receipt.student_name, "Wanjiku Kamau");
        assert_eq!(receipt.term, "Term 1");
        assert_eq!(receipt.fee_description.as_deref(), Some("Tuition"));

        let response = server
            .get(&format!("/api/v1/fee-payments/{}/receipt", first.id))
            .await;
        let receipt: ApiResponse<ReceiptResponse> = response.json();
        assert_eq!(receipt.data.breakdown.previous_balance, Decimal::new(1000, 0));
        assert_eq!(receipt.data.breakdown.new_balance, Decimal::new(600, 0));

        let response = server
            .get(&format!("/api/v1/students/{}/fees", student_id))
            .await;
        response.assert_status(StatusCode::OK);
        let fees: ApiResponse<StudentFeesResponse> = response.json();
        assert_eq!(fees.data.summary.structures.len(), 1);
        assert_eq!(fees.data.summary.total_fee, Decimal::new(1000, 0));
        assert_eq!(fees.data.summary.total_paid, Decimal::new(1100, 0));
        assert_eq!(fees.data.summary.balance, Decimal::new(-100, 0));
        // Newest payment first
        let ids: Vec<i32> = fees.data.payments.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_fee_structure_amount_change_moves_balance() {
        let server = test_server().await;
        let student_id = create_student(&server, "ADM510", "Otieno Ouma", "Grade 3").await;
        let fee_id = create_fee_structure(&server, "Grade 3", "Term 2", "1000").await;
        pay(&server, student_id, fee_id, "400").await;

        let response = server
            .put(&format!("/api/v1/fee-structures/{}", fee_id))
            .json(&json!({"amount": "1200"}))
            .await;
        response.assert_status(StatusCode::OK);

        assert_eq!(balance(&server, student_id, fee_id).await, Decimal::new(800, 0));
    }

    #[tokio::test]
    async fn test_zero_and_negative_payments_are_stored() {
        let server = test_server().await;
        let student_id = create_student(&server, "ADM520", "Nyambura Njeri", "Grade 1").await;
        let fee_id = create_fee_structure(&server, "Grade 1", "Term 1", "500").await;

        pay(&server, student_id, fee_id, "0").await;
        pay(&server, student_id, fee_id, "-50").await;

        assert_eq!(balance(&server, student_id, fee_id).await, Decimal::new(550, 0));
    }

    #[tokio::test]
    async fn test_payment_for_unknown_student_or_structure_is_not_found() {
        let server = test_server().await;
        let student_id = create_student(&server, "ADM530", "Kiprono Kipchoge", "Grade 5").await;
        let fee_id = create_fee_structure(&server, "Grade 5", "Term 1", "800").await;

        let response = server
            .post("/api/v1/fee-payments")
            .json(&json!({"student_id": 9999, "fee_structure_id": fee_id, "amount_paid": "100"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server
            .post("/api/v1/fee-payments")
            .json(&json!({"student_id": student_id, "fee_structure_id": 9999, "amount_paid": "100"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server.get("/api/v1/fee-payments").await;
        let body: ApiResponse<Vec<Value>> = response.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_fee_structure_with_payments_cannot_be_deleted() {
        let server = test_server().await;
        let student_id = create_student(&server, "ADM540", "Akinyi Adhiambo", "Grade 4").await;
        let paid_id = create_fee_structure(&server, "Grade 4", "Term 1", "900").await;
        let unpaid_id = create_fee_structure(&server, "Grade 4", "Term 2", "900").await;
        pay(&server, student_id, paid_id, "100").await;

        let response = server
            .delete(&format!("/api/v1/fee-structures/{}", paid_id))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "FEE_STRUCTURE_IN_USE");
        server
            .get(&format!("/api/v1/fee-structures/{}", paid_id))
            .await
            .assert_status(StatusCode::OK);

        server
            .delete(&format!("/api/v1/fee-structures/{}", unpaid_id))
            .await
            .assert_status(StatusCode::OK);
        server
            .get(&format!("/api/v1/fee-structures/{}", unpaid_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_fee_structure_conflicts() {
        let server = test_server().await;
        create_fee_structure(&server, "Grade 2", "Term 3", "700").await;

        let response = server
            .post("/api/v1/fee-structures")
            .json(&json!({"class": "Grade 2", "term": "Term 3", "year": 2024, "amount": "750"}))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "DUPLICATE_FEE_STRUCTURE");
    }

    #[tokio::test]
    async fn test_attendance_save_replaces_marks_for_the_day() {
        let server = test_server().await;
        let amani = create_student(&server, "ADM600", "Amani Mwangi", "Grade 1").await;
        let baraka = create_student(&server, "ADM601", "Baraka Mutua", "Grade 1").await;
        create_student(&server, "ADM602", "Chebet Rono", "Grade 2").await;

        let response = server
            .post("/api/v1/attendance")
            .json(&json!({
                "date": "2024-03-14",
                "entries": [
                    {"student_id": amani, "status": "Present"},
                    {"student_id": baraka, "status": "Absent", "remarks": "Sick"},
                ],
            }))
            .await;
        response.assert_status(StatusCode::OK);
        let saved: ApiResponse<Vec<AttendanceResponse>> = response.json();
        assert_eq!(saved.data.len(), 2);

        let response = server
            .post("/api/v1/attendance")
            .json(&json!({
                "date": "2024-03-14",
                "entries": [{"student_id": amani, "status": "Late"}],
            }))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server
            .get("/api/v1/attendance")
            .add_query_param("date", "2024-03-14")
            .add_query_param("class", "Grade 1")
            .await;
        response.assert_status(StatusCode::OK);
        let roster: ApiResponse<Vec<RosterEntryResponse>> = response.json();
        assert_eq!(roster.data.len(), 2);
        let amani_row = roster.data.iter().find(|r| r.student_id == amani).unwrap();
        assert_eq!(amani_row.status.as_deref(), Some("Late"));
        let baraka_row = roster.data.iter().find(|r| r.student_id == baraka).unwrap();
        assert_eq!(baraka_row.status.as_deref(), Some("Absent"));
        assert_eq!(baraka_row.remarks.as_deref(), Some("Sick"));

        // Without a date the roster is for today, when nobody was marked yet.
        let response = server
            .get("/api/v1/attendance")
            .add_query_param("class", "Grade 1")
            .await;
        let roster: ApiResponse<Vec<RosterEntryResponse>> = response.json();
        assert!(roster.data.iter().all(|r| r.status.is_none()));

        let response = server
            .get(&format!("/api/v1/students/{}/attendance", amani))
            .await;
        response.assert_status(StatusCode::OK);
        let history: ApiResponse<StudentAttendanceResponse> = response.json();
        assert_eq!(history.data.summary.total, 1);
        assert_eq!(history.data.summary.late, 1);
        assert_eq!(history.data.records.len(), 1);
    }

    #[tokio::test]
    async fn test_attendance_rejects_bad_marks_without_saving() {
        let server = test_server().await;
        let student_id = create_student(&server, "ADM610", "Halima Abdi", "Grade 3").await;

        let response = server
            .post("/api/v1/attendance")
            .json(&json!({
                "date": "2024-03-14",
                "entries": [{"student_id": student_id, "status": "Sleeping"}],
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/v1/attendance")
            .json(&json!({
                "date": "2024-03-14",
                "entries": [
                    {"student_id": student_id, "status": "Present"},
                    {"student_id": 9999, "status": "Present"},
                ],
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server
            .get(&format!("/api/v1/students/{}/attendance", student_id))
            .await;
        let history: ApiResponse<StudentAttendanceResponse> = response.json();
        assert_eq!(history.data.summary.total, 0);

        let response = server
            .post("/api/v1/attendance")
            .json(&json!({"date": "2024-03-14", "entries": []}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_classify_uses_inclusive_integer_bands() {
        let server = test_server().await;

        for (score, expected) in [
            ("80", "A"),
            ("100", "A"),
            ("79.5", "F"),
            ("79", "B"),
            ("55", "D"),
            ("0", "F"),
            ("101", "F"),
        ] {
            let response = server
                .get("/api/v1/grading/classify")
                .add_query_param("score", score)
                .await;
            response.assert_status(StatusCode::OK);
            let body: ApiResponse<ClassificationResponse> = response.json();
            assert_eq!(body.data.grade, expected, "score {}", score);
        }
    }

    #[tokio::test]
    async fn test_stored_letters_survive_threshold_changes() {
        let server = test_server().await;
        let student_id = create_student(&server, "ADM700", "Zawadi Chege", "Grade 8").await;

        let response = server
            .post("/api/v1/grades")
            .json(&json!({
                "student_id": student_id,
                "subject": "Mathematics",
                "term": "Term 1",
                "year": 2024,
                "score": "75",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let first: ApiResponse<GradeResponse> = response.json();
        assert_eq!(first.data.grade, "B");

        let relaxed = GradingThresholdsBody {
            min_a: 70,
            max_a: 100,
            min_b: 60,
            max_b: 69,
            min_c: 50,
            max_c: 59,
            min_d: 40,
            max_d: 49,
            min_f: 0,
            max_f: 39,
        };
        let response = server.put("/api/v1/settings/grading").json(&relaxed).await;
        response.assert_status(StatusCode::OK);
        let saved: ApiResponse<GradingThresholdsBody> = response.json();
        assert_eq!(saved.data, relaxed);

        let response = server.get("/api/v1/settings/grading").await;
        let current: ApiResponse<GradingThresholdsBody> = response.json();
        assert_eq!(current.data, relaxed);

        let response = server
            .post("/api/v1/grades")
            .json(&json!({
                "student_id": student_id,
                "subject": "English",
                "term": "Term 1",
                "year": 2024,
                "score": "75",
            }))
            .await;
        let second: ApiResponse<GradeResponse> = response.json();
        assert_eq!(second.data.grade, "A");

        let response = server
            .get(&format!("/api/v1/grades/{}", first.data.id))
            .await;
        let unchanged: ApiResponse<GradeResponse> = response.json();
        assert_eq!(unchanged.data.grade, "B");
        assert_eq!(unchanged.data.student_name.as_deref(), Some("Zawadi Chege"));

        // Saving a grade again classifies it against the thresholds in effect.
        let response = server
            .put(&format!("/api/v1/grades/{}", first.data.id))
            .json(&json!({"remarks": "Rechecked"}))
            .await;
        response.assert_status(StatusCode::OK);
        let regraded: ApiResponse<GradeResponse> = response.json();
        assert_eq!(regraded.data.grade, "A");
    }

    #[tokio::test]
    async fn test_grade_for_unknown_student_is_not_found() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/grades")
            .json(&json!({
                "student_id": 9999,
                "subject": "Science",
                "term": "Term 1",
                "year": 2024,
                "score": "50",
            }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_grade_report_averages_terms_and_subjects() {
        let server = test_server().await;
        let student_id = create_student(&server, "ADM710", "Imani Kariuki", "Grade 8").await;

        for (subject, term, score) in [
            ("Mathematics", "Term 1", "90"),
            ("English", "Term 1", "70"),
            ("Mathematics", "Term 2", "60"),
        ] {
            server
                .post("/api/v1/grades")
                .json(&json!({
                    "student_id": student_id,
                    "subject": subject,
                    "term": term,
                    "year": 2024,
                    "score": score,
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(&format!("/api/v1/students/{}/grades", student_id))
            .await;
        response.assert_status(StatusCode::OK);
        let report: ApiResponse<GradeReport> = response.json();
        let report = report.data;

        assert_eq!(report.terms.len(), 2);
        assert_eq!(report.terms[0].term, "Term 1");
        assert_eq!(report.terms[0].average_score, Decimal::new(80, 0));
        assert_eq!(report.terms[0].grade, "A");
        assert_eq!(report.terms[1].average_score, Decimal::new(60, 0));
        assert_eq!(report.terms[1].grade, "C");

        assert_eq!(report.subjects[0].subject, "Mathematics");
        assert_eq!(report.subjects[0].average_score, Decimal::new(75, 0));
        assert_eq!(report.subjects[0].count, 2);
        assert_eq!(report.subjects[1].subject, "English");
    }

    #[tokio::test]
    async fn test_timetable_grid_orders_days_and_periods() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/teachers")
            .json(&json!({"name": "Mr. Odhiambo"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let teacher: ApiResponse<Value> = response.json();
        let teacher_id = teacher.data["id"].as_i64().unwrap();

        for (day, period, subject) in [
            ("Wednesday", 2, "History"),
            ("monday", 3, "Science"),
            ("Monday", 1, "Mathematics"),
            ("SATURDAY", 1, "Music"),
        ] {
            let response = server
                .post("/api/v1/timetable")
                .json(&json!({
                    "class": "Grade 6",
                    "day": day,
                    "period": period,
                    "subject": subject,
                    "teacher_id": teacher_id,
                }))
                .await;
            response.assert_status(StatusCode::CREATED);
        }

        let response = server
            .get("/api/v1/timetable/grid")
            .add_query_param("class", "Grade 6")
            .await;
        response.assert_status(StatusCode::OK);
        let grid: ApiResponse<TimetableGrid> = response.json();
        let days: Vec<&str> = grid.data.days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(
            days,
            vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"]
        );

        let monday = &grid.data.days[0];
        let periods: Vec<i32> = monday.slots.iter().map(|s| s.period).collect();
        assert_eq!(periods, vec![1, 3]);
        assert_eq!(monday.slots[0].subject, "Mathematics");
        assert_eq!(monday.slots[0].color, "#d14444");
        assert_eq!(monday.slots[0].teacher_name.as_deref(), Some("Mr. Odhiambo"));
        assert!(grid.data.days[1].slots.is_empty());

        let response = server
            .get("/api/v1/timetable")
            .add_query_param("day", "wednesday")
            .await;
        let lessons: ApiResponse<Vec<TimetableEntryResponse>> = response.json();
        assert_eq!(lessons.data.len(), 1);
        assert_eq!(lessons.data[0].day, "Wednesday");
        assert_eq!(lessons.data[0].slot.subject, "History");
    }

    #[tokio::test]
    async fn test_timetable_rejects_unknown_weekday() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/timetable")
            .json(&json!({"class": "Grade 6", "day": "Funday", "period": 1, "subject": "Art"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .get("/api/v1/timetable/grid")
            .add_query_param("day", "Funday")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_settings_update_is_visible_on_next_read() {
        let server = test_server().await;

        let response = server.get("/api/v1/settings").await;
        response.assert_status(StatusCode::OK);
        let before: ApiResponse<SettingsResponse> = response.json();
        assert!(!before.data.school_name.is_empty());

        let response = server
            .put("/api/v1/settings")
            .json(&json!({"school_name": "Hillside Academy", "school_phone": "020 555 0100"}))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server.get("/api/v1/settings").await;
        let after: ApiResponse<SettingsResponse> = response.json();
        assert_eq!(after.data.school_name, "Hillside Academy");
        assert_eq!(after.data.school_phone.as_deref(), Some("020 555 0100"));

        let student_id = create_student(&server, "ADM800", "Neema Mollel", "Grade 2").await;
        let fee_id = create_fee_structure(&server, "Grade 2", "Term 1", "300").await;
        let payment = pay(&server, student_id, fee_id, "300").await;
        let response = server
            .get(&format!("/api/v1/fee-payments/{}/receipt", payment.id))
            .await;
        let receipt: ApiResponse<ReceiptResponse> = response.json();
        assert_eq!(receipt.data.school_name, "Hillside Academy");
        assert_eq!(receipt.data.breakdown.new_balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_class_counts_students_by_name() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/teachers")
            .json(&json!({"name": "Mrs. Njoroge", "email": "njoroge@example.com"}))
            .await;
        let teacher: ApiResponse<Value> = response.json();
        let teacher_id = teacher.data["id"].as_i64().unwrap();

        let response = server
            .post("/api/v1/classes")
            .json(&json!({"name": "Grade 5", "teacher_id": teacher_id}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let class: ApiResponse<ClassResponse> = response.json();

        create_student(&server, "ADM900", "Musa Kibet", "Grade 5").await;
        create_student(&server, "ADM901", "Lulu Wambui", "Grade 5").await;
        create_student(&server, "ADM902", "Pendo Auma", "Grade 6").await;

        let response = server
            .get(&format!("/api/v1/classes/{}", class.data.id))
            .await;
        response.assert_status(StatusCode::OK);
        let class: ApiResponse<ClassResponse> = response.json();
        assert_eq!(class.data.student_count, 2);
        assert_eq!(class.data.teacher_name.as_deref(), Some("Mrs. Njoroge"));

        let response = server
            .post("/api/v1/classes")
            .json(&json!({"name": "Grade 5"}))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let response = server
            .post("/api/v1/classes")
            .json(&json!({"name": "Grade 9", "teacher_id": 9999}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_teacher_delete_then_not_found() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/teachers")
            .json(&json!({"name": "Mr. Mutiso"}))
            .await;
        let teacher: ApiResponse<Value> = response.json();
        let teacher_id = teacher.data["id"].as_i64().unwrap();

        server
            .delete(&format!("/api/v1/teachers/{}", teacher_id))
            .await
            .assert_status(StatusCode::OK);
        server
            .delete(&format!("/api/v1/teachers/{}", teacher_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dashboard_counts_and_recent_payments() {
        let server = test_server().await;
        server
            .post("/api/v1/teachers")
            .json(&json!({"name": "Ms. Achieng"}))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/classes")
            .json(&json!({"name": "Grade 1"}))
            .await
            .assert_status(StatusCode::CREATED);
        let student_id = create_student(&server, "ADM950", "Tumaini Ali", "Grade 1").await;
        create_student(&server, "ADM951", "Faraja Said", "Grade 1").await;
        let fee_id = create_fee_structure(&server, "Grade 1", "Term 1", "1000").await;
        pay(&server, student_id, fee_id, "250").await;
        let latest = pay(&server, student_id, fee_id, "150").await;

        let response = server
            .get("/api/v1/dashboard")
            .add_query_param("recent", 1)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<DashboardResponse> = response.json();
        assert_eq!(body.message, "Dashboard loaded");
        assert_eq!(body.data.counts.students, 2);
        assert_eq!(body.data.counts.teachers, 1);
        assert_eq!(body.data.counts.classes, 1);
        assert_eq!(body.data.recent_payments.len(), 1);
        assert_eq!(body.data.recent_payments[0].payment.id, latest.id);
        assert_eq!(
            body.data.recent_payments[0].student_name.as_deref(),
            Some("Tumaini Ali")
        );
    }

    #[tokio::test]
    async fn test_subjects_list_is_sorted() {
        let server = test_server().await;

        let response = server.get("/api/v1/subjects").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        let names: Vec<&str> = body.data.iter().filter_map(|s| s["name"].as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
