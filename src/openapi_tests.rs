#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::openapi::{PathItemType, RefOr, schema::Schema};
    use utoipa::OpenApi;

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components missing");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            _ => panic!("{name} should be an object schema"),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();

        for name in [
            "ErrorResponse",
            "HealthResponse",
            "StudentResponse",
            "FeeSummary",
            "ReceiptResponse",
            "GradingThresholdsBody",
            "TimetableGrid",
            "DashboardResponse",
        ] {
            assert!(components.schemas.contains_key(name), "missing schema {name}");
        }

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.iter().any(|p| p == field), "missing {field}");
        }
    }

    #[test]
    fn test_health_response_schema_structure() {
        let properties = object_properties("HealthResponse");
        for field in ["status", "version", "database"] {
            assert!(properties.iter().any(|p| p == field), "missing {field}");
        }
    }

    #[test]
    fn test_health_endpoint_documents_degraded_state() {
        let openapi = ApiDoc::openapi();
        let health_get = openapi
            .paths
            .paths
            .get("/health")
            .and_then(|item| item.operations.get(&PathItemType::Get))
            .expect("GET /health missing");

        assert!(health_get.responses.responses.contains_key("200"));
        assert!(health_get.responses.responses.contains_key("503"));
    }

    #[test]
    fn test_fee_and_grading_paths_are_documented() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        let expected = [
            ("/api/v1/students/{student_id}/fees/{fee_structure_id}/balance", PathItemType::Get, "GET"),
            ("/api/v1/fee-payments", PathItemType::Post, "POST"),
            ("/api/v1/fee-payments/{payment_id}/receipt", PathItemType::Get, "GET"),
            ("/api/v1/fee-structures/{fee_structure_id}", PathItemType::Delete, "DELETE"),
            ("/api/v1/grading/classify", PathItemType::Get, "GET"),
            ("/api/v1/settings/grading", PathItemType::Put, "PUT"),
            ("/api/v1/attendance", PathItemType::Post, "POST"),
            ("/api/v1/timetable/grid", PathItemType::Get, "GET"),
        ];
        for (path, method, label) in expected {
            let item = paths
                .get(path)
                .unwrap_or_else(|| panic!("{path} not documented"));
            assert!(item.operations.contains_key(&method), "{path} lacks {label}");
        }
    }

    #[test]
    fn test_receipt_collision_is_a_documented_conflict() {
        let openapi = ApiDoc::openapi();
        let create_payment = openapi
            .paths
            .paths
            .get("/api/v1/fee-payments")
            .and_then(|item| item.operations.get(&PathItemType::Post))
            .expect("POST /api/v1/fee-payments missing");

        assert!(create_payment.responses.responses.contains_key("409"));
        assert!(create_payment.responses.responses.contains_key("404"));
    }

    #[test]
    fn test_all_error_responses_reference_correct_schema() {
        let openapi_json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
        assert!(openapi_json.contains("#/components/schemas/ErrorResponse"));
    }
}
