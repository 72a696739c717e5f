//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, bookings, classrooms, equipment, health, reports, settings, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reserva API",
        version = "1.0.0",
        description = "School equipment booking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::update_my_profile,
        // Classrooms
        classrooms::list_classrooms,
        classrooms::get_classroom,
        classrooms::create_classroom,
        classrooms::update_classroom,
        classrooms::delete_classroom,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Bookings
        bookings::create_booking,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::cancel_booking,
        bookings::return_booking,
        bookings::mark_not_used,
        bookings::get_user_bookings,
        // Reports
        reports::usage_report,
        reports::export_csv,
        // Settings
        settings::get_periods,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Users
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateProfile,
            crate::models::user::Role,
            // Classrooms
            crate::models::classroom::Classroom,
            crate::models::classroom::CreateClassroom,
            crate::models::classroom::UpdateClassroom,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::BookingDetails,
            crate::models::booking::BookingStatus,
            crate::models::booking::BookingType,
            crate::models::booking::CreateBooking,
            crate::models::booking::EquipmentRef,
            bookings::CreateBookingResponse,
            bookings::ResolveResponse,
            // Reports
            reports::StatEntry,
            reports::UsageReport,
            // Settings
            settings::PeriodsResponse,
            crate::models::period::PeriodWindow,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "classrooms", description = "Classroom management"),
        (name = "equipment", description = "Equipment management"),
        (name = "bookings", description = "Booking management"),
        (name = "reports", description = "Usage reports"),
        (name = "settings", description = "System settings")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
