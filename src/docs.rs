use crate::api::attendance::CheckInRequest;
use crate::api::employee::{CreateEmployee, UpdateEmployee};
use crate::api::report::{AttendanceRowView, DashboardView, EmployeeRowView, ExportDocument};
use crate::model::attendance::{AttendanceRecord, AttendanceRow, AttendanceStatus};
use crate::model::employee::Employee;
use crate::models::{LoginReqDto, LoginResponse};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Asistencia API",
        version = "1.0.0",
        description = r#"
## Control de Asistencia

Daily attendance for a single institution.

### Key Features
- **Attendance**
  - One check-in per employee per day, check-out by record id
  - Today's list with search, clear today
- **Employees**
  - Create, update, list, view and delete (with history)
  - Unknown cedulas are registered on their first check-in
- **Reports**
  - Dashboard content and the daily attendance sheet, optionally clearing the day

### Security
Every endpoint except `/` and `/auth/login` requires a **JWT Bearer** token
obtained from `/auth/login`.

### Response Format
- Confirmations carry `message`, failures carry `error`
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::session,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_today,
        crate::api::attendance::clear_today,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::report::departments,
        crate::api::report::dashboard,
        crate::api::report::export,
        crate::api::report::export_and_clear
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            CheckInRequest,
            AttendanceRecord,
            AttendanceRow,
            AttendanceStatus,
            CreateEmployee,
            UpdateEmployee,
            Employee,
            AttendanceRowView,
            EmployeeRowView,
            DashboardView,
            ExportDocument
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Administrator login"),
        (name = "Attendance", description = "Daily check-in and check-out"),
        (name = "Employee", description = "Employee management"),
        (name = "Report", description = "Dashboard and export"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
