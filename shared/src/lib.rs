use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A loan of a physical asset from a staff member to a teacher.
///
/// Field names on the wire are the Spanish camelCase names used by the
/// backend API (`activoId`, `fechaPrestamo`, ...). The optional relation
/// fields are read-only snapshots the API expands for display; they are
/// never sent back on writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Server-assigned identifier, immutable and never reused.
    pub id: i64,
    #[serde(rename = "activoId")]
    pub asset_id: i64,
    /// Staff user who handed the asset out.
    #[serde(rename = "prestadoPorId")]
    pub lender_id: i64,
    /// Teacher (docente) who received the asset.
    #[serde(rename = "prestadoAId")]
    pub borrower_id: i64,
    /// Destination location the asset is being moved to.
    #[serde(rename = "ubicacionId")]
    pub to_location_id: i64,
    /// Location the asset was at when the loan was created (captured once,
    /// not recomputed later).
    #[serde(rename = "ubicacionActualId")]
    pub from_location_id: i64,
    /// Creation instant, set exactly once.
    #[serde(rename = "fechaPrestamo")]
    pub loan_date: DateTime<Utc>,
    #[serde(rename = "fechaDevolucion", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<DateTime<Utc>>,
    /// Status flag. The backend accepts any string here; the UI only offers
    /// the [`LoanStatus`] vocabulary.
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "activo", default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    #[serde(rename = "prestadoPor", default, skip_serializing_if = "Option::is_none")]
    pub lender: Option<UserSummary>,
    #[serde(rename = "prestadoA", default, skip_serializing_if = "Option::is_none")]
    pub borrower: Option<UserSummary>,
    #[serde(rename = "ubicacion", default, skip_serializing_if = "Option::is_none")]
    pub to_location: Option<Location>,
    #[serde(rename = "ubicacionActual", default, skip_serializing_if = "Option::is_none")]
    pub from_location: Option<Location>,
}

impl Loan {
    /// Return date with the backend's placeholder artifact normalized away.
    ///
    /// Some rows come back with `fechaDevolucion` set to the exact value of
    /// `fechaPrestamo` instead of null; those are loans that were never
    /// returned. Display paths must use this accessor instead of reading
    /// `return_date` directly.
    pub fn effective_return_date(&self) -> Option<DateTime<Utc>> {
        match self.return_date {
            Some(date) if date == self.loan_date => None,
            other => other,
        }
    }

    /// Display name of the loaned asset, if the snapshot came expanded.
    pub fn asset_name(&self) -> Option<&str> {
        self.asset.as_ref().map(|a| a.name.as_str())
    }
}

/// The three statuses the UI offers. Any status is selectable from any
/// other; the backend does not restrict transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Active,
    Returned,
    NotReturned,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 3] = [
        LoanStatus::Active,
        LoanStatus::Returned,
        LoanStatus::NotReturned,
    ];

    /// Exact string stored in `Loan::status` for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "En préstamo",
            LoanStatus::Returned => "Devuelto",
            LoanStatus::NotReturned => "No Devuelto",
        }
    }

    /// Map a stored status string back onto the vocabulary, if canonical.
    pub fn parse(status: &str) -> Option<LoanStatus> {
        LoanStatus::ALL.into_iter().find(|s| s.as_str() == status)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical asset that can be loaned out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Inventory plate/tag identifier painted on the asset.
    #[serde(rename = "placa")]
    pub plate: String,
    /// Current location of the asset.
    #[serde(rename = "ubicacionId")]
    pub location_id: i64,
    #[serde(rename = "ubicacion", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// A named place an asset can reside at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// A teacher (docente) eligible to borrow assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
}

impl Teacher {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

/// User snapshot embedded in loan relations. Lenders are staff users and
/// borrowers are teachers, but the API returns the same shape for both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
}

impl UserSummary {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

/// Authenticated user as stored in browser session storage after login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
}

impl SessionUser {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

/// Body of `POST /prestamos`: a loan record minus the server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDraft {
    #[serde(rename = "activoId")]
    pub asset_id: i64,
    #[serde(rename = "prestadoPorId")]
    pub lender_id: i64,
    #[serde(rename = "prestadoAId")]
    pub borrower_id: i64,
    #[serde(rename = "ubicacionId")]
    pub to_location_id: i64,
    #[serde(rename = "ubicacionActualId")]
    pub from_location_id: i64,
    #[serde(rename = "fechaPrestamo")]
    pub loan_date: DateTime<Utc>,
    #[serde(rename = "fechaDevolucion")]
    pub return_date: Option<DateTime<Utc>>,
    #[serde(rename = "estado")]
    pub status: String,
}

/// Body of `PATCH /prestamos/{id}/estado`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateLoanStatusRequest {
    #[serde(rename = "estado")]
    pub status: String,
}

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

/// Successful login: bearer token plus the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: SessionUser,
}

/// Input gathered by the loan creation form before it is turned into a
/// [`LoanDraft`]. `None`/empty means the user has not picked a value yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoanFormInput {
    /// Session user acting as lender; absent when not authenticated.
    pub lender_id: Option<i64>,
    pub borrower_id: Option<i64>,
    pub to_location_id: Option<i64>,
    /// Raw value of the date input (`YYYY-MM-DD`).
    pub return_date: String,
}

/// First failed required-field check of the creation form. The messages are
/// the exact strings shown inline under the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoanFormError {
    #[error("No hay una sesión activa; vuelva a iniciar sesión")]
    MissingLender,
    #[error("Debe seleccionar un docente")]
    MissingBorrower,
    #[error("Debe seleccionar la ubicación de destino")]
    MissingLocation,
    #[error("Debe indicar la fecha de devolución")]
    MissingReturnDate,
}

/// Required-field check for the loan creation form. Checks run in the order
/// the fields appear on screen and stop at the first failure, so the user
/// gets one field-specific message at a time.
pub fn validate_loan_form(input: &LoanFormInput) -> Result<(), LoanFormError> {
    if input.lender_id.is_none() {
        return Err(LoanFormError::MissingLender);
    }
    if input.borrower_id.is_none() {
        return Err(LoanFormError::MissingBorrower);
    }
    if input.to_location_id.is_none() {
        return Err(LoanFormError::MissingLocation);
    }
    if input.return_date.trim().is_empty() {
        return Err(LoanFormError::MissingReturnDate);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_loan_json() -> &'static str {
        r#"{
            "id": 42,
            "activoId": 7,
            "prestadoPorId": 1,
            "prestadoAId": 19,
            "ubicacionId": 3,
            "ubicacionActualId": 2,
            "fechaPrestamo": "2024-05-06T14:30:00Z",
            "fechaDevolucion": "2024-05-20T14:30:00Z",
            "estado": "En préstamo",
            "activo": { "id": 7, "nombre": "Proyector Epson", "placa": "INV-0042", "ubicacionId": 2 },
            "prestadoPor": { "id": 1, "nombre": "Laura", "apellido": "Mendez" },
            "prestadoA": { "id": 19, "nombre": "Carlos", "apellido": "Rojas" },
            "ubicacion": { "id": 3, "nombre": "Aula 204" },
            "ubicacionActual": { "id": 2, "nombre": "Bodega" }
        }"#
    }

    #[test]
    fn test_loan_deserializes_wire_names() {
        let loan: Loan = serde_json::from_str(sample_loan_json()).unwrap();

        assert_eq!(loan.id, 42);
        assert_eq!(loan.asset_id, 7);
        assert_eq!(loan.lender_id, 1);
        assert_eq!(loan.borrower_id, 19);
        assert_eq!(loan.to_location_id, 3);
        assert_eq!(loan.from_location_id, 2);
        assert_eq!(loan.status, "En préstamo");
        assert_eq!(loan.asset.as_ref().unwrap().plate, "INV-0042");
        assert_eq!(loan.lender.as_ref().unwrap().display_name(), "Laura Mendez");
        assert_eq!(loan.to_location.as_ref().unwrap().name, "Aula 204");
        assert_eq!(loan.from_location.as_ref().unwrap().name, "Bodega");
    }

    #[test]
    fn test_loan_relations_survive_reserialization() {
        let loan: Loan = serde_json::from_str(sample_loan_json()).unwrap();
        let value = serde_json::to_value(&loan).unwrap();

        // Wire names, not Rust names, and the expanded snapshots intact.
        assert_eq!(value["activoId"], 7);
        assert_eq!(value["prestadoPorId"], 1);
        assert_eq!(value["ubicacionActualId"], 2);
        assert_eq!(value["activo"]["placa"], "INV-0042");
        assert_eq!(value["prestadoA"]["apellido"], "Rojas");
        assert!(value.get("asset_id").is_none());
    }

    #[test]
    fn test_loan_without_relations_or_return_date() {
        let json = r#"{
            "id": 5,
            "activoId": 1,
            "prestadoPorId": 1,
            "prestadoAId": 2,
            "ubicacionId": 1,
            "ubicacionActualId": 1,
            "fechaPrestamo": "2024-01-10T08:00:00Z",
            "estado": "En préstamo"
        }"#;
        let loan: Loan = serde_json::from_str(json).unwrap();

        assert_eq!(loan.return_date, None);
        assert_eq!(loan.asset, None);
        assert_eq!(loan.effective_return_date(), None);

        // Absent optionals stay off the wire instead of becoming nulls.
        let value = serde_json::to_value(&loan).unwrap();
        assert!(value.get("fechaDevolucion").is_none());
        assert!(value.get("activo").is_none());
    }

    #[test]
    fn test_effective_return_date_normalizes_placeholder() {
        let mut loan: Loan = serde_json::from_str(sample_loan_json()).unwrap();
        assert!(loan.effective_return_date().is_some());

        // The backend sometimes echoes fechaPrestamo instead of null.
        loan.return_date = Some(loan.loan_date);
        assert_eq!(loan.effective_return_date(), None);

        let real_return = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        loan.return_date = Some(real_return);
        assert_eq!(loan.effective_return_date(), Some(real_return));
    }

    #[test]
    fn test_loan_status_round_trip() {
        for status in LoanStatus::ALL {
            assert_eq!(LoanStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LoanStatus::parse("En préstamo"), Some(LoanStatus::Active));
        assert_eq!(LoanStatus::parse("Devuelto"), Some(LoanStatus::Returned));
        assert_eq!(LoanStatus::parse("No Devuelto"), Some(LoanStatus::NotReturned));
        // Off-vocabulary strings are representable in Loan::status but are
        // not part of the selectable set.
        assert_eq!(LoanStatus::parse("En Servicio"), None);
        assert_eq!(LoanStatus::parse("devuelto"), None);
    }

    #[test]
    fn test_loan_draft_wire_names() {
        let draft = LoanDraft {
            asset_id: 7,
            lender_id: 1,
            borrower_id: 19,
            to_location_id: 3,
            from_location_id: 2,
            loan_date: Utc.with_ymd_and_hms(2024, 5, 6, 14, 30, 0).unwrap(),
            return_date: Some(Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap()),
            status: LoanStatus::Active.as_str().to_string(),
        };

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["activoId"], 7);
        assert_eq!(value["prestadoAId"], 19);
        assert_eq!(value["ubicacionId"], 3);
        assert_eq!(value["ubicacionActualId"], 2);
        assert_eq!(value["estado"], "En préstamo");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_validate_loan_form_required_fields() {
        let complete = LoanFormInput {
            lender_id: Some(1),
            borrower_id: Some(19),
            to_location_id: Some(3),
            return_date: "2024-05-20".to_string(),
        };
        assert_eq!(validate_loan_form(&complete), Ok(()));

        let mut input = complete.clone();
        input.lender_id = None;
        assert_eq!(validate_loan_form(&input), Err(LoanFormError::MissingLender));

        let mut input = complete.clone();
        input.borrower_id = None;
        assert_eq!(validate_loan_form(&input), Err(LoanFormError::MissingBorrower));

        let mut input = complete.clone();
        input.to_location_id = None;
        assert_eq!(validate_loan_form(&input), Err(LoanFormError::MissingLocation));

        let mut input = complete.clone();
        input.return_date = "   ".to_string();
        assert_eq!(validate_loan_form(&input), Err(LoanFormError::MissingReturnDate));
    }

    #[test]
    fn test_validation_stops_at_first_missing_field() {
        // Everything missing: the lender check runs before the others, so
        // the session message wins.
        let empty = LoanFormInput::default();
        assert_eq!(validate_loan_form(&empty), Err(LoanFormError::MissingLender));
    }

    #[test]
    fn test_login_request_uses_wire_password_key() {
        let request = LoginRequest {
            email: "admin@example.com".to_string(),
            password: "secreta".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contrasena"], "secreta");
        assert!(value.get("password").is_none());
    }
}
