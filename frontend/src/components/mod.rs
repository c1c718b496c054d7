pub mod forms;
pub mod header;
pub mod loan_status_modal;
pub mod loans;
pub mod login_form;

pub use header::Header;
pub use loan_status_modal::LoanStatusModal;
pub use login_form::LoginForm;
