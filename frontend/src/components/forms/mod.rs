pub mod create_loan_form;

pub use create_loan_form::CreateLoanForm;
