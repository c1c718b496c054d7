pub mod use_catalogs;
pub mod use_loans;
pub mod use_session;
