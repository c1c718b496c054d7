pub mod loan_table;
pub mod loans_view;

pub use loan_table::LoanTable;
pub use loans_view::LoansView;
