use shared::Loan;

/// Page sizes offered by the report pager.
pub const PAGE_SIZES: [usize; 3] = [10, 33, 50];

/// Free-text filters applied to the loan collection. Empty fields filter
/// nothing; non-empty fields match case-insensitive substrings.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct LoanFilters {
    /// Matched against the asset's display name.
    pub asset_name: String,
    /// Matched against the lender's OR the borrower's display name.
    pub person_name: String,
    /// Matched against the asset's plate identifier.
    pub plate: String,
    /// Matched against the destination OR the current location name.
    pub location: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Transient UI inputs driving the report view.
#[derive(Clone, PartialEq, Debug)]
pub struct ReportQuery {
    pub filters: LoanFilters,
    pub sort: SortOrder,
    pub page: usize,
    pub per_page: usize,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            filters: LoanFilters::default(),
            sort: SortOrder::Ascending,
            page: 1,
            per_page: PAGE_SIZES[0],
        }
    }
}

impl ReportQuery {
    /// New filters always send the user back to page 1; the old page would
    /// point into a collection that no longer exists.
    pub fn with_filters(&self, filters: LoanFilters) -> Self {
        Self {
            filters,
            page: 1,
            ..self.clone()
        }
    }

    /// Changing the page size also resets to page 1.
    pub fn with_per_page(&self, per_page: usize) -> Self {
        Self {
            per_page,
            page: 1,
            ..self.clone()
        }
    }

    /// Re-sorting keeps the current page.
    pub fn with_sort(&self, sort: SortOrder) -> Self {
        Self {
            sort,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// One derived page of the report, recomputed from scratch on every input
/// change. Cheap at the collection sizes the API returns.
#[derive(Clone, PartialEq, Debug)]
pub struct ReportView {
    /// The rows of the current page, already filtered and sorted.
    pub rows: Vec<Loan>,
    /// How many records survived the filters (across all pages).
    pub filtered_count: usize,
    pub total_pages: usize,
    /// Page numbers the pager should render as buttons.
    pub page_window: Vec<usize>,
}

/// Derive the visible page from the full collection and the query inputs.
///
/// Order matters: filter, then sort by id, then paginate. A `page` pointing
/// past the end yields an empty page rather than being clamped.
pub fn derive_view(records: &[Loan], query: &ReportQuery) -> ReportView {
    let mut filtered = apply_filters(records, &query.filters);

    match query.sort {
        SortOrder::Ascending => filtered.sort_by(|a, b| a.id.cmp(&b.id)),
        SortOrder::Descending => filtered.sort_by(|a, b| b.id.cmp(&a.id)),
    }

    let filtered_count = filtered.len();
    let total_pages = total_pages(filtered_count, query.per_page);
    let start = (query.page.max(1) - 1) * query.per_page;
    let rows = filtered
        .into_iter()
        .skip(start)
        .take(query.per_page)
        .collect();

    ReportView {
        rows,
        filtered_count,
        total_pages,
        page_window: page_window(total_pages, query.page),
    }
}

fn apply_filters(records: &[Loan], filters: &LoanFilters) -> Vec<Loan> {
    records
        .iter()
        .filter(|loan| matches_asset_name(loan, &filters.asset_name))
        .filter(|loan| matches_person(loan, &filters.person_name))
        .filter(|loan| matches_plate(loan, &filters.plate))
        .filter(|loan| matches_location(loan, &filters.location))
        .cloned()
        .collect()
}

fn total_pages(count: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    (count + per_page - 1) / per_page
}

/// Page numbers to render as buttons, at most five wide, centered on the
/// current page where the range allows.
pub fn page_window(total_pages: usize, current_page: usize) -> Vec<usize> {
    if total_pages <= 5 {
        return (1..=total_pages).collect();
    }
    if current_page <= 3 {
        (1..=5).collect()
    } else if current_page >= total_pages - 2 {
        (total_pages - 4..=total_pages).collect()
    } else {
        (current_page - 2..=current_page + 2).collect()
    }
}

/// Validate a direct page-number entry. Anything outside `[1, total_pages]`
/// (or not a number at all) is rejected and the caller leaves the page as is.
pub fn parse_page_jump(input: &str, total_pages: usize) -> Option<usize> {
    let page = input.trim().parse::<usize>().ok()?;
    if (1..=total_pages).contains(&page) {
        Some(page)
    } else {
        None
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_asset_name(loan: &Loan, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    loan.asset_name()
        .map(|name| contains_ci(name, needle))
        .unwrap_or(false)
}

fn matches_person(loan: &Loan, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let lender_matches = loan
        .lender
        .as_ref()
        .map(|user| contains_ci(&user.display_name(), needle))
        .unwrap_or(false);
    let borrower_matches = loan
        .borrower
        .as_ref()
        .map(|user| contains_ci(&user.display_name(), needle))
        .unwrap_or(false);
    lender_matches || borrower_matches
}

fn matches_plate(loan: &Loan, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    loan.asset
        .as_ref()
        .map(|asset| contains_ci(&asset.plate, needle))
        .unwrap_or(false)
}

fn matches_location(loan: &Loan, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let to_matches = loan
        .to_location
        .as_ref()
        .map(|location| contains_ci(&location.name, needle))
        .unwrap_or(false);
    let from_matches = loan
        .from_location
        .as_ref()
        .map(|location| contains_ci(&location.name, needle))
        .unwrap_or(false);
    to_matches || from_matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::{Asset, Location, UserSummary};

    fn loan(
        id: i64,
        asset_name: &str,
        plate: &str,
        lender: &str,
        borrower: &str,
        to_location: &str,
        from_location: &str,
    ) -> Loan {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        Loan {
            id,
            asset_id: id * 10,
            lender_id: 1,
            borrower_id: 2,
            to_location_id: 3,
            from_location_id: 4,
            loan_date: date,
            return_date: None,
            status: "En préstamo".to_string(),
            asset: Some(Asset {
                id: id * 10,
                name: asset_name.to_string(),
                plate: plate.to_string(),
                location_id: 4,
                location: None,
            }),
            lender: Some(UserSummary {
                id: 1,
                name: lender.to_string(),
                last_name: "Prestador".to_string(),
            }),
            borrower: Some(UserSummary {
                id: 2,
                name: borrower.to_string(),
                last_name: "Receptor".to_string(),
            }),
            to_location: Some(Location {
                id: 3,
                name: to_location.to_string(),
            }),
            from_location: Some(Location {
                id: 4,
                name: from_location.to_string(),
            }),
        }
    }

    fn bare_loan(id: i64) -> Loan {
        let mut loan = loan(id, "", "", "", "", "", "");
        loan.asset = None;
        loan.lender = None;
        loan.borrower = None;
        loan.to_location = None;
        loan.from_location = None;
        loan
    }

    fn sample() -> Vec<Loan> {
        vec![
            loan(3, "Portátil Lenovo", "PL-001", "Ana", "Luis", "Sala 2", "Bodega"),
            loan(1, "Proyector Epson", "PR-010", "Marta", "Jorge", "Aula 5", "Sala 2"),
            loan(2, "Portátil HP", "PL-002", "Ana", "Sofía", "Laboratorio", "Bodega"),
        ]
    }

    #[test]
    fn test_empty_filters_keep_everything_in_order() {
        let records = sample();
        let filtered = apply_filters(&records, &LoanFilters::default());
        let ids: Vec<i64> = filtered.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_asset_name_filter_is_case_insensitive_substring() {
        let records = sample();
        let filters = LoanFilters {
            asset_name: "portátil".to_string(),
            ..Default::default()
        };
        let filtered = apply_filters(&records, &filters);
        let ids: Vec<i64> = filtered.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_person_filter_matches_lender_or_borrower() {
        let records = sample();
        let by_lender = apply_filters(
            &records,
            &LoanFilters {
                person_name: "ana".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(by_lender.len(), 2);

        let by_borrower = apply_filters(
            &records,
            &LoanFilters {
                person_name: "jorge".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(by_borrower.len(), 1);
        assert_eq!(by_borrower[0].id, 1);
    }

    #[test]
    fn test_plate_filter() {
        let records = sample();
        let filters = LoanFilters {
            plate: "pl-00".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filters).len(), 2);
    }

    #[test]
    fn test_location_filter_matches_destination_or_current() {
        let records = sample();
        let filters = LoanFilters {
            location: "sala 2".to_string(),
            ..Default::default()
        };
        // Destination of loan 3, current location of loan 1.
        assert_eq!(apply_filters(&records, &filters).len(), 2);
    }

    #[test]
    fn test_missing_relations_never_match_nonempty_needles() {
        let records = vec![bare_loan(1)];
        for filters in [
            LoanFilters {
                asset_name: "x".to_string(),
                ..Default::default()
            },
            LoanFilters {
                person_name: "x".to_string(),
                ..Default::default()
            },
            LoanFilters {
                plate: "x".to_string(),
                ..Default::default()
            },
            LoanFilters {
                location: "x".to_string(),
                ..Default::default()
            },
        ] {
            assert!(apply_filters(&records, &filters).is_empty());
        }
        assert_eq!(apply_filters(&records, &LoanFilters::default()).len(), 1);
    }

    #[test]
    fn test_sort_ascending_reversed_equals_descending() {
        let records = sample();
        let asc = derive_view(&records, &ReportQuery::default());
        let desc = derive_view(
            &records,
            &ReportQuery {
                sort: SortOrder::Descending,
                ..Default::default()
            },
        );
        let mut reversed: Vec<i64> = asc.rows.iter().map(|l| l.id).collect();
        reversed.reverse();
        let desc_ids: Vec<i64> = desc.rows.iter().map(|l| l.id).collect();
        assert_eq!(reversed, desc_ids);
        assert_eq!(desc_ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_total_pages_and_slices_cover_the_collection() {
        let records: Vec<Loan> = (1..=25).map(bare_loan).collect();
        let query = ReportQuery::default(); // per_page 10
        let view = derive_view(&records, &query);
        assert_eq!(view.filtered_count, 25);
        assert_eq!(view.total_pages, 3);

        let mut seen = 0;
        for page in 1..=view.total_pages {
            seen += derive_view(&records, &query.with_page(page)).rows.len();
        }
        assert_eq!(seen, 25);
    }

    #[test]
    fn test_page_slice_bounds() {
        let records: Vec<Loan> = (1..=25).map(bare_loan).collect();
        let query = ReportQuery::default();
        let page2 = derive_view(&records, &query.with_page(2));
        let ids: Vec<i64> = page2.rows.iter().map(|l| l.id).collect();
        assert_eq!(ids, (11..=20).collect::<Vec<i64>>());
        let page3 = derive_view(&records, &query.with_page(3));
        assert_eq!(page3.rows.len(), 5);
    }

    #[test]
    fn test_page_past_the_end_is_empty_not_clamped() {
        let records: Vec<Loan> = (1..=15).map(bare_loan).collect();
        let view = derive_view(&records, &ReportQuery::default().with_page(5));
        assert!(view.rows.is_empty());
        assert_eq!(view.total_pages, 2);
    }

    #[test]
    fn test_empty_collection_has_no_pages() {
        let view = derive_view(&[], &ReportQuery::default());
        assert!(view.rows.is_empty());
        assert_eq!(view.total_pages, 0);
        assert!(view.page_window.is_empty());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let query = ReportQuery::default().with_page(7);
        let updated = query.with_filters(LoanFilters {
            plate: "pl".to_string(),
            ..Default::default()
        });
        assert_eq!(updated.page, 1);
    }

    #[test]
    fn test_per_page_change_resets_page() {
        let query = ReportQuery::default().with_page(4);
        assert_eq!(query.with_per_page(33).page, 1);
    }

    #[test]
    fn test_sort_change_keeps_page() {
        let query = ReportQuery::default().with_page(4);
        assert_eq!(query.with_sort(SortOrder::Descending).page, 4);
    }

    #[test]
    fn test_page_window_small_total_shows_all() {
        assert_eq!(page_window(3, 2), vec![1, 2, 3]);
        assert_eq!(page_window(5, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_page_window_at_the_edges() {
        assert_eq!(page_window(10, 1), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(10, 3), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(10, 8), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_page_window_centered_in_the_middle() {
        assert_eq!(page_window(10, 5), vec![3, 4, 5, 6, 7]);
        assert_eq!(page_window(10, 4), vec![2, 3, 4, 5, 6]);
        assert_eq!(page_window(10, 7), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_page_jump_validation() {
        assert_eq!(parse_page_jump("3", 10), Some(3));
        assert_eq!(parse_page_jump(" 10 ", 10), Some(10));
        assert_eq!(parse_page_jump("0", 10), None);
        assert_eq!(parse_page_jump("11", 10), None);
        assert_eq!(parse_page_jump("abc", 10), None);
        assert_eq!(parse_page_jump("", 10), None);
    }

    #[test]
    fn test_page_sizes_enumeration() {
        assert_eq!(PAGE_SIZES, [10, 33, 50]);
    }
}
