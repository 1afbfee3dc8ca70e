//! Cutoff Matcher: linear scan of the catalog for branches a score qualifies for.
//!
//! Results are ordered closest-fit-first: the highest cutoff not exceeding the
//! student's score is the most competitive seat they can reach.

use crate::catalog::{CategoryCode, Catalog, Suggestion};

/// Upper bound on suggestions returned for a single query.
pub const MAX_SUGGESTIONS: usize = 10;

/// Returns every (college, branch) whose `category` cutoff is at or below `score`,
/// sorted by cutoff descending and truncated to `MAX_SUGGESTIONS`.
///
/// An empty result is a normal outcome, not an error. A NaN score matches nothing.
pub fn match_cutoffs(score: f64, category: CategoryCode, catalog: &Catalog) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = catalog
        .colleges()
        .iter()
        .flat_map(|college| {
            college.branches.iter().filter_map(move |branch| {
                let cutoff = branch.cutoff_for(category)?;
                (score >= cutoff).then(|| Suggestion {
                    college: college.name.clone(),
                    branch: branch.name.clone(),
                    cutoff,
                    address: college.address.clone(),
                })
            })
        })
        .collect();

    // Stable sort: equal cutoffs keep catalog order.
    suggestions.sort_by(|a, b| b.cutoff.total_cmp(&a.cutoff));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Branch, College};
    use std::collections::BTreeMap;

    fn branch(name: &str, cutoffs: &[(CategoryCode, f64)]) -> Branch {
        Branch {
            name: name.to_string(),
            cutoffs: cutoffs.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    fn college(name: &str, branches: Vec<Branch>) -> College {
        College {
            name: name.to_string(),
            address: format!("{name} Road"),
            branches,
        }
    }

    fn small_catalog() -> Catalog {
        Catalog::new(vec![
            college(
                "Alpha Institute",
                vec![
                    branch("CSE", &[(CategoryCode::Bc, 190.0), (CategoryCode::Oc, 195.0)]),
                    branch("Civil", &[(CategoryCode::Bc, 170.0)]),
                ],
            ),
            college(
                "Beta College",
                vec![
                    branch("ECE", &[(CategoryCode::Bc, 180.0)]),
                    branch("Mech", &[(CategoryCode::Sc, 150.0)]),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_qualifying_branches_sorted_descending() {
        let results = match_cutoffs(185.0, CategoryCode::Bc, &small_catalog());
        let branches: Vec<&str> = results.iter().map(|s| s.branch.as_str()).collect();
        assert_eq!(branches, vec!["ECE", "Civil"]);
        assert_eq!(results[0].college, "Beta College");
        assert_eq!(results[0].address, "Beta College Road");
        assert_eq!(results[0].cutoff, 180.0);
    }

    #[test]
    fn test_score_equal_to_cutoff_qualifies() {
        let results = match_cutoffs(190.0, CategoryCode::Bc, &small_catalog());
        assert_eq!(results[0].branch, "CSE");
        assert_eq!(results[0].cutoff, 190.0);
    }

    #[test]
    fn test_branch_without_category_is_skipped() {
        let results = match_cutoffs(200.0, CategoryCode::Sc, &small_catalog());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].branch, "Mech");
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert!(match_cutoffs(50.0, CategoryCode::Oc, &small_catalog()).is_empty());
        assert!(match_cutoffs(199.0, CategoryCode::St, &small_catalog()).is_empty());
    }

    #[test]
    fn test_nan_score_matches_nothing() {
        assert!(match_cutoffs(f64::NAN, CategoryCode::Bc, &small_catalog()).is_empty());
    }

    #[test]
    fn test_results_truncated_to_max() {
        let branches = (0..25)
            .map(|i| branch(&format!("B{i}"), &[(CategoryCode::Mbc, 100.0 + i as f64)]))
            .collect();
        let catalog = Catalog::new(vec![college("Big", branches)]).unwrap();

        let results = match_cutoffs(200.0, CategoryCode::Mbc, &catalog);
        assert_eq!(results.len(), MAX_SUGGESTIONS);
        assert_eq!(results[0].cutoff, 124.0);
        assert_eq!(results[MAX_SUGGESTIONS - 1].cutoff, 115.0);
    }

    #[test]
    fn test_equal_cutoffs_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            college("First", vec![branch("X", &[(CategoryCode::Oc, 150.0)])]),
            college("Second", vec![branch("Y", &[(CategoryCode::Oc, 150.0)])]),
        ])
        .unwrap();
        let results = match_cutoffs(160.0, CategoryCode::Oc, &catalog);
        assert_eq!(results[0].college, "First");
        assert_eq!(results[1].college, "Second");
    }

    #[test]
    fn test_invariants_hold_across_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        for category in CategoryCode::ALL {
            for score in [0.0, 99.5, 150.0, 172.25, 185.0, 199.0, 200.0] {
                let results = match_cutoffs(score, category, &catalog);
                assert!(results.len() <= MAX_SUGGESTIONS);
                assert!(results.iter().all(|s| score >= s.cutoff));
                assert!(results.windows(2).all(|w| w[0].cutoff >= w[1].cutoff));
                // Deterministic for a fixed catalog
                assert_eq!(results, match_cutoffs(score, category, &catalog));
            }
        }
    }

    #[test]
    fn test_builtin_catalog_bc_185_includes_bc_180_branch() {
        let catalog = Catalog::builtin().unwrap();
        let results = match_cutoffs(185.0, CategoryCode::Bc, &catalog);
        assert!(results.iter().any(|s| s.cutoff == 180.0));
    }
}
