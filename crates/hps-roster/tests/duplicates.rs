use hps_model::StudentRecord;
use hps_roster::{
    DuplicateKind, DuplicateOf, ImportOptions, find_duplicates, import_rows, string_similarity,
};
use proptest::prelude::*;

fn strings(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn identical_ids_yield_one_exact_candidate() {
    let new = [StudentRecord::new("Ana Diaz", "1002003", "9")];
    let existing = [
        StudentRecord::new("Luis Perez", "1002999", "9"),
        StudentRecord::new("Ana Diaz", "1002003", "9"),
    ];
    let found = find_duplicates(&new, &existing);

    let exact: Vec<_> = found
        .iter()
        .filter(|c| c.kind == DuplicateKind::ExactId)
        .collect();
    assert_eq!(found.len(), 1);
    assert_eq!(exact.len(), 1);
    assert!(matches!(
        exact[0].duplicate_of,
        DuplicateOf::Existing { index: 1, .. }
    ));
}

#[test]
fn apostrophe_names_match_after_import() {
    let import = import_rows(
        &strings(&["Student Name", "Grade"]),
        &[strings(&["Sean O'Neil", "9"])],
        &ImportOptions::default(),
    );
    assert_eq!(import.students[0].full_name, "Sean O'neil");

    let same = [StudentRecord::new("Sean O'Neil", "", "9")];
    let found = find_duplicates(&import.students, &same);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, DuplicateKind::LikelyDuplicate);
    assert_eq!(found[0].confidence, 1.0);
    assert_eq!(
        found[0].reason,
        "name is 100% similar to 'Sean O'Neil' (same grade)"
    );

    let dropped = [StudentRecord::new("Sean ONeil", "", "9")];
    let found = find_duplicates(&import.students, &dropped);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, DuplicateKind::LikelyDuplicate);
    assert!((found[0].confidence - 10.0 / 11.0).abs() < 1e-9);
}

#[test]
fn jon_and_john_smith_same_grade() {
    let new = [StudentRecord::new("Jon Smith", "", "10")];
    let existing = [StudentRecord::new("John Smith", "", "10")];
    let found = find_duplicates(&new, &existing);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, DuplicateKind::LikelyDuplicate);
    assert!((found[0].confidence - 0.9).abs() < 1e-9);
}

#[test]
fn imported_upload_against_existing_roster() {
    let headers = strings(&["Apellido", "Nombres", "Matrícula", "Grado"]);
    let rows = vec![
        strings(&["Gomez", "Sofia", "3004000", "11"]),
        strings(&["Ortiz", "Diego", "3004001", "11"]),
        strings(&["gomez", "sofia", "", "11"]),
    ];
    let import = import_rows(&headers, &rows, &ImportOptions::default());
    assert_eq!(import.students.len(), 3);
    assert_eq!(import.students[2].full_name, "Sofia Gomez");

    let existing = [StudentRecord::new("Diego Ortiz", "3004001", "11")];
    let found = find_duplicates(&import.students, &existing);

    let kinds: Vec<(usize, DuplicateKind)> = found.iter().map(|c| (c.new_index, c.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (0, DuplicateKind::SimilarId),
            (1, DuplicateKind::ExactId),
            (2, DuplicateKind::BatchDuplicate),
        ]
    );
}

#[test]
fn candidates_serialize_with_snake_case_kinds() {
    let new = [StudentRecord::new("Ana Diaz", "77", "9")];
    let existing = [StudentRecord::new("Ana Diaz", "77", "9")];
    let found = find_duplicates(&new, &existing);
    let json = serde_json::to_value(&found).expect("serialize");
    assert_eq!(json[0]["kind"], "exact_id");
    assert_eq!(json[0]["duplicate_of"]["source"], "existing");
}

proptest! {
    #[test]
    fn similarity_is_symmetric_and_bounded(a in ".{0,24}", b in ".{0,24}") {
        let ab = string_similarity(&a, &b);
        let ba = string_similarity(&b, &a);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn similarity_is_one_only_for_equal(a in "[a-z]{1,12}", b in "[a-z]{1,12}") {
        let score = string_similarity(&a, &b);
        prop_assert_eq!(score == 1.0, a == b);
    }
}
