use fanout::prelude::*;

/// Generate `count` records spread round-robin over `branches`
///
/// When `fail_at` is set, the record at that position carries the
/// sentinel payload so the run ends in the error path.
pub fn generate_records(count: usize, branches: usize, fail_at: Option<usize>) -> Vec<Record<String>> {
    (0..count)
        .map(|i| {
            let payload = if Some(i) == fail_at {
                DEFAULT_SENTINEL.to_string()
            } else {
                format!("payload-{}", i)
            };
            Record::new(i % branches, payload)
        })
        .collect()
}

/// Generate the same records as an `index,payload` CSV document
pub fn generate_csv_dataset(count: usize, branches: usize) -> String {
    let records = generate_records(count, branches, None);
    let mut output = Vec::new();
    write_records(&mut output, &records).expect("Failed to render CSV dataset");
    String::from_utf8(output).expect("CSV dataset is not UTF-8")
}
